#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'src> {
    /// Trimmed text of the line.
    pub text: &'src str,
    /// 1-based line number in the source.
    pub number: u32,
}

/// Front-to-back cursor over the non-blank lines of a source. Every line is handed out exactly
/// once.
#[derive(Debug, Clone)]
pub struct LineCursor<'src> {
    lines: Vec<SourceLine<'src>>,
    position: usize,
}

impl<'src> LineCursor<'src> {
    pub fn new(source: &'src str) -> Self {
        let lines = source
            .lines()
            .enumerate()
            .map(|(index, text)| SourceLine {
                text: text.trim(),
                number: (index + 1) as u32,
            })
            .filter(|line| !line.text.is_empty())
            .collect();
        Self { lines, position: 0 }
    }

    pub fn next_line(&mut self) -> Option<SourceLine<'src>> {
        let line = self.lines.get(self.position).copied()?;
        self.position += 1;
        Some(line)
    }
}
