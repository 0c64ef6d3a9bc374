use super::SystemContext;

pub struct StdioContext;

impl SystemContext for StdioContext {
    fn writeln(&mut self, text: &str) {
        println!("{text}");
    }
}

/// Collects output lines in memory.
#[derive(Debug, Default)]
pub struct BufferedContext {
    lines: Vec<String>,
}

impl BufferedContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl SystemContext for BufferedContext {
    fn writeln(&mut self, text: &str) {
        self.lines.push(text.to_owned());
    }
}
