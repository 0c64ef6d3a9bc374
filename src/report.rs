use crate::{
    interpreter::error::RuntimeErrorKind,
    lexer::{LineBreaks, Span},
    parser::ParserErrorKind,
    Error,
};
use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use std::ops::Range;

const ARIADNE_MSG: &str = "Ariadne produces valid utf-8 strings";
const ARIADNE_WRITE_MSG: &str = "Write into buffer should not fail.";

/// Renders errors as annotated source snippets. Locations are byte offsets into the source.
pub struct PrettyReporter<'src> {
    text: &'src str,
    path: String,
    line_breaks: LineBreaks,
}

impl<'src> PrettyReporter<'src> {
    pub fn new(text: &'src str, path: impl Into<String>) -> Self {
        Self {
            text,
            path: path.into(),
            line_breaks: LineBreaks::new(text),
        }
    }

    fn code(error: &Error) -> u32 {
        match error {
            Error::Lexical(_) => 1,
            Error::Parser(_) => 2,
            Error::Runtime(_) => 3,
        }
    }

    fn location(&self, error: &Error) -> Range<usize> {
        match error {
            Error::Lexical(error) => error.span.range(),
            Error::Parser(error) => {
                let line = self.line_breaks.get_line_range(error.line);
                match &error.kind {
                    // Spans of a lexical error inside a statement are relative to its line.
                    ParserErrorKind::LexicalError(inner) => {
                        let indent = self.text[line.clone()].len()
                            - self.text[line.clone()].trim_start().len();
                        let start = line.start + indent;
                        Span::new(start + inner.span.start, inner.span.length.max(1)).range()
                    }
                    _ => line,
                }
            }
            Error::Runtime(error) => self.line_breaks.get_line_range(error.line),
        }
    }

    fn label(error: &Error) -> String {
        match error {
            Error::Lexical(error) => format!("No token starts with `{}`", error.offending_char()),
            Error::Parser(error) => match &error.kind {
                ParserErrorKind::UnterminatedBlock { construct, .. } => {
                    format!("This `{construct}` is never closed with `end rest`")
                }
                ParserErrorKind::MalformedStatement { expected } => {
                    format!("Expected the form `{expected}`")
                }
                kind => kind.to_string(),
            },
            Error::Runtime(error) => match &error.kind {
                RuntimeErrorKind::StackExhausted { .. } => {
                    "Recursion went too deep here".to_string()
                }
                kind => kind.to_string(),
            },
        }
    }

    pub fn format(&self, error: &Error) -> String {
        let path = self.path.as_str();
        let range = self.location(error);
        let mut output = std::io::Cursor::new(Vec::new());
        Report::build(ReportKind::Error, (path, range.clone()))
            .with_config(Config::default().with_index_type(IndexType::Byte))
            .with_code(Self::code(error))
            .with_message(error.category())
            .with_label(
                Label::new((path, range))
                    .with_message(Self::label(error))
                    .with_color(Color::BrightRed),
            )
            .finish()
            .write((path, Source::from(self.text)), &mut output)
            .expect(ARIADNE_WRITE_MSG);
        String::from_utf8(output.into_inner()).expect(ARIADNE_MSG)
    }
}
