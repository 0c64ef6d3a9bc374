mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod report;
mod stack;

pub use error::Error;
use interpreter::{context::BufferedContext, InterpreterConfig, TreeWalkInterpreter};
use tracing::debug;

/// Tokenizes, parses and executes `source`, returning every printed line in order.
pub fn run(source: &str) -> Result<Vec<String>, Error> {
    run_with_config(source, InterpreterConfig::default())
}

pub fn run_with_config(source: &str, config: InterpreterConfig) -> Result<Vec<String>, Error> {
    // A lexical error anywhere aborts before parsing, with its position in the whole source.
    let tokens = lexer::tokenize(source)?;
    debug!(tokens = tokens.len(), "tokenized source");

    let program = parser::parse_program(source)?;
    let context = TreeWalkInterpreter::with_config(BufferedContext::new(), config).run(&program)?;
    Ok(context.into_lines())
}
