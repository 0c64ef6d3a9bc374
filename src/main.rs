use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::Result;
use microtone::{
    interpreter::{context::StdioContext, InterpreterConfig, TreeWalkInterpreter},
    report::PrettyReporter,
    Error,
};
use std::path::{Path, PathBuf};
use std::{fs::read_to_string, process::ExitCode};

const EXIT_STATIC_ERROR: u8 = 65;
const EXIT_RUNTIME_ERROR: u8 = 70;

#[derive(Debug, Parser)]
#[clap(name = "microtone", version)]
pub struct CLArgs {
    #[clap(subcommand)]
    pub routine: MicrotoneCommand,
}

#[derive(Debug, Subcommand)]
pub enum MicrotoneCommand {
    Tokenize {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "basic")]
        format: TokenFormat,
    },
    Parse {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "sexpr")]
        format: ProgramFormat,
    },
    Run {
        path: PathBuf,
        #[clap(long = "max-call-depth")]
        max_call_depth: Option<usize>,
    },
}

#[derive(Debug, Clone, ValueEnum)]
pub enum TokenFormat {
    Debug,
    Basic,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ProgramFormat {
    Debug,
    #[clap(name = "sexpr")]
    SExpr,
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    init_tracing();
    let args = CLArgs::parse();
    let succeeded = match args.routine {
        MicrotoneCommand::Tokenize { path, format } => {
            let src = read_to_string(&path)?;
            tokenize(&src, &format)
        }
        MicrotoneCommand::Parse { path, format } => {
            let src = read_to_string(&path)?;
            parse(&src, &path, &format)
        }
        MicrotoneCommand::Run {
            path,
            max_call_depth,
        } => {
            let src = read_to_string(&path)?;
            let mut config = InterpreterConfig::default();
            if let Some(max_call_depth) = max_call_depth {
                config.max_call_depth = max_call_depth;
            }
            run(&src, &path, config)
        }
    };
    Ok(succeeded)
}

/// Installs a log subscriber only when `RUST_LOG` is set.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_level(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn report(src: &str, path: &Path, error: &Error) -> ExitCode {
    let reporter = PrettyReporter::new(src, path.to_string_lossy());
    eprint!("{}", reporter.format(error));
    if error.is_static() {
        ExitCode::from(EXIT_STATIC_ERROR)
    } else {
        ExitCode::from(EXIT_RUNTIME_ERROR)
    }
}

fn tokenize(src: &str, format: &TokenFormat) -> ExitCode {
    use microtone::lexer::formatter::{BasicFormatter, DebugFormatter, TokenFormatter};
    use microtone::lexer::Lexer;

    let formatter: Box<dyn TokenFormatter> = match format {
        TokenFormat::Debug => Box::new(DebugFormatter),
        TokenFormat::Basic => Box::new(BasicFormatter),
    };
    let mut succeeded = true;
    for result in Lexer::new(src) {
        match result {
            Ok(token) => println!("{}", formatter.format(&token)),
            Err(error) => {
                eprintln!("{}", formatter.format_lexical_error(&error));
                succeeded = false;
            }
        }
    }
    if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_STATIC_ERROR)
    }
}

fn parse(src: &str, path: &Path, format: &ProgramFormat) -> ExitCode {
    use microtone::parser::formatter::{DebugFormatter, ProgramFormatter, SExpressionFormatter};

    let formatter: Box<dyn ProgramFormatter> = match format {
        ProgramFormat::Debug => Box::new(DebugFormatter),
        ProgramFormat::SExpr => Box::new(SExpressionFormatter),
    };
    match microtone::parser::parse_program(src) {
        Ok(program) => {
            println!("{}", formatter.format(&program));
            ExitCode::SUCCESS
        }
        Err(error) => report(src, path, &error.into()),
    }
}

fn run(src: &str, path: &Path, config: InterpreterConfig) -> ExitCode {
    if let Err(error) = microtone::lexer::tokenize(src) {
        return report(src, path, &error.into());
    }
    let program = match microtone::parser::parse_program(src) {
        Ok(program) => program,
        Err(error) => return report(src, path, &error.into()),
    };
    match TreeWalkInterpreter::with_config(StdioContext, config).run(&program) {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => report(src, path, &error.into()),
    }
}
