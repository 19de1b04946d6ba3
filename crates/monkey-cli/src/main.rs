//! Monkey CLI - Command-line interface for the Monkey programming language

use std::fmt::Write as _;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use log::{debug, LevelFilter};
use monkey_core::lexer::{Lexer, TokenKind};
use monkey_core::ParserOptions;

mod repl;

#[derive(Parser)]
#[command(name = "monkey")]
#[command(version = monkey_core::VERSION)]
#[command(about = "The Monkey programming language front end", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive REPL
    Repl,

    /// Parse a Monkey source file and print its syntax tree
    Parse {
        /// Path to the source file (reads standard input if omitted)
        file: Option<PathBuf>,

        /// Parse the given code instead of a file
        #[arg(short, long, conflicts_with = "file")]
        eval: Option<String>,

        /// Print the token stream instead of the syntax tree
        #[arg(long, conflicts_with = "debug")]
        tokens: bool,

        /// Print the syntax tree in debug form
        #[arg(long)]
        debug: bool,

        /// Maximum expression nesting depth
        #[arg(long)]
        max_depth: Option<usize>,
    },
}

/// What `monkey parse` prints on success
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    /// Canonical rendering of the program
    Ast,
    /// `{:#?}` of the program
    Debug,
    /// One token per line
    Tokens,
}

/// Rendered output of a parse plus the errors found on the way
#[derive(Debug, Default)]
struct Report {
    output: String,
    errors: Vec<String>,
}

impl Report {
    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Parse {
            file,
            eval,
            tokens,
            debug,
            max_depth,
        }) => {
            let source = read_source(file.as_deref(), eval)?;
            let mode = if tokens {
                OutputMode::Tokens
            } else if debug {
                OutputMode::Debug
            } else {
                OutputMode::Ast
            };
            let mut options = ParserOptions::default();
            if let Some(max_depth) = max_depth {
                options = options.with_max_depth(max_depth);
            }

            let report = render(&source, mode, options);
            if !report.output.is_empty() {
                println!("{}", report.output);
            }
            for error in &report.errors {
                eprintln!("{error}");
            }
            if report.has_errors() {
                return Ok(ExitCode::FAILURE);
            }
        }

        Some(Commands::Repl) | None => {
            let mut repl = repl::Repl::new()?;
            repl.run()?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Install the `env_logger` backend. `RUST_LOG` wins over `-v` flags.
fn init_logging(verbose: u8) {
    env_logger::Builder::new()
        .filter_level(log_level(verbose))
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Load source text from `--eval`, a file, or standard input
fn read_source(file: Option<&Path>, eval: Option<String>) -> Result<String> {
    if let Some(code) = eval {
        return Ok(code);
    }

    match file {
        Some(path) => {
            debug!("reading {}", path.display());
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read file '{}'", path.display()))
        }
        None => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("Failed to read standard input")?;
            Ok(source)
        }
    }
}

/// Parse or lex `source` and render it for printing
fn render(source: &str, mode: OutputMode, options: ParserOptions) -> Report {
    if mode == OutputMode::Tokens {
        return render_tokens(source);
    }

    let parser = monkey_core::Parser::with_options(Lexer::new(source), options);
    let (program, errors) = parser.parse_program();
    debug!(
        "parsed {} statement(s) with {} error(s)",
        program.stmts.len(),
        errors.len()
    );

    let output = match mode {
        OutputMode::Debug => format!("{program:#?}"),
        _ => program.to_string(),
    };
    Report {
        output,
        errors: errors.iter().map(ToString::to_string).collect(),
    }
}

/// One `line:column  kind  literal` row per token, EOF excluded
fn render_tokens(source: &str) -> Report {
    let mut report = Report::default();

    for token in Lexer::new(source) {
        if token.kind == TokenKind::Illegal {
            report.errors.push(format!(
                "illegal token {:?} at {}",
                token.literal, token.position
            ));
        }
        if !report.output.is_empty() {
            report.output.push('\n');
        }
        let _ = write!(
            report.output,
            "{}:{}\t{:?}\t{:?}",
            token.position.line, token.position.column, token.kind, token.literal
        );
    }

    report
}
