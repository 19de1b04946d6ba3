//! REPL (Read-Parse-Print Loop) for Monkey
//!
//! Provides an interactive environment for inspecting how Monkey code parses.

use anyhow::Result;
use log::debug;
use monkey_core::ParserOptions;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{DefaultEditor, Editor};

use crate::{render, OutputMode};

/// REPL prompt shown at the start of each line
const PROMPT: &str = ">> ";
/// Continuation prompt for multi-line input
const CONTINUATION_PROMPT: &str = ".. ";
/// History file name
const HISTORY_FILE: &str = ".monkey_history";

/// Result of processing a REPL command
#[derive(Debug, PartialEq, Eq)]
enum CommandResult {
    /// Not a command, parse the input
    Continue,
    /// Exit the REPL
    Exit,
    /// Input was a command, print its output
    Handled(String),
}

/// The Monkey REPL
pub struct Repl {
    editor: Editor<(), DefaultHistory>,
    options: ParserOptions,
}

impl Repl {
    /// Create a new REPL instance
    pub fn new() -> Result<Self> {
        let mut editor = DefaultEditor::new()?;

        if let Some(home) = home_dir() {
            let history_path = home.join(HISTORY_FILE);
            if editor.load_history(&history_path).is_err() {
                debug!("no history at {}", history_path.display());
            }
        }

        Ok(Self {
            editor,
            options: ParserOptions::default(),
        })
    }

    /// Run the REPL loop
    pub fn run(&mut self) -> Result<()> {
        println!("Monkey v{}", monkey_core::VERSION);
        println!("Type :help for help, :quit to exit");
        println!();

        loop {
            match self.read_input() {
                Ok(Some(input)) => match handle_command(&input) {
                    CommandResult::Exit => break,
                    CommandResult::Handled(output) => println!("{output}"),
                    CommandResult::Continue => self.parse_and_print(&input),
                },
                Ok(None) => continue,
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Goodbye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error reading input: {err}");
                    break;
                }
            }
        }

        if let Some(home) = home_dir() {
            let history_path = home.join(HISTORY_FILE);
            if let Err(err) = self.editor.save_history(&history_path) {
                debug!("failed to save history: {err}");
            }
        }

        Ok(())
    }

    /// Read input from the user, continuing lines until brackets balance
    fn read_input(&mut self) -> Result<Option<String>, ReadlineError> {
        let mut input = String::new();
        let mut prompt = PROMPT;

        loop {
            let line = self.editor.readline(prompt)?;

            if input.is_empty() && line.trim().is_empty() {
                return Ok(None);
            }

            if !input.is_empty() {
                input.push('\n');
            }
            input.push_str(&line);

            if is_complete(&input) {
                let _ = self.editor.add_history_entry(&input);
                return Ok(Some(input));
            }

            prompt = CONTINUATION_PROMPT;
        }
    }

    /// Parse the input and print its tree, or its errors to stderr
    fn parse_and_print(&self, input: &str) {
        let report = render(input, OutputMode::Ast, self.options);
        if !report.output.is_empty() {
            println!("{}", report.output);
        }
        for error in &report.errors {
            eprintln!("{error}");
        }
    }
}

/// Handle REPL commands (starting with :)
fn handle_command(input: &str) -> CommandResult {
    let trimmed = input.trim();

    if !trimmed.starts_with(':') {
        return CommandResult::Continue;
    }

    let cmd = trimmed.trim_start_matches(':').trim();
    let (cmd_name, args) = cmd.split_once(char::is_whitespace).unwrap_or((cmd, ""));
    let args = args.trim();

    match cmd_name.to_lowercase().as_str() {
        "quit" | "q" | "exit" => CommandResult::Exit,

        "help" | "h" | "?" => CommandResult::Handled(HELP.trim().to_string()),

        "tokens" | "t" => {
            if args.is_empty() {
                return CommandResult::Handled("Usage: :tokens <code>".to_string());
            }
            let report = render(args, OutputMode::Tokens, ParserOptions::default());
            let mut lines = vec![report.output];
            lines.extend(report.errors);
            CommandResult::Handled(lines.join("\n"))
        }

        "debug" | "d" => {
            if args.is_empty() {
                return CommandResult::Handled("Usage: :debug <code>".to_string());
            }
            let report = render(args, OutputMode::Debug, ParserOptions::default());
            let mut lines = vec![report.output];
            lines.extend(report.errors);
            CommandResult::Handled(lines.join("\n"))
        }

        _ => CommandResult::Handled(format!(
            "Unknown command: :{cmd_name}\nType :help for available commands"
        )),
    }
}

/// Check if the input is complete (balanced brackets, no open string or comment)
fn is_complete(input: &str) -> bool {
    let mut depth = 0i32;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                let mut closed = false;
                while let Some(c) = chars.next() {
                    match c {
                        '\\' => {
                            chars.next();
                        }
                        '"' => {
                            closed = true;
                            break;
                        }
                        _ => {}
                    }
                }
                if !closed {
                    return false;
                }
            }
            '`' => {
                if !chars.by_ref().any(|c| c == '`') {
                    return false;
                }
            }
            '#' => {
                chars.by_ref().find(|&c| c == '\n');
            }
            '/' if chars.peek() == Some(&'/') => {
                chars.by_ref().find(|&c| c == '\n');
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                let mut closed = false;
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        closed = true;
                        break;
                    }
                    prev = c;
                }
                if !closed {
                    return false;
                }
            }
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            _ => {}
        }
    }

    // Surplus closers are complete input; the parser reports them
    depth <= 0
}

const HELP: &str = r"
Monkey REPL Commands:
  :help, :h, :?      Show this help message
  :quit, :q          Exit the REPL
  :tokens <code>     Show the token stream for <code>
  :debug <code>      Show the full syntax tree for <code>

Tips:
  - Each input is parsed and printed fully parenthesized
  - Unbalanced brackets continue on the next line
  - Press Ctrl+C to cancel current input
  - Press Ctrl+D to exit
  - Use up/down arrows for history

Examples:
  >> 1 + 2 * 3
  (1 + (2 * 3));
  >> let add = fn(a, b) { a + b };
  let add = fn(a, b) { (a + b); };
";

/// Get the user's home directory
fn home_dir() -> Option<std::path::PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(std::path::PathBuf::from)
}
