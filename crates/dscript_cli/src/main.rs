//! dsc: The dscript front-end CLI.
//!
//! Usage:
//!   dsc parse <file> [--optimize]
//!   dsc hash <file>
//!   dsc tokens <file>

use std::fmt::Write as _;
use std::io::IsTerminal;
use std::process;

use clap::{ArgAction, Parser as ClapParser, Subcommand};
use dscript_compiler::ParserOptions;
use dscript_core::text::Position;
use dscript_diagnostics::{messages, ParseError};
use dscript_module::{FileSystem, OsFileSystem};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(ClapParser, Debug)]
#[command(name = "dsc", about = "dscript - parser front end for a TypeScript dialect")]
struct Cli {
    /// Increase logging verbosity (-v: debug, -vv+: trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a file and its imports and print the syntax tree.
    Parse {
        #[arg(value_name = "FILE")]
        file: String,

        /// Rewrite terminal self calls into tail calls.
        #[arg(long)]
        optimize: bool,
    },
    /// Print the SHA-256 of a file and everything it imports.
    Hash {
        #[arg(value_name = "FILE")]
        file: String,
    },
    /// Print the token stream of a single file.
    Tokens {
        #[arg(value_name = "FILE")]
        file: String,
    },
}

// ANSI color codes
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";
const GRAY: &str = "\x1b[90m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive_for_verbosity(cli.verbose))),
        )
        .with_writer(std::io::stderr)
        .init();

    let fs = match OsFileSystem::new() {
        Ok(fs) => fs,
        Err(err) => {
            print_error(&format!("cannot read the working directory: {err}"));
            process::exit(1);
        }
    };

    let result = match &cli.command {
        Command::Parse { file, optimize } => run_parse(&fs, file, *optimize),
        Command::Hash { file } => run_hash(&fs, file),
        Command::Tokens { file } => run_tokens(&fs, file),
    };

    match result {
        Ok(output) => print!("{output}"),
        Err(err) => {
            print_parse_error(&err);
            process::exit(1);
        }
    }
}

fn directive_for_verbosity(v: u8) -> &'static str {
    match v {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

fn run_parse(fs: &OsFileSystem, file: &str, optimize: bool) -> Result<String, ParseError> {
    let options = ParserOptions { optimizations: optimize };
    let module = dscript_compiler::parse(fs, file, options)?;
    debug!(imported = module.imported_files.len(), "parsed");

    let mut out = String::new();
    let _ = writeln!(out, "// {}", module.entry_file.path);
    let _ = writeln!(out, "{:#?}", module.entry_file);
    for (_, imported) in module.sorted_imports() {
        let _ = writeln!(out, "// {}", imported.path);
        let _ = writeln!(out, "{:#?}", imported);
    }
    Ok(out)
}

fn run_hash(fs: &OsFileSystem, file: &str) -> Result<String, ParseError> {
    let digest = dscript_compiler::hash(fs, file)?;
    let mut out = String::with_capacity(digest.len() * 2 + 1);
    for byte in digest {
        let _ = write!(out, "{byte:02x}");
    }
    out.push('\n');
    Ok(out)
}

fn run_tokens(fs: &OsFileSystem, file: &str) -> Result<String, ParseError> {
    let path = dscript_module::resolve_entry(fs, file)?;
    let source = fs.read_to_string(&path).map_err(|err| {
        ParseError::from_message(&messages::CANNOT_READ_FILE, Position::start(), &[&path, &err.to_string()])
    })?;
    let tokens = dscript_scanner::tokenize(&dscript_scanner::prepare_source(&source))?;

    let mut out = String::new();
    for token in tokens {
        let _ = writeln!(out, "{:<8} {:<24} {}", token.position.to_string(), format!("{:?}", token.kind), token.text);
    }
    Ok(out)
}

fn print_parse_error(err: &ParseError) {
    if std::io::stderr().is_terminal() {
        eprintln!(
            "{}{}{}{}: {}\n {}->{} {}{}{}",
            BOLD, RED, err.kind, RESET, err.message, GRAY, RESET, CYAN, err.position, RESET
        );
    } else {
        eprintln!("{}: {}", err.kind, err);
    }
}

fn print_error(msg: &str) {
    if std::io::stderr().is_terminal() {
        eprintln!("{}{}error{}: {}", BOLD, RED, RESET, msg);
    } else {
        eprintln!("error: {}", msg);
    }
}
