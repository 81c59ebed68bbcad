//! Proto CLI

use clap::{Parser, Subcommand};
use proto::error::report_error;
use proto::{Config, Error, Interpreter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "proto", version, about = "Proto - prototype-based object language runtime")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a program given as a JSON-encoded AST
    Run {
        /// Program file
        file: PathBuf,
        /// TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Decode a program and print it back as source-like text (debug)
    Dump {
        /// Program file
        file: PathBuf,
    },
    /// Start an interactive session
    Repl {
        /// TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    proto::init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Run { file, config } => run_file(&file, config.as_deref()),
        Command::Dump { file } => dump_file(&file),
        Command::Repl { config } => start_repl(config.as_deref()),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

type CliResult = Result<ExitCode, Box<dyn std::error::Error>>;

/// Read a file, decoding it with `decode`. Decode failures are rendered
/// against the file's text and reported as `None`.
fn load<T>(path: &Path, decode: impl FnOnce(&str) -> proto::Result<T>) -> proto::Result<Option<T>> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| Error::io_error(format!("{}: {e}", path.display())))?;
    match decode(&source) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            report_error(&path.display().to_string(), &source, &err);
            Ok(None)
        }
    }
}

fn load_config(path: Option<&Path>) -> proto::Result<Option<Config>> {
    match path {
        Some(path) => load(path, Config::from_toml_str),
        None => Ok(Some(Config::default())),
    }
}

fn run_file(path: &Path, config: Option<&Path>) -> CliResult {
    let Some(config) = load_config(config)? else {
        return Ok(ExitCode::FAILURE);
    };
    let Some(program) = load(path, proto::ast::from_json)? else {
        return Ok(ExitCode::FAILURE);
    };

    let mut interpreter = Interpreter::with_config(std::io::stdout(), config);
    match interpreter.run(&program) {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            // Diagnostics follow the program's own output on stdout
            println!("{err}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn dump_file(path: &Path) -> CliResult {
    let Some(program) = load(path, proto::ast::from_json)? else {
        return Ok(ExitCode::FAILURE);
    };
    println!("{program}");
    Ok(ExitCode::SUCCESS)
}

fn start_repl(config: Option<&Path>) -> CliResult {
    let Some(config) = load_config(config)? else {
        return Ok(ExitCode::FAILURE);
    };
    let mut repl = proto::repl::Repl::new(config)?;
    repl.run()?;
    Ok(ExitCode::SUCCESS)
}
