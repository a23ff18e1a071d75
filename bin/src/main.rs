use std::{
    io::{stdin, stdout, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Context;
use clap::Parser;
use errors::CompileErrors;
use interpreter::{InterpretError, Interpreter, Lox};

/// Lexical or syntax error.
const EXIT_DATA_ERR: u8 = 65;
/// Runtime error.
const EXIT_SOFTWARE: u8 = 70;

#[derive(clap::Parser)]
#[command(about = "Tree-walking interpreter for Lox")]
struct Args {
    /// Without a command, starts an interactive prompt.
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Print every token of the file
    Tokenize { file: PathBuf },
    /// Print the syntax tree of the single expression in the file
    Parse { file: PathBuf },
    /// Print the value of the single expression in the file
    Evaluate { file: PathBuf },
    /// Run the file as a program
    Run { file: PathBuf },
}

fn read(path: &Path) -> anyhow::Result<String> {
    log::debug!("Reading {}", path.display());
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn report(errors: &CompileErrors) -> ExitCode {
    eprintln!("{errors}");
    ExitCode::from(EXIT_DATA_ERR)
}

fn tokenize(source: &str) -> anyhow::Result<ExitCode> {
    let scanned = scanner::tokenize(source);

    let mut out = stdout().lock();
    for token in &scanned.tokens {
        writeln!(out, "{token}")?;
    }

    if scanned.had_error() {
        return Ok(report(&scanned.errors));
    }
    Ok(ExitCode::SUCCESS)
}

fn parse(source: &str) -> anyhow::Result<ExitCode> {
    let tokens = match scanner::tokenize(source).into_result() {
        Ok(tokens) => tokens,
        Err(errors) => return Ok(report(&errors)),
    };

    match parser::parse_expression(tokens) {
        Ok(expr) => {
            println!("{expr}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => Ok(report(&e.into())),
    }
}

fn evaluate(source: &str) -> anyhow::Result<ExitCode> {
    let tokens = match scanner::tokenize(source).into_result() {
        Ok(tokens) => tokens,
        Err(errors) => return Ok(report(&errors)),
    };

    let expr = match parser::parse_expression(tokens) {
        Ok(expr) => expr,
        Err(e) => return Ok(report(&e.into())),
    };

    match Interpreter::new().evaluate(&expr) {
        Ok(value) => {
            println!("{value}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{e}");
            Ok(ExitCode::from(EXIT_SOFTWARE))
        }
    }
}

fn run(source: &str) -> anyhow::Result<ExitCode> {
    match Lox::new().run_source(source, &mut stdout().lock()) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(InterpretError::CompileError(errors)) => Ok(report(&errors)),
        Err(InterpretError::RuntimeError(e)) => {
            eprintln!("{e}");
            Ok(ExitCode::from(EXIT_SOFTWARE))
        }
    }
}

fn run_prompt() -> anyhow::Result<ExitCode> {
    let mut lox = Lox::new();
    loop {
        print!("> ");
        stdout().flush()?;
        let mut line = String::new();
        if stdin().read_line(&mut line)? == 0 {
            // Ctrl-D
            println!();
            return Ok(ExitCode::SUCCESS);
        }
        if let Err(e) = lox.run_source(&line, &mut stdout().lock()) {
            eprintln!("{e}");
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Some(Command::Tokenize { file }) => tokenize(&read(&file)?),
        Some(Command::Parse { file }) => parse(&read(&file)?),
        Some(Command::Evaluate { file }) => evaluate(&read(&file)?),
        Some(Command::Run { file }) => run(&read(&file)?),
        None => run_prompt(),
    }
}
