use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

mod bytecode;
mod driver;
mod error;
mod expr;
mod lex;
mod parse;
mod scope;
mod value;
mod vm;

#[derive(Parser)]
struct Cli {
    /// Script to run
    script: PathBuf,
}

/// Logs go to stderr and only when `RUST_LOG` is set, e.g. `RUST_LOG=mjs=trace`.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn main() -> anyhow::Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();

    let mut source = Vec::new();
    File::open(&cli.script)
        .and_then(|mut file| file.read_to_end(&mut source))
        .with_context(|| format!("cannot read {}", cli.script.display()))?;

    let status = interpret(&source, io::stdout().lock())?;
    Ok(ExitCode::from(status))
}

/// Runs `source` with program output and any diagnostic on `out`; returns the exit status.
fn interpret<W: Write>(source: &[u8], mut out: W) -> io::Result<u8> {
    match driver::run(source, &mut out) {
        Ok(()) => Ok(0),
        Err(diag) => {
            writeln!(out, "{diag}")?;
            Ok(1)
        }
    }
}
