//! vernier - interactive unit-aware engineering calculator.
//!
//! With no arguments, runs the REPL with persistent history. With a script
//! path, executes each line of the file as a statement, in order.

use anyhow::{bail, Context, Result};
use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vernier_lang::{Engine, LineOutput};
use vernier_solver::Solver;

#[derive(Parser)]
#[command(
    name = "vernier",
    version,
    about = "Unit-aware engineering calculator with equation solving",
    long_about = "\
vernier is an interactive calculator for engineering computation: arithmetic \
annotated with physical units, session variables, symbolic equations, and \
dependency-driven solving.

Examples:
  vernier                     # interactive session
  vernier worksheet.vn        # run each line of the file as a statement

Statement syntax:
  g = 9.8 meter / second^2    # assignment (trailing ';' suppresses printing)
  f in newton                 # unit conversion; 'f in si' decomposes to SI
  eq f = m * a                # register a symbolic equation
  solve f                     # solve for unknowns via registered equations
  del f | variables | reset   # session management
  import \"other.vn\"           # run another file in this session"
)]
struct Cli {
    /// Script to execute instead of starting the interactive session.
    script: Option<PathBuf>,

    /// History file location (default: ~/.vernier_history).
    #[arg(long)]
    history: Option<PathBuf>,

    /// Increase log verbosity (-v: debug, -vv: trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut engine = Engine::new(Box::new(Solver::new()));

    match &cli.script {
        Some(path) => run_script(&mut engine, path),
        None => run_repl(&mut engine, cli.history),
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("vernier={default_level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Report one executed line; returns false if the statement errored.
fn report(output: &LineOutput) -> bool {
    for diagnostic in &output.diagnostics {
        eprintln!("{diagnostic}");
    }
    match &output.result {
        Ok(outcome) => {
            for line in outcome.render() {
                println!("{line}");
            }
            true
        }
        Err(error) => {
            eprintln!("error: {error}");
            false
        }
    }
}

fn run_script(engine: &mut Engine, path: &PathBuf) -> Result<()> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("cannot read script '{}'", path.display()))?;

    let mut failures = 0usize;
    for line in contents.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if !report(&engine.execute_line(line)) {
            failures += 1;
        }
    }
    if failures > 0 {
        bail!("{failures} statement(s) failed");
    }
    Ok(())
}

fn run_repl(engine: &mut Engine, history: Option<PathBuf>) -> Result<()> {
    let history_path = history.or_else(|| dirs::home_dir().map(|h| h.join(".vernier_history")));

    let mut editor = DefaultEditor::new().context("cannot initialize line editor")?;
    if let Some(path) = &history_path {
        // A missing history file is normal on first run.
        let _ = editor.load_history(path);
    }

    loop {
        match editor.readline("vernier> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(&line);
                report(&engine.execute_line(&line));
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(error) => return Err(error).context("cannot read input"),
        }
    }

    if let Some(path) = &history_path {
        if let Err(error) = editor.save_history(path) {
            tracing::warn!(%error, "could not save history");
        }
    }
    Ok(())
}
