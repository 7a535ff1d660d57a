//! Command-line runner for the headless app.
//!
//! Boots the app, visits each path given on the command line, lets every
//! pending timer fire and prints the resulting document.
//!
//! # Usage
//!
//! ```text
//! redbank [--config FILE] [--quiet] [PATH...]
//! ```
//!
//! - `--config FILE`: TOML settings, see [`redbank::Config`]
//! - `--quiet`: print only the page titles, not the final document
//! - `PATH`: paths to navigate to in order; the app starts at `/`
//!
//! # Example
//!
//! ```text
//! $ redbank / /about /missing --quiet
//! /         Home | Red Bank
//! /about    About | Red Bank
//! /missing  Not found | Red Bank
//! ```

#![allow(clippy::multiple_crate_versions)]

use std::process::ExitCode;

use redbank::observability::init_tracing;
use redbank::{initialize, AppError, Config, Result};

const USAGE: &str = "usage: redbank [--config FILE] [--quiet] [PATH...]";

struct Args {
    config: Option<String>,
    quiet: bool,
    paths: Vec<String>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut parsed = Args {
        config: None,
        quiet: false,
        paths: Vec::new(),
    };
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let file = args
                    .next()
                    .ok_or_else(|| AppError::InvalidArgument("--config needs a file".to_string()))?;
                parsed.config = Some(file);
            }
            "--quiet" | "-q" => parsed.quiet = true,
            flag if flag.starts_with('-') => {
                return Err(AppError::InvalidArgument(format!("unknown flag {flag}")));
            }
            _ => parsed.paths.push(arg),
        }
    }
    Ok(parsed)
}

fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(file) => Config::from_file(redbank::infrastructure::expand_tilde(file))?,
        None => Config::default(),
    };
    init_tracing(&config);

    let span = tracing::debug_span!("run", paths = args.paths.len());
    let _guard = span.entered();

    let app = initialize(config, "/")?;
    app.settle();

    for path in &args.paths {
        app.router().navigate(path)?;
        let fired = app.settle();
        tracing::debug!(path = %path, fired, "page settled");
        println!("{:<9} {}", app.router().current_path(), app.document().title());
    }

    if !args.quiet {
        println!("{}", app.document().to_html());
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("redbank: {err}");
            ExitCode::FAILURE
        }
    }
}
