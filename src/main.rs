//! cst - Circus Skills Tracker CLI
//!
//! Skill catalog, weekly class plans and student progress for aerial-arts teachers.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cst::Result;
use cst::app::AppContext;
use cst::cli::output::{OutputFormat, emit_json, robot_error_structured};
use cst::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);
    if cli.output_format() == OutputFormat::Plain {
        colored::control::set_override(false);
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.robot_mode() {
                // Robot mode: structured JSON error on stdout
                let response = robot_error_structured(&e);
                if emit_json(&response).is_err() {
                    println!("{{\"status\":\"error\",\"message\":{:?}}}", e.to_string());
                }
            } else {
                eprintln!("Error: {e}");
                let suggestion = cst::error::suggest_for_error(e.code(), e.context().as_ref());
                if !suggestion.is_empty() {
                    eprintln!("  {suggestion}");
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let ctx = AppContext::from_cli(cli)?;
    cst::cli::commands::run(&ctx, &cli.command)
}

fn init_tracing(cli: &Cli) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn,cst=info",
        1 => "info,cst=debug",
        2 => "debug,cst=trace",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if cli.robot_mode() {
        // JSON logging for robot mode
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        // Human-readable logging
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
