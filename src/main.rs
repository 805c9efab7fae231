//! logref: deep links from error-logging lines to their issue tracker search.

mod annotate;
mod commands;
mod completeness;
mod config;
mod diagnostics;
mod enrich;
mod error;
mod identifier;
mod link;
mod matcher;
mod pipeline;
mod scanner;
mod types;
mod watch;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

/// Command-line interface.
#[derive(Parser)]
#[command(name = "logref", about = "Deep links from error-logging lines to their issue tracker search")]
struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,

    /// Log matching and scanning decisions to stderr.
    #[arg(global = true, long, short)]
    verbose: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Print one tracker link per error-logging line of a document
    Annotate {
        /// Document URI, e.g. git://github.com/acme/widgets?rev#web/app.tsx
        uri: String,
        /// Read the document text from this file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
        /// Emit annotations as JSON
        #[arg(long)]
        json: bool,
    },
    /// Report settings that are missing for every configured project
    Check,
    /// Show which project a document matches and what its settings lack
    Match {
        /// Document URI
        uri: String,
        /// Emit the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Annotate a document, then re-annotate when it or the settings change
    Watch {
        /// Document URI
        uri: String,
        /// File holding the document text
        #[arg(long)]
        file: PathBuf,
        /// Emit annotations as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let result = match cli.command {
        Commands::Annotate { uri, file, json } => {
            commands::annotate(&uri, file.as_deref(), json).map(|()| return ExitCode::SUCCESS)
        },
        Commands::Check => commands::check(),
        Commands::Match { uri, json } => commands::match_uri(&uri, json).map(|()| return ExitCode::SUCCESS),
        Commands::Watch { uri, file, json } => watch::run(&uri, &file, json).map(|()| return ExitCode::SUCCESS),
    };

    return match result {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::FAILURE
        },
    };
}
