//! Narwhal CLI - per-platform compile configuration

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("narwhal=debug")
    } else {
        EnvFilter::new("narwhal=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let global = commands::GlobalArgs {
        manifest_path: cli.manifest_path,
    };

    // Execute command
    match cli.command {
        Commands::Resolve(args) => commands::resolve::execute(&global, args),
        Commands::Compilers(args) => commands::compilers::execute(&global, args),
        Commands::LinkOrder(args) => commands::link_order::execute(&global, args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
