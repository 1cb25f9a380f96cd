//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Narwhal - per-platform compile configuration for multi-target native builds
#[derive(Parser)]
#[command(name = "narwhal")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to Narwhal.toml (defaults to searching upward from the current directory)
    #[arg(long, global = true, env = "NARWHAL_MANIFEST_PATH")]
    pub manifest_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the effective compile settings for each platform
    Resolve(ResolveArgs),

    /// List the active compilers
    Compilers(CompilersArgs),

    /// Show the dependency link order
    LinkOrder(LinkOrderArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Platforms to resolve, as <arch>-<os>-<linker> (defaults to the manifest's `aols`)
    #[arg(long = "aol")]
    pub aols: Vec<String>,

    /// Library types to compute output names for
    #[arg(long = "type", default_value = "shared")]
    pub types: Vec<String>,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CompilersArgs {
    /// Platform used to resolve compiler names (defaults to the host)
    #[arg(long)]
    pub aol: Option<String>,
}

#[derive(Args)]
pub struct LinkOrderArgs {
    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,

    /// Write the completion script into this directory instead of stdout
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}
