//! `narwhal completions` command

use std::io;

use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_complete::{generate, generate_to};

use crate::cli::{Cli, CompletionsArgs};

pub fn execute(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    let bin = cmd.get_name().to_string();

    match &args.out_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create directory: {}", dir.display()))?;
            let path = generate_to(args.shell, &mut cmd, bin, dir)
                .with_context(|| format!("failed to write completions to {}", dir.display()))?;
            tracing::info!("wrote {} completions to {}", args.shell, path.display());
        }
        None => generate(args.shell, &mut cmd, bin, &mut io::stdout()),
    }

    Ok(())
}
