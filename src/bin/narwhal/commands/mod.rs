//! Command implementations

pub mod compilers;
pub mod completions;
pub mod link_order;
pub mod resolve;

use std::path::PathBuf;

use anyhow::{Context, Result};

use narwhal::core::Aol;
use narwhal::ops::{load_project, LoadedProject};
use narwhal::util::GlobalContext;

/// Options shared by every command.
pub struct GlobalArgs {
    pub manifest_path: Option<PathBuf>,
}

/// Locate and load the current project.
pub fn current_project(global: &GlobalArgs) -> Result<LoadedProject> {
    let gctx = GlobalContext::new()?;

    let manifest_path = match &global.manifest_path {
        Some(path) => path.clone(),
        None => gctx.find_manifest().map_err(|e| {
            anyhow::anyhow!(
                "{}\nhelp: Run inside a project directory or pass `--manifest-path`",
                e
            )
        })?,
    };

    load_project(&gctx, &manifest_path)
}

/// Parse an AOL given on the command line.
pub fn parse_aol(s: &str) -> Result<Aol> {
    s.parse::<Aol>()
        .with_context(|| format!("invalid `--aol` value `{}`", s))
}
