//! Loading a compile context from a project directory.

use std::path::Path;

use anyhow::{Context, Result};

use crate::compile::CompileContext;
use crate::core::Manifest;
use crate::util::GlobalContext;

/// A loaded project: its manifest plus the compile context built from it.
#[derive(Debug, Clone)]
pub struct LoadedProject {
    pub manifest: Manifest,
    pub context: CompileContext,
}

/// Load the manifest at `manifest_path` and build its compile context,
/// layering the global and project config underneath it.
///
/// The property resource is not read here; it is loaded on the first query.
pub fn load_project(gctx: &GlobalContext, manifest_path: &Path) -> Result<LoadedProject> {
    let manifest = Manifest::load(manifest_path)
        .with_context(|| format!("failed to load project at {}", manifest_path.display()))?;

    let config = gctx.load_config(manifest.root());
    let context = manifest.compile_config(&config).build(manifest.nar_info());

    tracing::debug!(
        "loaded {} (properties: {})",
        manifest.project,
        context.info().location()
    );

    Ok(LoadedProject { manifest, context })
}
