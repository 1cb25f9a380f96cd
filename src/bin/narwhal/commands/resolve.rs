//! `narwhal resolve` command

use anyhow::{Context, Result};

use crate::cli::ResolveArgs;
use crate::commands::{current_project, parse_aol, GlobalArgs};
use narwhal::core::{Aol, LibraryType};
use narwhal::ops::resolve_platforms;

pub fn execute(global: &GlobalArgs, args: ResolveArgs) -> Result<()> {
    let project = current_project(global)?;

    let aols: Vec<Aol> = if !args.aols.is_empty() {
        args.aols.iter().map(|s| parse_aol(s)).collect::<Result<_>>()?
    } else if !project.manifest.compile.aols.is_empty() {
        project.manifest.compile.aols.clone()
    } else {
        let host = Aol::host();
        tracing::info!("No platforms configured, resolving for host {}", host);
        vec![host]
    };

    let types = args
        .types
        .iter()
        .map(|t| t.parse::<LibraryType>())
        .collect::<Result<Vec<_>, _>>()?;

    let settings = resolve_platforms(&project.context, &aols, &types).with_context(|| {
        format!(
            "failed to resolve compile settings for {}",
            project.manifest.project
        )
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    for s in &settings {
        println!("{}:", s.aol);

        if s.max_cores == 0 {
            println!("  max cores:     unlimited ({} jobs)", s.jobs);
        } else {
            println!("  max cores:     {}", s.max_cores);
        }
        println!("  libtool:       {}", s.libtool);
        println!("  fail on error: {}", s.fail_on_error);
        println!("  runtime:       {}", s.runtime);

        for output in &s.outputs {
            println!("  output:        {} ({})", output.name, output.library_type);
        }

        if s.compilers.is_empty() {
            println!("  compilers:     (none)");
        } else {
            let compilers: Vec<String> = s
                .compilers
                .iter()
                .map(|c| format!("{} ({})", c.family, c.name))
                .collect();
            println!("  compilers:     {}", compilers.join(", "));
        }
        println!();
    }

    Ok(())
}
