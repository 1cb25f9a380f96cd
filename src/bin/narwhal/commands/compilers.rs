//! `narwhal compilers` command

use anyhow::Result;

use crate::cli::CompilersArgs;
use crate::commands::{current_project, parse_aol, GlobalArgs};
use narwhal::core::Aol;

pub fn execute(global: &GlobalArgs, args: CompilersArgs) -> Result<()> {
    let project = current_project(global)?;
    let ctx = &project.context;

    let aol = match &args.aol {
        Some(s) => parse_aol(s)?,
        None => Aol::host(),
    };

    println!("Compilers for {} on {}:", project.manifest.project, aol);

    let active = ctx.active_compilers();
    if active.is_empty() {
        println!("  (none)");
        println!();
        println!(
            "help: Add a [compile.c], [compile.cpp] or [compile.fortran] section, \
             or set `only-specified-compilers = true`"
        );
    }

    for compiler in active {
        println!("  {:<8} {}", compiler.family().to_string(), compiler.name(&aol)?);

        let config = compiler.config();
        if !config.options.is_empty() {
            println!("           options: {}", config.options.join(" "));
        }
        if !config.defines.is_empty() {
            println!("           defines: {}", config.defines.join(" "));
        }
    }

    let java = ctx.java().config();
    println!(
        "  {:<8} include={} link={} runtime={}",
        "Java", java.include, java.link, java.runtime
    );

    Ok(())
}
