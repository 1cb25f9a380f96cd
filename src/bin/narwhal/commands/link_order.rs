//! `narwhal link-order` command

use anyhow::Result;

use crate::cli::LinkOrderArgs;
use crate::commands::{current_project, GlobalArgs};

pub fn execute(global: &GlobalArgs, args: LinkOrderArgs) -> Result<()> {
    let project = current_project(global)?;
    let order = project.context.dependency_link_order();

    if args.json {
        println!("{}", serde_json::to_string_pretty(order)?);
        return Ok(());
    }

    println!("Link order for {}:", project.manifest.project);
    if order.is_empty() {
        println!("  (no link order constraints)");
    }
    for (index, lib) in order.iter().enumerate() {
        println!("  {}. {}", index + 1, lib);
    }

    Ok(())
}
