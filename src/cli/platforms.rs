//! `aix platforms`: which hosts aix knows about and where their files are.

use super::common::{CommandContext, TargetArgs, print_json};
use crate::platform::{PlatformId, create_platform};
use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

/// Show supported platforms, whether each is installed and its paths.
#[derive(Debug, Parser)]
pub struct PlatformsCommand {
    #[command(flatten)]
    target: TargetArgs,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct PlatformInfo {
    id: PlatformId,
    name: &'static str,
    available: bool,
    scope: crate::core::Scope,
    commands: Option<PathBuf>,
    skills: Option<PathBuf>,
    agents: Option<PathBuf>,
    mcp: Option<PathBuf>,
    instructions: Option<PathBuf>,
}

impl PlatformsCommand {
    /// Run the command.
    pub fn execute(self, ctx: &CommandContext) -> Result<()> {
        let scoped = ctx.scoped(&self.target);
        let ids: Vec<PlatformId> = match self.target.platform.as_deref() {
            Some(name) => ctx
                .registry
                .resolve_platforms(Some(name), &scoped)?
                .iter()
                .map(|p| p.id())
                .collect(),
            None => ctx.registry.all(),
        };

        let infos: Vec<PlatformInfo> = ids
            .into_iter()
            .map(|id| {
                let platform = create_platform(id, &scoped);
                let paths = platform.paths();
                PlatformInfo {
                    id,
                    name: platform.display_name(),
                    available: platform.is_available(),
                    scope: platform.scope(),
                    commands: paths.commands_dir(),
                    skills: paths.skills_dir(),
                    agents: paths.agents_dir(),
                    mcp: paths.mcp_config(),
                    instructions: paths.instructions_file(),
                }
            })
            .collect();

        if self.json {
            return print_json(&infos);
        }
        for info in &infos {
            let mark = if info.available { "✓".green() } else { "✗".red() };
            let state = if info.available { "installed" } else { "not detected" };
            println!("{mark} {} ({}) {}", info.name.bold(), info.id, state.dimmed());
            let show = |label: &str, path: &Option<PathBuf>| match path {
                Some(path) => println!("    {label:<13}{}", path.display()),
                None => println!("    {label:<13}{}", format!("unavailable in {} scope", info.scope).dimmed()),
            };
            show("commands", &info.commands);
            show("skills", &info.skills);
            show("agents", &info.agents);
            show("mcp", &info.mcp);
            show("instructions", &info.instructions);
        }
        Ok(())
    }
}
