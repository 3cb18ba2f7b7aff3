// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Command-line front end for the bridge: runs MeshLab filter scripts on
// mesh files through the headless host.
// Run with: meshbridge <command>

mod manifest;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use manifest::BridgeManifest;
use meshbridge_core::command::{CommandContext, CommandRegistry};
use meshbridge_core::{HostEnvironment, Severity};
use meshbridge_host::HeadlessHost;
use meshbridge_runner::commands::{register_commands, CMD_LIST_SCRIPTS, CMD_RUN_FILTER};
use meshbridge_runner::{ChannelReporter, FilterRunner, NEW_OBJECT_SUFFIX};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "meshbridge", version, about = "Run MeshLab filter scripts on mesh files")]
struct Cli {
    /// Path to the Meshbridge.toml manifest (defaults to the working directory).
    #[arg(long, global = true)]
    manifest: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the filter scripts available for selection.
    Scripts {
        /// Directory to scan instead of the manifest's script directory.
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Run a filter script on a mesh file and write the processed result.
    Run {
        /// Filter script to run (absolute, or relative to the script directory).
        #[arg(short, long)]
        script: PathBuf,
        /// Input mesh file (ASCII PLY).
        #[arg(short, long)]
        input: PathBuf,
        /// Output mesh file; defaults to the input name with `_meshlab` appended.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Retain the temporary work directory for inspection.
        #[arg(long)]
        keep_temp: bool,
    },
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let manifest = BridgeManifest::load(cli.manifest.as_deref())?;

    match cli.command {
        Commands::Scripts { dir } => cmd_scripts(manifest, dir),
        Commands::Run {
            script,
            input,
            output,
            keep_temp,
        } => cmd_run(manifest, script, input, output, keep_temp),
    }
}

fn cmd_scripts(manifest: BridgeManifest, dir: Option<PathBuf>) -> Result<()> {
    let script_dir = dir.unwrap_or(manifest.script_directory);

    let mut registry = CommandRegistry::new();
    register_commands(&mut registry, FilterRunner::new(manifest.runner));

    let mut host = HeadlessHost::new();
    let (reporter, _reports) = ChannelReporter::new();
    let mut ctx = CommandContext::new(&mut host, &reporter, script_dir.clone());
    registry.run(CMD_LIST_SCRIPTS, &mut ctx)?;

    if ctx.scripts.is_empty() {
        println!("No filter scripts in {}", script_dir.display());
        return Ok(());
    }
    for script in &ctx.scripts {
        if let Some(name) = script.file_name().and_then(|n| n.to_str()) {
            println!("{name}");
        }
    }
    Ok(())
}

fn cmd_run(
    manifest: BridgeManifest,
    script: PathBuf,
    input: PathBuf,
    output: Option<PathBuf>,
    keep_temp: bool,
) -> Result<()> {
    let mut config = manifest.runner;
    if keep_temp {
        config.keep_temp_dir = true;
    }

    let mut host = HeadlessHost::new();
    let source = host
        .import_mesh(&input)
        .with_context(|| format!("failed to load {}", input.display()))?;
    host.select_only(source)?;

    let mut registry = CommandRegistry::new();
    register_commands(&mut registry, FilterRunner::new(config));

    let (reporter, reports) = ChannelReporter::new();
    let mut ctx = CommandContext::new(&mut host, &reporter, manifest.script_directory);
    ctx.selected_script = Some(script);
    let outcome = registry.run(CMD_RUN_FILTER, &mut ctx);
    let created = ctx.created_object;
    drop(ctx);

    for report in reports.try_iter() {
        match report.severity {
            Severity::Info => println!("{}", report.message),
            Severity::Error => eprintln!("error: {}", report.message),
        }
    }
    outcome?;

    let created = created.context("filter run finished without creating an object")?;
    let output = output.unwrap_or_else(|| default_output(&input));
    host.save_object(created, &output)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!("Wrote {}", output.display());
    Ok(())
}

/// `bunny.ply` becomes `bunny_meshlab.ply` next to the input.
fn default_output(input: &std::path::Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    input.with_file_name(format!("{stem}{NEW_OBJECT_SUFFIX}.ply"))
}
