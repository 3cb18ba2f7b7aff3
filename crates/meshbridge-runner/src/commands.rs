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

//! The bridge's command table.
//!
//! A front end installs these handlers into a
//! [`CommandRegistry`](meshbridge_core::CommandRegistry) once at startup and
//! dispatches user actions by id. The canonical flow is two dispatches:
//! `mesh.list_scripts` to populate the selection, then `mesh.run_filter`
//! with the user's pick in
//! [`CommandContext::selected_script`](meshbridge_core::CommandContext).

use crate::run::FilterRunner;
use meshbridge_core::command::CommandRegistry;
use meshbridge_io::scripts::find_script_files;

/// Id of the command that runs the selected filter script.
pub const CMD_RUN_FILTER: &str = "mesh.run_filter";
/// Id of the command that lists the available filter scripts.
pub const CMD_LIST_SCRIPTS: &str = "mesh.list_scripts";

/// File suffix (without the dot) that identifies a filter script.
pub const SCRIPT_SUFFIX: &str = "mlx";

/// Installs the bridge's commands into `registry`.
///
/// `mesh.list_scripts` fills `ctx.scripts` with the `.mlx` files of
/// `ctx.script_dir`. `mesh.run_filter` runs `ctx.selected_script` (resolved
/// against `ctx.script_dir` when relative) on the host's active object and
/// records the created object in `ctx.created_object`.
pub fn register_commands(registry: &mut CommandRegistry, runner: FilterRunner) {
    registry.register(CMD_LIST_SCRIPTS, |ctx| {
        ctx.scripts = find_script_files(&ctx.script_dir, SCRIPT_SUFFIX)?;
        log::debug!(
            "found {} filter scripts in {}",
            ctx.scripts.len(),
            ctx.script_dir.display()
        );
        Ok(())
    });

    registry.register(CMD_RUN_FILTER, move |ctx| {
        let script = ctx
            .selected_script
            .clone()
            .ok_or_else(|| anyhow::anyhow!("no filter script selected"))?;
        let script = if script.is_absolute() {
            script
        } else {
            ctx.script_dir.join(script)
        };
        let created = runner.run_filter(ctx.host, ctx.reporter, &script)?;
        ctx.created_object = Some(created);
        Ok(())
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshbridge_core::command::CommandContext;
    use meshbridge_core::report::LogReporter;
    use meshbridge_host::HeadlessHost;
    use tempfile::tempdir;

    #[test]
    fn test_both_commands_are_registered() {
        let mut registry = CommandRegistry::new();
        register_commands(&mut registry, FilterRunner::default());
        assert!(registry.contains(CMD_RUN_FILTER));
        assert!(registry.contains(CMD_LIST_SCRIPTS));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_list_scripts_fills_context() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("smooth.mlx"), "").unwrap();
        std::fs::write(dir.path().join("readme.md"), "").unwrap();

        let mut registry = CommandRegistry::new();
        register_commands(&mut registry, FilterRunner::default());

        let mut host = HeadlessHost::new();
        let mut ctx = CommandContext::new(&mut host, &LogReporter, dir.path());
        registry.run(CMD_LIST_SCRIPTS, &mut ctx).unwrap();

        assert_eq!(ctx.scripts, vec![dir.path().join("smooth.mlx")]);
    }

    #[test]
    fn test_run_filter_without_selection_fails() {
        let mut registry = CommandRegistry::new();
        register_commands(&mut registry, FilterRunner::default());

        let mut host = HeadlessHost::new();
        let mut ctx = CommandContext::new(&mut host, &LogReporter, "scripts");
        let err = registry.run(CMD_RUN_FILTER, &mut ctx).unwrap_err();
        assert!(err.to_string().contains("no filter script selected"));
    }
}
