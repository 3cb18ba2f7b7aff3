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

//! A string-keyed command table for front-end dispatch.
//!
//! The [`CommandRegistry`] maps a command identifier (e.g. `mesh.run_filter`)
//! to a handler closure. Front ends build the table once at startup with an
//! explicit registration call per command, then route every user action
//! through [`CommandRegistry::run`]. There is no reflection and no implicit
//! discovery, so the full command surface is visible in one place.
//!
//! Handlers receive a [`CommandContext`]: mutable access to the host scene,
//! the report sink, and the per-invocation inputs and outputs a command
//! exchanges with its front end.

use crate::host::HostEnvironment;
use crate::report::Reporter;
use crate::scene::ObjectId;
use std::collections::HashMap;
use std::path::PathBuf;

/// Everything a command handler can see and touch during one dispatch.
pub struct CommandContext<'a> {
    /// The host scene the command operates on.
    pub host: &'a mut dyn HostEnvironment,
    /// Sink for user-facing notifications.
    pub reporter: &'a dyn Reporter,
    /// Directory the host's filter scripts live in.
    pub script_dir: PathBuf,
    /// The script the user picked, for commands that run one.
    pub selected_script: Option<PathBuf>,
    /// Filled by discovery commands: the scripts available for selection.
    pub scripts: Vec<PathBuf>,
    /// Filled by a successful filter run: the object it introduced.
    pub created_object: Option<ObjectId>,
}

impl<'a> CommandContext<'a> {
    /// Creates a context over a host and reporter with no script selected.
    pub fn new(
        host: &'a mut dyn HostEnvironment,
        reporter: &'a dyn Reporter,
        script_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            host,
            reporter,
            script_dir: script_dir.into(),
            selected_script: None,
            scripts: Vec::new(),
            created_object: None,
        }
    }
}

type CommandHandler =
    Box<dyn for<'a> Fn(&mut CommandContext<'a>) -> anyhow::Result<()> + Send + Sync>;

/// A registry mapping command identifiers to handler closures.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, CommandHandler>,
}

impl CommandRegistry {
    /// Creates an empty command registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Registers a handler under `id`.
    ///
    /// If a handler was already registered under the same id, it is replaced.
    pub fn register<F>(&mut self, id: impl Into<String>, handler: F)
    where
        F: for<'a> Fn(&mut CommandContext<'a>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.commands.insert(id.into(), Box::new(handler));
    }

    /// Dispatches the command registered under `id`.
    ///
    /// # Errors
    /// Fails if no handler is registered under `id`, or with whatever error
    /// the handler itself returns.
    pub fn run(&self, id: &str, ctx: &mut CommandContext<'_>) -> anyhow::Result<()> {
        let handler = self
            .commands
            .get(id)
            .ok_or_else(|| anyhow::anyhow!("no command registered under id '{id}'"))?;
        handler(ctx)
    }

    /// Returns `true` if a handler is registered under `id`.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.commands.contains_key(id)
    }

    /// Returns the registered command identifiers, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Returns the number of registered commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if no commands are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostError;
    use crate::math::{Quaternion, Vec3};
    use crate::report::{Report, Reporter};
    use std::path::Path;

    /// A host with no scene at all; every object lookup fails.
    struct EmptyHost;

    impl HostEnvironment for EmptyHost {
        fn active_object(&self) -> Option<ObjectId> {
            None
        }
        fn object_name(&self, id: ObjectId) -> Result<String, HostError> {
            Err(HostError::ObjectNotFound { id })
        }
        fn object_scale(&self, id: ObjectId) -> Result<Vec3, HostError> {
            Err(HostError::ObjectNotFound { id })
        }
        fn export_active_mesh(&self, _path: &Path) -> Result<(), HostError> {
            Err(HostError::NoActiveObject)
        }
        fn import_mesh(&mut self, path: &Path) -> Result<ObjectId, HostError> {
            Err(HostError::ImportFailed {
                path: path.display().to_string(),
                reason: "empty host".to_string(),
            })
        }
        fn rename_object(&mut self, id: ObjectId, _name: String) -> Result<String, HostError> {
            Err(HostError::ObjectNotFound { id })
        }
        fn deselect_all(&mut self) {}
        fn select_only(&mut self, id: ObjectId) -> Result<(), HostError> {
            Err(HostError::ObjectNotFound { id })
        }
        fn rotate_object(&mut self, id: ObjectId, _r: Quaternion) -> Result<(), HostError> {
            Err(HostError::ObjectNotFound { id })
        }
        fn set_object_scale(&mut self, id: ObjectId, _s: Vec3) -> Result<(), HostError> {
            Err(HostError::ObjectNotFound { id })
        }
    }

    struct NullReporter;
    impl Reporter for NullReporter {
        fn report(&self, _report: Report) {}
    }

    #[test]
    fn test_register_and_run() {
        let mut registry = CommandRegistry::new();
        registry.register("test.mark", |ctx| {
            ctx.scripts.push(PathBuf::from("marked.mlx"));
            Ok(())
        });

        let mut host = EmptyHost;
        let mut ctx = CommandContext::new(&mut host, &NullReporter, "scripts");
        registry.run("test.mark", &mut ctx).unwrap();
        assert_eq!(ctx.scripts, vec![PathBuf::from("marked.mlx")]);
    }

    #[test]
    fn test_run_unknown_id_fails() {
        let registry = CommandRegistry::new();
        let mut host = EmptyHost;
        let mut ctx = CommandContext::new(&mut host, &NullReporter, "scripts");
        assert!(registry.run("missing", &mut ctx).is_err());
    }

    #[test]
    fn test_handler_errors_propagate() {
        let mut registry = CommandRegistry::new();
        registry.register("test.fail", |_ctx| anyhow::bail!("boom"));

        let mut host = EmptyHost;
        let mut ctx = CommandContext::new(&mut host, &NullReporter, "scripts");
        let err = registry.run("test.fail", &mut ctx).unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_ids_are_sorted() {
        let mut registry = CommandRegistry::new();
        registry.register("b", |_| Ok(()));
        registry.register("a", |_| Ok(()));
        assert_eq!(registry.ids(), vec!["a", "b"]);
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("a"));
        assert!(!registry.is_empty());
    }
}
