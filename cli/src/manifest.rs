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

use anyhow::Context;
use meshbridge_core::RunnerConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default manifest file name, looked up in the working directory.
pub const MANIFEST_NAME: &str = "Meshbridge.toml";

/// Represents the structure of the `Meshbridge.toml` manifest file.
#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct BridgeManifest {
    /// Directory the filter scripts live in.
    pub script_directory: PathBuf,
    /// Runner configuration (`keep_temp_dir`, output attributes).
    pub runner: RunnerConfig,
}

impl Default for BridgeManifest {
    /// Provides a default configuration if `Meshbridge.toml` is not found.
    ///
    /// The default points the script directory at `scripts/` next to the
    /// working directory.
    fn default() -> Self {
        Self {
            script_directory: PathBuf::from("scripts"),
            runner: RunnerConfig::default(),
        }
    }
}

impl BridgeManifest {
    /// Loads the manifest.
    ///
    /// With an explicit `path` the file must exist and parse. Without one,
    /// a missing `Meshbridge.toml` silently falls back to the defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path, true),
            None => (Path::new(MANIFEST_NAME), false),
        };
        match std::fs::read_to_string(path) {
            Ok(text) => toml::from_str(&text)
                .with_context(|| format!("failed to parse {}", path.display())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound && !explicit => {
                log::debug!("no manifest at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(err) => {
                Err(err).with_context(|| format!("failed to read {}", path.display()))
            }
        }
    }
}
