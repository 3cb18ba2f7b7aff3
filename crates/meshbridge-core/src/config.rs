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

//! Runner configuration.
//!
//! One explicit struct, passed in at construction, instead of process-wide
//! mutable flags. Deserializable so front ends can load it from a manifest
//! file.

use serde::Deserialize;

/// The per-element attributes the filter server is asked to write into its
/// output file.
///
/// Rendered as the server's `-m` argument, a space-separated subset of
/// `vc vn fn fc vt`, in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OutputAttributes {
    /// Per-vertex color (`vc`).
    pub vertex_color: bool,
    /// Per-vertex normal (`vn`).
    pub vertex_normal: bool,
    /// Per-face normal (`fn`).
    pub face_normal: bool,
    /// Per-face color (`fc`).
    pub face_color: bool,
    /// Per-vertex texture coordinates (`vt`).
    pub texture_coords: bool,
}

impl OutputAttributes {
    /// All attributes enabled.
    pub const ALL: Self = Self {
        vertex_color: true,
        vertex_normal: true,
        face_normal: true,
        face_color: true,
        texture_coords: true,
    };

    /// Renders the server's `-m` argument value, e.g. `"vc vn fn fc vt"`.
    #[must_use]
    pub fn as_server_arg(&self) -> String {
        let mut flags = Vec::new();
        if self.vertex_color {
            flags.push("vc");
        }
        if self.vertex_normal {
            flags.push("vn");
        }
        if self.face_normal {
            flags.push("fn");
        }
        if self.face_color {
            flags.push("fc");
        }
        if self.texture_coords {
            flags.push("vt");
        }
        flags.join(" ")
    }
}

impl Default for OutputAttributes {
    /// All attributes enabled.
    fn default() -> Self {
        Self::ALL
    }
}

/// Configuration for a filter run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Retain the temporary work directory instead of removing it, so its
    /// interchange files can be inspected after a run.
    pub keep_temp_dir: bool,
    /// Attributes requested from the filter server's output.
    pub output_attributes: OutputAttributes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_requests_every_attribute() {
        assert_eq!(OutputAttributes::default().as_server_arg(), "vc vn fn fc vt");
    }

    #[test]
    fn test_disabled_attributes_are_omitted() {
        let attrs = OutputAttributes {
            vertex_color: false,
            face_color: false,
            ..OutputAttributes::ALL
        };
        assert_eq!(attrs.as_server_arg(), "vn fn vt");
    }

    #[test]
    fn test_config_default_cleans_up() {
        let config = RunnerConfig::default();
        assert!(!config.keep_temp_dir);
    }
}
