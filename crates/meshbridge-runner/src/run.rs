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

//! One filter run: export, invoke the server, re-import, restore transforms.

use crate::server;
use meshbridge_core::host::{HostEnvironment, HostError};
use meshbridge_core::math::{Quaternion, Vec3, FRAC_PI_2};
use meshbridge_core::report::{Report, Reporter};
use meshbridge_core::scene::ObjectId;
use meshbridge_core::RunnerConfig;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// Suffix appended to the original object's name to name the filtered copy.
pub const NEW_OBJECT_SUFFIX: &str = "_meshlab";
/// File name of the pre-filter mesh inside the work directory.
pub const EXPORT_FILE_NAME: &str = "temp_mesh.ply";
/// File name the server is asked to write inside the work directory.
pub const OUTPUT_FILE_NAME: &str = "temp_mesh_o.ply";
/// Prefix of every work directory, for discoverability while debugging.
pub const TEMP_DIR_PREFIX: &str = "meshbridge-";

/// An error from a filter run.
///
/// The variants are deliberately coarse: they match the three failure kinds
/// a user can tell apart and act on (install the server, fix the script,
/// look at the filesystem), not the internal step that tripped.
#[derive(Debug)]
pub enum FilterRunError {
    /// The filter server is not installed on the search path. Nothing was
    /// spawned and no temp directory was created.
    ServerNotFound,
    /// No object is active in the host scene.
    NoActiveObject,
    /// The server ran and exited unsuccessfully. No import was attempted.
    FilterFailed {
        /// The server executable that was invoked.
        server: PathBuf,
        /// The filter script it was given.
        script: PathBuf,
        /// Its exit status.
        status: ExitStatus,
    },
    /// A host-side export, import, or scene operation failed.
    Host(HostError),
    /// A filesystem operation (temp directory, spawning) failed.
    Io(std::io::Error),
}

impl fmt::Display for FilterRunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterRunError::ServerNotFound => write!(
                f,
                "Can't find the MeshLab server program. '{}' must be in your \
                 PATH for command line programs.",
                server::SERVER_PROGRAM
            ),
            FilterRunError::NoActiveObject => {
                write!(f, "No active object to filter; select an object first")
            }
            FilterRunError::FilterFailed {
                server,
                script,
                status,
            } => write!(
                f,
                "\"{}\" running script \"{}\" failed, {}",
                server.display(),
                script.display(),
                status
            ),
            FilterRunError::Host(err) => err.fmt(f),
            FilterRunError::Io(err) => write!(f, "Filter run failed: {err}"),
        }
    }
}

impl std::error::Error for FilterRunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FilterRunError::Host(err) => Some(err),
            FilterRunError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<HostError> for FilterRunError {
    fn from(err: HostError) -> Self {
        FilterRunError::Host(err)
    }
}

impl From<std::io::Error> for FilterRunError {
    fn from(err: std::io::Error) -> Self {
        FilterRunError::Io(err)
    }
}

/// Runs filter scripts against a host environment.
#[derive(Debug, Default)]
pub struct FilterRunner {
    config: RunnerConfig,
}

impl FilterRunner {
    /// Creates a runner with the given configuration.
    #[must_use]
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// The runner's configuration.
    #[must_use]
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Runs `script` on the host's active object.
    ///
    /// On success the host scene contains one new object named after the
    /// original with [`NEW_OBJECT_SUFFIX`] appended (collision-resolved by
    /// the host), selected and active, carrying the original's scale and
    /// the corrective quarter-turn about +X that maps the interchange
    /// format's axis convention back onto the host's. The original object
    /// is never modified.
    ///
    /// Every outcome, success or failure, is also delivered to `reporter`;
    /// the host stays fully usable after any error.
    pub fn run_filter(
        &self,
        host: &mut dyn HostEnvironment,
        reporter: &dyn Reporter,
        script: &Path,
    ) -> Result<ObjectId, FilterRunError> {
        match self.run_filter_inner(host, script) {
            Ok((id, name)) => {
                reporter.report(Report::info(format!(
                    "Filter \"{}\" finished; created object \"{name}\"",
                    script.display()
                )));
                Ok(id)
            }
            Err(err) => {
                reporter.report(Report::error(err.to_string()));
                Err(err)
            }
        }
    }

    fn run_filter_inner(
        &self,
        host: &mut dyn HostEnvironment,
        script: &Path,
    ) -> Result<(ObjectId, String), FilterRunError> {
        // Preconditions first: no side effects until both hold.
        let server = server::locate_filter_server().ok_or(FilterRunError::ServerNotFound)?;
        let original = host.active_object().ok_or(FilterRunError::NoActiveObject)?;
        let original_name = host.object_name(original)?;
        let original_scale = host.object_scale(original)?;

        // The work directory is the sole unit of cleanup; dropping it at the
        // end of this scope removes it on every exit path.
        let work_dir = tempfile::Builder::new()
            .prefix(TEMP_DIR_PREFIX)
            .tempdir()?;
        let result = self.filter_through(
            host,
            &server,
            script,
            work_dir.path(),
            &original_name,
            original_scale,
        );

        if self.config.keep_temp_dir {
            let retained = work_dir.keep();
            log::info!("retaining work directory {}", retained.display());
        }

        result
    }

    /// The export → server → import → restore sequence, run inside the work
    /// directory.
    fn filter_through(
        &self,
        host: &mut dyn HostEnvironment,
        server: &Path,
        script: &Path,
        work_dir: &Path,
        original_name: &str,
        original_scale: Vec3,
    ) -> Result<(ObjectId, String), FilterRunError> {
        let input_path = work_dir.join(EXPORT_FILE_NAME);
        let output_path = work_dir.join(OUTPUT_FILE_NAME);

        host.export_active_mesh(&input_path)?;

        let attributes = self.config.output_attributes.as_server_arg();
        log::debug!(
            "invoking {} -i {} -o {} -s {} -m \"{attributes}\"",
            server.display(),
            input_path.display(),
            output_path.display(),
            script.display()
        );
        let status = Command::new(server)
            .arg("-i")
            .arg(&input_path)
            .arg("-o")
            .arg(&output_path)
            .arg("-s")
            .arg(script)
            .arg("-m")
            .arg(attributes)
            .status()?;

        if !status.success() {
            return Err(FilterRunError::FilterFailed {
                server: server.to_path_buf(),
                script: script.to_path_buf(),
                status,
            });
        }

        let new_object = host.import_mesh(&output_path)?;
        let new_name =
            host.rename_object(new_object, format!("{original_name}{NEW_OBJECT_SUFFIX}"))?;

        host.deselect_all();
        host.select_only(new_object)?;

        // The interchange format is Y-up; the host is Z-up. A quarter-turn
        // about +X brings the imported mesh back upright. Scale is not
        // carried by the format at all, so the original's is reapplied.
        host.rotate_object(new_object, Quaternion::from_axis_angle(Vec3::X, FRAC_PI_2))?;
        host.set_object_scale(new_object, original_scale)?;

        Ok((new_object, new_name))
    }
}
