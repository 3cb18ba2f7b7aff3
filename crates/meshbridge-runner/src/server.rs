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

//! Locating the filter server executable.
//!
//! The server is an ordinary command-line program the user installs
//! themselves, so it is looked up on the `PATH` environment like a shell
//! would: first directory wins, Windows probes the `.exe` name. The lookup
//! is re-run on every filter invocation. A run is rare and user-triggered,
//! and re-resolving means an install or `PATH` change takes effect without
//! restarting the host.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Base name of the filter server program.
pub const SERVER_PROGRAM: &str = "meshlabserver";

/// The platform-specific file name probed on the search path.
fn server_file_name() -> &'static str {
    if cfg!(windows) {
        "meshlabserver.exe"
    } else {
        SERVER_PROGRAM
    }
}

/// Searches the process `PATH` for the filter server.
///
/// Returns the first candidate that exists, is a regular file, and is
/// executable, or `None` if the server is not installed.
pub fn locate_filter_server() -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    locate_program(server_file_name(), &path_var)
}

/// Searches the directories of a `PATH`-style value for `file_name`.
fn locate_program(file_name: &str, path_var: &OsStr) -> Option<PathBuf> {
    for dir in std::env::split_paths(path_var) {
        if dir.as_os_str().is_empty() {
            continue;
        }
        let candidate = dir.join(file_name);
        if is_executable_file(&candidate) {
            log::debug!("resolved '{file_name}' to {}", candidate.display());
            return Some(candidate);
        }
    }
    None
}

/// Whether `path` names a regular file the current user can execute.
fn is_executable_file(path: &Path) -> bool {
    let Ok(metadata) = std::fs::metadata(path) else {
        return false;
    };
    if !metadata.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        // On Windows the probe name already carries the executable suffix.
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[cfg(unix)]
    fn make_executable(path: &Path) {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(path, perms).unwrap();
    }

    #[test]
    fn test_not_found_on_empty_path() {
        let path_var = std::env::join_paths(Vec::<PathBuf>::new()).unwrap();
        assert_eq!(locate_program("meshlabserver", &path_var), None);
    }

    #[test]
    fn test_not_found_when_absent() {
        let dir = tempdir().unwrap();
        let path_var = std::env::join_paths([dir.path()]).unwrap();
        assert_eq!(locate_program("meshlabserver", &path_var), None);
    }

    #[test]
    fn test_directory_with_program_name_is_not_a_match() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("meshlabserver")).unwrap();
        let path_var = std::env::join_paths([dir.path()]).unwrap();
        assert_eq!(locate_program("meshlabserver", &path_var), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_finds_executable_file() {
        let dir = tempdir().unwrap();
        let program = dir.path().join("meshlabserver");
        std::fs::write(&program, "#!/bin/sh\nexit 0\n").unwrap();
        make_executable(&program);

        let path_var = std::env::join_paths([dir.path()]).unwrap();
        assert_eq!(locate_program("meshlabserver", &path_var), Some(program));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_executable_file_is_not_a_match() {
        let dir = tempdir().unwrap();
        let program = dir.path().join("meshlabserver");
        std::fs::write(&program, "not runnable").unwrap();

        let path_var = std::env::join_paths([dir.path()]).unwrap();
        assert_eq!(locate_program("meshlabserver", &path_var), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_first_directory_wins() {
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        for dir in [&first, &second] {
            let program = dir.path().join("meshlabserver");
            std::fs::write(&program, "#!/bin/sh\nexit 0\n").unwrap();
            make_executable(&program);
        }

        let path_var = std::env::join_paths([first.path(), second.path()]).unwrap();
        assert_eq!(
            locate_program("meshlabserver", &path_var),
            Some(first.path().join("meshlabserver"))
        );
    }
}
