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

//! Filter script discovery.
//!
//! Scripts are plain files living in one directory, identified purely by
//! suffix. No recursion and no content validation: the filter server is the
//! only judge of whether a script is well-formed, and it judges at
//! invocation time.

use std::io;
use std::path::{Path, PathBuf};

/// Lists the regular files in `directory` whose names end with
/// `"." + suffix`, sorted by file name.
///
/// Subdirectories are not entered, and directory entries that merely *are*
/// named like a script (a directory called `foo.mlx`) are skipped. The sort
/// makes menu and CLI ordering deterministic across platforms.
///
/// # Errors
/// Fails if `directory` cannot be read. Individual unreadable entries are
/// skipped with a debug log rather than failing the whole listing.
pub fn find_script_files(directory: &Path, suffix: &str) -> io::Result<Vec<PathBuf>> {
    let wanted = format!(".{suffix}");
    let mut scripts = Vec::new();

    for entry in std::fs::read_dir(directory)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                log::debug!("skipping unreadable entry in {}: {err}", directory.display());
                continue;
            }
        };
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(err) => {
                log::debug!("skipping {}: {err}", entry.path().display());
                continue;
            }
        };
        if !file_type.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.ends_with(&wanted) {
            scripts.push(entry.path());
        }
    }

    scripts.sort();
    Ok(scripts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_lists_only_matching_regular_files() -> Result<()> {
        let dir = tempdir()?;
        std::fs::write(dir.path().join("smooth.mlx"), "<!DOCTYPE FilterScript>")?;
        std::fs::write(dir.path().join("decimate.mlx"), "<!DOCTYPE FilterScript>")?;
        std::fs::write(dir.path().join("notes.txt"), "not a script")?;
        std::fs::write(dir.path().join("mlx"), "suffix without dot")?;
        std::fs::create_dir(dir.path().join("nested.mlx"))?;
        std::fs::write(dir.path().join("nested.mlx").join("inner.mlx"), "")?;

        let scripts = find_script_files(dir.path(), "mlx")?;
        let names: Vec<_> = scripts
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();

        assert_eq!(names, vec!["decimate.mlx", "smooth.mlx"]);
        Ok(())
    }

    #[test]
    fn test_empty_directory_lists_nothing() -> Result<()> {
        let dir = tempdir()?;
        assert!(find_script_files(dir.path(), "mlx")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_directory_fails() {
        let missing = Path::new("/definitely/not/a/real/script/dir");
        assert!(find_script_files(missing, "mlx").is_err());
    }
}
