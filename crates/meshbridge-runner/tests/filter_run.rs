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

//! End-to-end filter runs against the headless host, with a stand-in
//! `meshlabserver` placed on the search path.
//!
//! The stand-in is a real executable invoked through the real subprocess
//! path, so these tests cover argument passing, exit-status handling, and
//! temp-directory lifecycle for real. They rewrite `PATH` and are Unix-only
//! (the stand-in is a shell script).

#![cfg(unix)]

use meshbridge_core::command::{CommandContext, CommandRegistry};
use meshbridge_core::math::{Quaternion, Vec3, FRAC_PI_2};
use meshbridge_core::report::Severity;
use meshbridge_core::scene::MeshData;
use meshbridge_core::{HostEnvironment, RunnerConfig};
use meshbridge_host::HeadlessHost;
use meshbridge_runner::commands::{register_commands, CMD_RUN_FILTER};
use meshbridge_runner::run::TEMP_DIR_PREFIX;
use meshbridge_runner::{ChannelReporter, FilterRunError, FilterRunner};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// Tests rewrite the process-wide PATH; serialize them.
static PATH_LOCK: Mutex<()> = Mutex::new(());

/// A `meshlabserver` stand-in that copies its input to its output.
const COPYING_SERVER: &str = "#!/bin/sh
input=\"\"
output=\"\"
while [ \"$#\" -gt 0 ]; do
  case \"$1\" in
    -i) input=\"$2\"; shift 2 ;;
    -o) output=\"$2\"; shift 2 ;;
    -s|-m) shift 2 ;;
    *) shift ;;
  esac
done
cp \"$input\" \"$output\"
";

/// A stand-in that fails the way a server rejects a bad script.
const FAILING_SERVER: &str = "#!/bin/sh\nexit 3\n";

fn install_server(body: &str) -> TempDir {
    use std::os::unix::fs::PermissionsExt;
    let dir = tempfile::tempdir().unwrap();
    let program = dir.path().join("meshlabserver");
    std::fs::write(&program, body).unwrap();
    let mut perms = std::fs::metadata(&program).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&program, perms).unwrap();
    // Put the stand-in's directory first so `meshlabserver` resolves to it,
    // but keep the standard system directories on PATH so the stand-in shell
    // script can still find the utilities it invokes (e.g. `cp`).
    let path = std::env::join_paths([dir.path(), Path::new("/usr/bin"), Path::new("/bin")])
        .unwrap();
    std::env::set_var("PATH", &path);
    dir
}

fn triangle() -> MeshData {
    MeshData {
        positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
        faces: vec![[0, 1, 2]],
        ..Default::default()
    }
}

fn host_with_cube() -> (HeadlessHost, meshbridge_core::scene::ObjectId) {
    let mut host = HeadlessHost::new();
    let id = host.add_object("cube", triangle());
    host.set_active(id).unwrap();
    host.set_object_scale(id, Vec3::new(2.0, 1.0, 0.5)).unwrap();
    (host, id)
}

fn some_script(dir: &Path) -> PathBuf {
    let script = dir.join("smooth.mlx");
    std::fs::write(&script, "<!DOCTYPE FilterScript>").unwrap();
    script
}

/// Work directories currently present in the system temp directory.
fn work_dirs() -> Vec<PathBuf> {
    std::fs::read_dir(std::env::temp_dir())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(TEMP_DIR_PREFIX))
        })
        .map(|entry| entry.path())
        .collect()
}

fn work_dir_count() -> usize {
    work_dirs().len()
}

#[test]
fn successful_run_creates_renamed_transformed_object() {
    let _guard = PATH_LOCK.lock().unwrap();
    let server_dir = install_server(COPYING_SERVER);
    let script = some_script(server_dir.path());

    let (mut host, original) = host_with_cube();
    let (reporter, reports) = ChannelReporter::new();
    let runner = FilterRunner::new(RunnerConfig::default());

    let before = work_dir_count();
    let created = runner.run_filter(&mut host, &reporter, &script).unwrap();

    // Exactly one new object, named from the original, selected and active.
    assert_eq!(host.object_count(), 2);
    assert_eq!(host.object_name(created).unwrap(), "cube_meshlab");
    assert_eq!(host.selected(), &[created]);
    assert_eq!(host.active_object(), Some(created));

    // The corrective rotation and the original's scale are applied.
    let new_object = host.object(created).unwrap();
    assert_eq!(
        new_object.transform.rotation,
        Quaternion::from_axis_angle(Vec3::X, FRAC_PI_2)
    );
    assert_eq!(new_object.transform.scale, Vec3::new(2.0, 1.0, 0.5));

    // The original is untouched.
    let original = host.object(original).unwrap();
    assert_eq!(original.name, "cube");
    assert_eq!(original.transform.rotation, Quaternion::IDENTITY);

    // The work directory is gone and the outcome was reported as info.
    assert_eq!(work_dir_count(), before);
    let reports: Vec<_> = reports.try_iter().collect();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].severity, Severity::Info);
}

#[test]
fn running_twice_yields_two_distinct_objects() {
    let _guard = PATH_LOCK.lock().unwrap();
    let server_dir = install_server(COPYING_SERVER);
    let script = some_script(server_dir.path());

    let (mut host, original) = host_with_cube();
    let (reporter, _reports) = ChannelReporter::new();
    let runner = FilterRunner::new(RunnerConfig::default());

    let first = runner.run_filter(&mut host, &reporter, &script).unwrap();
    // The second run filters the first result, which is now active.
    let second = runner.run_filter(&mut host, &reporter, &script).unwrap();

    assert_ne!(first, second);
    assert_eq!(host.object_count(), 3);
    assert_eq!(host.object_name(first).unwrap(), "cube_meshlab");
    assert_eq!(host.object_name(second).unwrap(), "cube_meshlab_meshlab");
    assert_eq!(host.object_name(original).unwrap(), "cube");
}

#[test]
fn rerunning_on_same_original_resolves_name_collision() {
    let _guard = PATH_LOCK.lock().unwrap();
    let server_dir = install_server(COPYING_SERVER);
    let script = some_script(server_dir.path());

    let (mut host, original) = host_with_cube();
    let (reporter, _reports) = ChannelReporter::new();
    let runner = FilterRunner::new(RunnerConfig::default());

    let first = runner.run_filter(&mut host, &reporter, &script).unwrap();
    // Re-activate the original, as a user re-running the same filter would.
    host.set_active(original).unwrap();
    let second = runner.run_filter(&mut host, &reporter, &script).unwrap();

    assert_eq!(host.object_name(first).unwrap(), "cube_meshlab");
    assert_eq!(host.object_name(second).unwrap(), "cube_meshlab.001");
}

#[test]
fn failing_server_reports_status_and_creates_nothing() {
    let _guard = PATH_LOCK.lock().unwrap();
    let server_dir = install_server(FAILING_SERVER);
    let script = some_script(server_dir.path());

    let (mut host, _original) = host_with_cube();
    let (reporter, reports) = ChannelReporter::new();
    let runner = FilterRunner::new(RunnerConfig::default());

    let before = work_dir_count();
    let err = runner.run_filter(&mut host, &reporter, &script).unwrap_err();

    match &err {
        FilterRunError::FilterFailed { status, script: failed_script, .. } => {
            assert_eq!(status.code(), Some(3));
            assert_eq!(failed_script, &script);
        }
        other => panic!("expected FilterFailed, got {other:?}"),
    }

    // No import happened and the work directory was still cleaned up.
    assert_eq!(host.object_count(), 1);
    assert_eq!(work_dir_count(), before);

    let reports: Vec<_> = reports.try_iter().collect();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].severity, Severity::Error);
    assert!(reports[0].message.contains("status"));
}

#[test]
fn missing_server_fails_before_any_side_effect() {
    let _guard = PATH_LOCK.lock().unwrap();
    let empty_dir = tempfile::tempdir().unwrap();
    std::env::set_var("PATH", empty_dir.path());

    let (mut host, _original) = host_with_cube();
    let (reporter, reports) = ChannelReporter::new();
    let runner = FilterRunner::new(RunnerConfig::default());

    let before = work_dir_count();
    let err = runner
        .run_filter(&mut host, &reporter, Path::new("smooth.mlx"))
        .unwrap_err();

    assert!(matches!(err, FilterRunError::ServerNotFound));
    // No temp directory was ever created, and the scene is untouched.
    assert_eq!(work_dir_count(), before);
    assert_eq!(host.object_count(), 1);

    let reports: Vec<_> = reports.try_iter().collect();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].severity, Severity::Error);
    assert!(reports[0].message.contains("meshlabserver"));
}

#[test]
fn keep_temp_dir_retains_both_interchange_files() {
    let _guard = PATH_LOCK.lock().unwrap();
    let server_dir = install_server(COPYING_SERVER);
    let script = some_script(server_dir.path());

    let (mut host, _original) = host_with_cube();
    let (reporter, _reports) = ChannelReporter::new();
    let runner = FilterRunner::new(RunnerConfig {
        keep_temp_dir: true,
        ..Default::default()
    });

    let before: Vec<PathBuf> = work_dirs();
    runner.run_filter(&mut host, &reporter, &script).unwrap();
    let after: Vec<PathBuf> = work_dirs();

    let new_dirs: Vec<&PathBuf> = after.iter().filter(|d| !before.contains(d)).collect();
    assert_eq!(new_dirs.len(), 1);
    let kept = new_dirs[0];
    assert!(kept.join("temp_mesh.ply").is_file());
    assert!(kept.join("temp_mesh_o.ply").is_file());

    std::fs::remove_dir_all(kept).unwrap();
}

#[test]
fn run_through_command_registry_records_created_object() {
    let _guard = PATH_LOCK.lock().unwrap();
    let server_dir = install_server(COPYING_SERVER);
    some_script(server_dir.path());

    let (mut host, _original) = host_with_cube();
    let (reporter, _reports) = ChannelReporter::new();

    let mut registry = CommandRegistry::new();
    register_commands(&mut registry, FilterRunner::new(RunnerConfig::default()));

    let mut ctx = CommandContext::new(&mut host, &reporter, server_dir.path());
    // A relative selection resolves against the script directory.
    ctx.selected_script = Some(PathBuf::from("smooth.mlx"));
    registry.run(CMD_RUN_FILTER, &mut ctx).unwrap();

    let created = ctx.created_object.expect("created object recorded");
    drop(ctx);
    assert_eq!(host.object_name(created).unwrap(), "cube_meshlab");
}
