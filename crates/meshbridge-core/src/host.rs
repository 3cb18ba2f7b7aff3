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

//! The host-environment surface the bridge consumes.
//!
//! A "host" is whatever owns the scene: a full 3D content-creation
//! application, or the headless in-memory host used by the command-line tool
//! and the tests. The bridge drives a filter run entirely through
//! [`HostEnvironment`] and never reaches around it, so a run can only touch
//! scene state the trait exposes: the active object, selection, one imported
//! object, and that object's name and transform.

use crate::math::{Quaternion, Vec3};
use crate::scene::ObjectId;
use std::fmt;
use std::path::Path;

/// An error raised by a host while servicing the bridge.
#[derive(Debug)]
pub enum HostError {
    /// An operation referenced an object the scene does not contain.
    ObjectNotFound {
        /// The id that failed to resolve.
        id: ObjectId,
    },
    /// An operation required an active object, but none is set.
    NoActiveObject,
    /// Writing the interchange file failed.
    ExportFailed {
        /// Path the host was asked to write.
        path: String,
        /// Description of the underlying failure.
        reason: String,
    },
    /// Reading the interchange file failed. The scene is left untouched.
    ImportFailed {
        /// Path the host was asked to read.
        path: String,
        /// Description of the underlying failure.
        reason: String,
    },
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::ObjectNotFound { id } => {
                write!(f, "No object with id {id:?} exists in the scene")
            }
            HostError::NoActiveObject => {
                write!(f, "No active object is set in the scene")
            }
            HostError::ExportFailed { path, reason } => {
                write!(f, "Failed to export mesh to '{path}': {reason}")
            }
            HostError::ImportFailed { path, reason } => {
                write!(f, "Failed to import mesh from '{path}': {reason}")
            }
        }
    }
}

impl std::error::Error for HostError {}

/// The scene services a host supplies to the bridge.
///
/// Accessors return [`HostError::ObjectNotFound`] for stale ids rather than
/// panicking; a host must stay usable after any failed call.
pub trait HostEnvironment {
    /// Returns the id of the active object, if one is set.
    fn active_object(&self) -> Option<ObjectId>;

    /// Returns the user-visible name of an object.
    fn object_name(&self, id: ObjectId) -> Result<String, HostError>;

    /// Returns the per-axis scale of an object.
    fn object_scale(&self, id: ObjectId) -> Result<Vec3, HostError>;

    /// Writes the active object's mesh to `path` in the interchange format.
    fn export_active_mesh(&self, path: &Path) -> Result<(), HostError>;

    /// Reads an interchange file and introduces its mesh as a new object.
    ///
    /// The new object must only appear in the scene after the file has been
    /// read completely and successfully; a failed import leaves the scene
    /// exactly as it was.
    fn import_mesh(&mut self, path: &Path) -> Result<ObjectId, HostError>;

    /// Renames an object, resolving name collisions deterministically.
    ///
    /// Returns the final name, which may differ from `name` if the scene
    /// already contained an object with that name.
    fn rename_object(&mut self, id: ObjectId, name: String) -> Result<String, HostError>;

    /// Clears the selection.
    fn deselect_all(&mut self);

    /// Selects exactly one object and makes it the active object.
    fn select_only(&mut self, id: ObjectId) -> Result<(), HostError>;

    /// Composes `rotation` onto an object's current orientation.
    fn rotate_object(&mut self, id: ObjectId, rotation: Quaternion) -> Result<(), HostError>;

    /// Overwrites an object's per-axis scale.
    fn set_object_scale(&mut self, id: ObjectId, scale: Vec3) -> Result<(), HostError>;
}
