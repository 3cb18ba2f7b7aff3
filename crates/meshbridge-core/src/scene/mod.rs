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

//! The scene object model exchanged across the host surface.
//!
//! The bridge never owns a scene; the host does. These types are the bridge's
//! view of the part it touches: one object per filter run, identified by a
//! stable [`ObjectId`], carrying a mesh snapshot and a whole-object transform.

mod mesh;

pub use mesh::MeshData;

use crate::math::{Quaternion, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unique, process-local identifier for an object in the host scene.
///
/// IDs are minted by the host when an object is created or imported and stay
/// valid for the lifetime of that object. They carry no meaning beyond
/// identity; in particular they are decoupled from the object's user-visible
/// name, which the host may rewrite to keep names unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(Uuid);

impl ObjectId {
    /// Creates a new, random (version 4) `ObjectId`.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ObjectId {
    /// Creates a new, random (version 4) `ObjectId`.
    fn default() -> Self {
        Self::new()
    }
}

/// The whole-object transform the bridge reads and restores.
///
/// Only rotation and scale matter to a filter run: the interchange format
/// bakes positions into the mesh, drops scale entirely, and swaps the
/// vertical axis convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Orientation of the object.
    pub rotation: Quaternion,
    /// Per-axis scale of the object.
    pub scale: Vec3,
}

impl Transform {
    /// The identity transform: no rotation, unit scale.
    pub const IDENTITY: Self = Self {
        rotation: Quaternion::IDENTITY,
        scale: Vec3::ONE,
    };
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// An object in the host scene, as seen by the bridge.
#[derive(Debug, Clone)]
pub struct SceneObject {
    /// Stable identity of the object.
    pub id: ObjectId,
    /// User-visible name, unique within the scene.
    pub name: String,
    /// Geometry snapshot.
    pub mesh: MeshData,
    /// Whole-object transform.
    pub transform: Transform,
}

impl SceneObject {
    /// Creates a new object with a fresh id and the identity transform.
    pub fn new(name: impl Into<String>, mesh: MeshData) -> Self {
        Self {
            id: ObjectId::new(),
            name: name.into(),
            mesh,
            transform: Transform::IDENTITY,
        }
    }
}
