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

//! An in-memory host environment.

use meshbridge_core::host::{HostEnvironment, HostError};
use meshbridge_core::math::{Quaternion, Vec3};
use meshbridge_core::scene::{MeshData, ObjectId, SceneObject};
use meshbridge_io::ply;
use std::path::Path;

/// A host whose scene is a plain in-memory object list.
///
/// Object names are kept unique the way a real host keeps them unique:
/// a requested name that is already taken gets the lowest free three-digit
/// numeric suffix (`cube_meshlab.001`, `cube_meshlab.002`, …), so repeated
/// runs produce distinct, predictable names and never overwrite anything.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    objects: Vec<SceneObject>,
    selected: Vec<ObjectId>,
    active: Option<ObjectId>,
}

impl HeadlessHost {
    /// Creates a host with an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an object to the scene and returns its id.
    ///
    /// The object is neither selected nor made active.
    pub fn add_object(&mut self, name: impl Into<String>, mesh: MeshData) -> ObjectId {
        let name = self.unique_name(&name.into(), None);
        let object = SceneObject::new(name, mesh);
        let id = object.id;
        self.objects.push(object);
        id
    }

    /// Makes an existing object the active object (without selecting it).
    pub fn set_active(&mut self, id: ObjectId) -> Result<(), HostError> {
        self.get(id)?;
        self.active = Some(id);
        Ok(())
    }

    /// Looks up an object by id.
    #[must_use]
    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// All objects, in creation order.
    #[must_use]
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Number of objects in the scene.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// The currently selected object ids.
    #[must_use]
    pub fn selected(&self) -> &[ObjectId] {
        &self.selected
    }

    /// Writes an object's mesh to `path` as PLY.
    pub fn save_object(&self, id: ObjectId, path: &Path) -> Result<(), HostError> {
        let object = self.get(id)?;
        ply::write_ply(path, &object.mesh).map_err(|err| HostError::ExportFailed {
            path: path.display().to_string(),
            reason: err.to_string(),
        })
    }

    fn get(&self, id: ObjectId) -> Result<&SceneObject, HostError> {
        self.object(id).ok_or(HostError::ObjectNotFound { id })
    }

    fn get_mut(&mut self, id: ObjectId) -> Result<&mut SceneObject, HostError> {
        self.objects
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(HostError::ObjectNotFound { id })
    }

    /// Resolves `desired` to a name no other object carries.
    ///
    /// `exclude` exempts one object from the check, so renaming an object
    /// to its current name is a no-op.
    fn unique_name(&self, desired: &str, exclude: Option<ObjectId>) -> String {
        let taken = |name: &str| {
            self.objects
                .iter()
                .any(|o| Some(o.id) != exclude && o.name == name)
        };
        if !taken(desired) {
            return desired.to_string();
        }
        let mut counter = 1u32;
        loop {
            let candidate = format!("{desired}.{counter:03}");
            if !taken(&candidate) {
                return candidate;
            }
            counter += 1;
        }
    }
}

impl HostEnvironment for HeadlessHost {
    fn active_object(&self) -> Option<ObjectId> {
        self.active
    }

    fn object_name(&self, id: ObjectId) -> Result<String, HostError> {
        Ok(self.get(id)?.name.clone())
    }

    fn object_scale(&self, id: ObjectId) -> Result<Vec3, HostError> {
        Ok(self.get(id)?.transform.scale)
    }

    fn export_active_mesh(&self, path: &Path) -> Result<(), HostError> {
        let active = self.active.ok_or(HostError::NoActiveObject)?;
        let object = self.get(active)?;
        ply::write_ply(path, &object.mesh).map_err(|err| HostError::ExportFailed {
            path: path.display().to_string(),
            reason: err.to_string(),
        })
    }

    fn import_mesh(&mut self, path: &Path) -> Result<ObjectId, HostError> {
        // Parse first; the scene only changes once the file is fully read.
        let mesh = ply::read_ply(path).map_err(|err| HostError::ImportFailed {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("imported");
        let id = self.add_object(stem, mesh);
        log::debug!("imported {} as object '{stem}'", path.display());
        Ok(id)
    }

    fn rename_object(&mut self, id: ObjectId, name: String) -> Result<String, HostError> {
        self.get(id)?;
        let unique = self.unique_name(&name, Some(id));
        self.get_mut(id)?.name = unique.clone();
        Ok(unique)
    }

    fn deselect_all(&mut self) {
        self.selected.clear();
    }

    fn select_only(&mut self, id: ObjectId) -> Result<(), HostError> {
        self.get(id)?;
        self.selected.clear();
        self.selected.push(id);
        self.active = Some(id);
        Ok(())
    }

    fn rotate_object(&mut self, id: ObjectId, rotation: Quaternion) -> Result<(), HostError> {
        let object = self.get_mut(id)?;
        object.transform.rotation = rotation * object.transform.rotation;
        Ok(())
    }

    fn set_object_scale(&mut self, id: ObjectId, scale: Vec3) -> Result<(), HostError> {
        self.get_mut(id)?.transform.scale = scale;
        Ok(())
    }
}
