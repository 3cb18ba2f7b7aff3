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

//! A triangle-mesh snapshot with the optional attributes the interchange
//! format carries.

use crate::math::Vec3;

/// Geometry exchanged through the interchange file: triangulated faces over a
/// shared vertex list, plus the optional per-vertex and per-face attributes
/// the filter server can be asked to preserve.
///
/// Every optional attribute vector, when present, must have the same length
/// as `positions` (per-vertex) or `faces` (per-face). [`MeshData::validate`]
/// checks this.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Triangles as indices into `positions`.
    pub faces: Vec<[u32; 3]>,
    /// Per-vertex normals, if present.
    pub vertex_normals: Option<Vec<Vec3>>,
    /// Per-vertex RGB colors, if present.
    pub vertex_colors: Option<Vec<[u8; 3]>>,
    /// Per-vertex texture coordinates, if present.
    pub texture_coords: Option<Vec<[f32; 2]>>,
    /// Per-face normals, if present.
    pub face_normals: Option<Vec<Vec3>>,
    /// Per-face RGB colors, if present.
    pub face_colors: Option<Vec<[u8; 3]>>,
}

impl MeshData {
    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangle faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Checks internal consistency: attribute lengths match their element
    /// counts and every face index is in range.
    ///
    /// Returns a description of the first violation found, or `Ok(())`.
    pub fn validate(&self) -> Result<(), String> {
        let nv = self.positions.len();
        let nf = self.faces.len();

        fn check_len<T>(attr: &Option<Vec<T>>, expected: usize, what: &str) -> Result<(), String> {
            match attr {
                Some(v) if v.len() != expected => Err(format!(
                    "{what}: expected {expected} entries, found {}",
                    v.len()
                )),
                _ => Ok(()),
            }
        }

        check_len(&self.vertex_normals, nv, "vertex normals")?;
        check_len(&self.vertex_colors, nv, "vertex colors")?;
        check_len(&self.texture_coords, nv, "texture coordinates")?;
        check_len(&self.face_normals, nf, "face normals")?;
        check_len(&self.face_colors, nf, "face colors")?;

        for (i, face) in self.faces.iter().enumerate() {
            for &index in face {
                if index as usize >= nv {
                    return Err(format!(
                        "face {i} references vertex {index}, but only {nv} vertices exist"
                    ));
                }
            }
        }
        Ok(())
    }
}
