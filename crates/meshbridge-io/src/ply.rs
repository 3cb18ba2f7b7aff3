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

//! PLY (Polygon File Format) I/O.
//!
//! PLY is the interchange format exchanged with the filter server: the
//! bridge writes the pre-filter snapshot and reads the server's output.
//! Only the ASCII 1.0 variant is handled. The writer emits exactly the
//! attributes present on the [`MeshData`]; the reader accepts vertex
//! properties in any order, skips properties it does not know (such as
//! `alpha`), and fan-triangulates polygonal faces, so it can consume
//! whatever attribute subset the server was asked to produce.

use meshbridge_core::math::Vec3;
use meshbridge_core::scene::MeshData;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// An error reading or writing a PLY interchange file.
#[derive(Debug, Error)]
pub enum PlyError {
    /// The file does not start with the `ply` magic line.
    #[error("not a PLY file: missing 'ply' magic line")]
    NotPly,
    /// The file declares a format other than `ascii 1.0`.
    #[error("unsupported PLY format '{0}' (only 'ascii 1.0' is supported)")]
    UnsupportedFormat(String),
    /// The header is structurally invalid.
    #[error("malformed PLY header: {0}")]
    Header(String),
    /// An element line in the body could not be parsed.
    #[error("malformed PLY body at line {line}: {reason}")]
    Body {
        /// 1-based line number within the file.
        line: usize,
        /// Description of the parse failure.
        reason: String,
    },
    /// The mesh is internally inconsistent (attribute length mismatch or an
    /// out-of-range face index).
    #[error("inconsistent mesh: {0}")]
    InvalidMesh(String),
    /// An underlying I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// --- Writing ---

/// Writes `mesh` to `path` as ASCII PLY 1.0.
///
/// The header declares only the attributes actually present on the mesh, in
/// the fixed order position, normal, color, texture coordinates for
/// vertices and indices, normal, color for faces.
///
/// # Errors
/// Fails if the mesh is internally inconsistent or the file cannot be
/// written.
pub fn write_ply(path: &Path, mesh: &MeshData) -> Result<(), PlyError> {
    mesh.validate().map_err(PlyError::InvalidMesh)?;
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_ply_into(&mut writer, mesh)?;
    writer.flush()?;
    log::debug!(
        "wrote {} vertices / {} faces to {}",
        mesh.vertex_count(),
        mesh.face_count(),
        path.display()
    );
    Ok(())
}

fn write_ply_into<W: Write>(w: &mut W, mesh: &MeshData) -> Result<(), PlyError> {
    writeln!(w, "ply")?;
    writeln!(w, "format ascii 1.0")?;
    writeln!(w, "comment created by meshbridge")?;

    writeln!(w, "element vertex {}", mesh.vertex_count())?;
    writeln!(w, "property float x")?;
    writeln!(w, "property float y")?;
    writeln!(w, "property float z")?;
    if mesh.vertex_normals.is_some() {
        writeln!(w, "property float nx")?;
        writeln!(w, "property float ny")?;
        writeln!(w, "property float nz")?;
    }
    if mesh.vertex_colors.is_some() {
        writeln!(w, "property uchar red")?;
        writeln!(w, "property uchar green")?;
        writeln!(w, "property uchar blue")?;
    }
    if mesh.texture_coords.is_some() {
        writeln!(w, "property float s")?;
        writeln!(w, "property float t")?;
    }

    writeln!(w, "element face {}", mesh.face_count())?;
    writeln!(w, "property list uchar int vertex_indices")?;
    if mesh.face_normals.is_some() {
        writeln!(w, "property float nx")?;
        writeln!(w, "property float ny")?;
        writeln!(w, "property float nz")?;
    }
    if mesh.face_colors.is_some() {
        writeln!(w, "property uchar red")?;
        writeln!(w, "property uchar green")?;
        writeln!(w, "property uchar blue")?;
    }
    writeln!(w, "end_header")?;

    for (i, p) in mesh.positions.iter().enumerate() {
        write!(w, "{} {} {}", p.x, p.y, p.z)?;
        if let Some(normals) = &mesh.vertex_normals {
            let n = normals[i];
            write!(w, " {} {} {}", n.x, n.y, n.z)?;
        }
        if let Some(colors) = &mesh.vertex_colors {
            let c = colors[i];
            write!(w, " {} {} {}", c[0], c[1], c[2])?;
        }
        if let Some(coords) = &mesh.texture_coords {
            let t = coords[i];
            write!(w, " {} {}", t[0], t[1])?;
        }
        writeln!(w)?;
    }

    for (i, face) in mesh.faces.iter().enumerate() {
        write!(w, "3 {} {} {}", face[0], face[1], face[2])?;
        if let Some(normals) = &mesh.face_normals {
            let n = normals[i];
            write!(w, " {} {} {}", n.x, n.y, n.z)?;
        }
        if let Some(colors) = &mesh.face_colors {
            let c = colors[i];
            write!(w, " {} {} {}", c[0], c[1], c[2])?;
        }
        writeln!(w)?;
    }

    Ok(())
}

// --- Reading ---

/// How a scalar property's tokens should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScalarKind {
    Float,
    Integer,
}

impl ScalarKind {
    fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "float" | "float32" | "double" | "float64" => Some(Self::Float),
            "char" | "int8" | "uchar" | "uint8" | "short" | "int16" | "ushort" | "uint16"
            | "int" | "int32" | "uint" | "uint32" => Some(Self::Integer),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct PropertyDecl {
    name: String,
    kind: ScalarKind,
    is_list: bool,
}

#[derive(Debug)]
struct ElementDecl {
    name: String,
    count: usize,
    properties: Vec<PropertyDecl>,
}

/// Reads an ASCII PLY 1.0 file from `path`.
///
/// # Errors
/// Fails on non-PLY input, binary PLY, a malformed header or body, or a
/// mesh whose face indices fall outside its vertex list.
pub fn read_ply(path: &Path) -> Result<MeshData, PlyError> {
    let file = File::open(path)?;
    let mesh = read_ply_from(BufReader::new(file))?;
    log::debug!(
        "read {} vertices / {} faces from {}",
        mesh.vertex_count(),
        mesh.face_count(),
        path.display()
    );
    Ok(mesh)
}

fn read_ply_from<R: BufRead>(reader: R) -> Result<MeshData, PlyError> {
    let mut lines = reader.lines();
    let mut line_no = 0usize;

    let magic = next_line(&mut lines, &mut line_no)?.ok_or(PlyError::NotPly)?;
    if magic.trim() != "ply" {
        return Err(PlyError::NotPly);
    }

    let elements = read_header(&mut lines, &mut line_no)?;

    let mut mesh = MeshData::default();
    for element in &elements {
        match element.name.as_str() {
            "vertex" => read_vertices(&mut lines, &mut line_no, element, &mut mesh)?,
            "face" => read_faces(&mut lines, &mut line_no, element, &mut mesh)?,
            other => {
                // Elements the bridge has no use for (edges, materials).
                log::debug!("skipping {} '{other}' element rows", element.count);
                for _ in 0..element.count {
                    next_line(&mut lines, &mut line_no)?.ok_or(PlyError::Body {
                        line: line_no,
                        reason: format!("unexpected end of file inside '{other}' element"),
                    })?;
                }
            }
        }
    }

    mesh.validate().map_err(PlyError::InvalidMesh)?;
    Ok(mesh)
}

fn next_line(
    lines: &mut impl Iterator<Item = std::io::Result<String>>,
    line_no: &mut usize,
) -> Result<Option<String>, PlyError> {
    for line in lines {
        let line = line?;
        *line_no += 1;
        if !line.trim().is_empty() {
            return Ok(Some(line));
        }
    }
    Ok(None)
}

fn read_header(
    lines: &mut impl Iterator<Item = std::io::Result<String>>,
    line_no: &mut usize,
) -> Result<Vec<ElementDecl>, PlyError> {
    let mut elements: Vec<ElementDecl> = Vec::new();
    let mut format_seen = false;

    loop {
        let line = next_line(lines, line_no)?
            .ok_or_else(|| PlyError::Header("unexpected end of file before end_header".into()))?;
        let line = line.trim();
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("format") => {
                let rest: Vec<&str> = tokens.collect();
                let format = rest.join(" ");
                if format != "ascii 1.0" {
                    return Err(PlyError::UnsupportedFormat(format));
                }
                format_seen = true;
            }
            Some("comment") | Some("obj_info") => {}
            Some("element") => {
                let name = tokens
                    .next()
                    .ok_or_else(|| PlyError::Header("element without a name".into()))?;
                let count = tokens
                    .next()
                    .and_then(|token| token.parse::<usize>().ok())
                    .ok_or_else(|| {
                        PlyError::Header(format!("element '{name}' has no valid count"))
                    })?;
                elements.push(ElementDecl {
                    name: name.to_string(),
                    count,
                    properties: Vec::new(),
                });
            }
            Some("property") => {
                let element = elements.last_mut().ok_or_else(|| {
                    PlyError::Header("property declared before any element".into())
                })?;
                let first = tokens
                    .next()
                    .ok_or_else(|| PlyError::Header("property without a type".into()))?;
                if first == "list" {
                    // property list <count-type> <index-type> <name>
                    let _count_type = tokens
                        .next()
                        .ok_or_else(|| PlyError::Header("list property without types".into()))?;
                    let index_type = tokens
                        .next()
                        .ok_or_else(|| PlyError::Header("list property without types".into()))?;
                    let name = tokens
                        .next()
                        .ok_or_else(|| PlyError::Header("list property without a name".into()))?;
                    let kind = ScalarKind::from_type_name(index_type).ok_or_else(|| {
                        PlyError::Header(format!("unknown list index type '{index_type}'"))
                    })?;
                    element.properties.push(PropertyDecl {
                        name: name.to_string(),
                        kind,
                        is_list: true,
                    });
                } else {
                    let name = tokens
                        .next()
                        .ok_or_else(|| PlyError::Header("property without a name".into()))?;
                    let kind = ScalarKind::from_type_name(first).ok_or_else(|| {
                        PlyError::Header(format!("unknown property type '{first}'"))
                    })?;
                    element.properties.push(PropertyDecl {
                        name: name.to_string(),
                        kind,
                        is_list: false,
                    });
                }
            }
            Some("end_header") => break,
            Some(other) => {
                return Err(PlyError::Header(format!("unrecognized keyword '{other}'")));
            }
            None => {}
        }
    }

    if !format_seen {
        return Err(PlyError::Header("missing format line".into()));
    }
    Ok(elements)
}

/// Column index of a scalar property, by name.
fn column(element: &ElementDecl, name: &str) -> Option<usize> {
    element
        .properties
        .iter()
        .position(|p| !p.is_list && p.name == name)
}

fn parse_f32(token: &str, line: usize) -> Result<f32, PlyError> {
    token.parse::<f32>().map_err(|_| PlyError::Body {
        line,
        reason: format!("expected a number, found '{token}'"),
    })
}

/// Parses a color channel token, scaling float-typed channels from the
/// `[0, 1]` range used by some exporters to `[0, 255]`.
fn parse_channel(token: &str, kind: ScalarKind, line: usize) -> Result<u8, PlyError> {
    let value = parse_f32(token, line)?;
    let value = match kind {
        ScalarKind::Float => value * 255.0,
        ScalarKind::Integer => value,
    };
    Ok(value.round().clamp(0.0, 255.0) as u8)
}

fn read_vertices(
    lines: &mut impl Iterator<Item = std::io::Result<String>>,
    line_no: &mut usize,
    element: &ElementDecl,
    mesh: &mut MeshData,
) -> Result<(), PlyError> {
    if element.properties.iter().any(|p| p.is_list) {
        return Err(PlyError::Header(
            "list property in vertex element is not supported".into(),
        ));
    }

    let x = column(element, "x")
        .ok_or_else(|| PlyError::Header("vertex element lacks an 'x' property".into()))?;
    let y = column(element, "y")
        .ok_or_else(|| PlyError::Header("vertex element lacks a 'y' property".into()))?;
    let z = column(element, "z")
        .ok_or_else(|| PlyError::Header("vertex element lacks a 'z' property".into()))?;

    let normal = match (
        column(element, "nx"),
        column(element, "ny"),
        column(element, "nz"),
    ) {
        (Some(nx), Some(ny), Some(nz)) => Some((nx, ny, nz)),
        _ => None,
    };
    let color = match (
        column(element, "red"),
        column(element, "green"),
        column(element, "blue"),
    ) {
        (Some(r), Some(g), Some(b)) => Some((r, g, b)),
        _ => None,
    };
    // Texture coordinates appear under several conventional names.
    let coords = [("s", "t"), ("u", "v"), ("texture_u", "texture_v")]
        .into_iter()
        .find_map(|(a, b)| match (column(element, a), column(element, b)) {
            (Some(s), Some(t)) => Some((s, t)),
            _ => None,
        });

    let color_kind = color
        .map(|(r, _, _)| element.properties[r].kind)
        .unwrap_or(ScalarKind::Integer);

    let mut positions = Vec::with_capacity(element.count);
    let mut normals = normal.map(|_| Vec::with_capacity(element.count));
    let mut colors = color.map(|_| Vec::with_capacity(element.count));
    let mut uvs = coords.map(|_| Vec::with_capacity(element.count));

    for _ in 0..element.count {
        let line = next_line(lines, line_no)?.ok_or(PlyError::Body {
            line: *line_no,
            reason: "unexpected end of file inside vertex element".into(),
        })?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < element.properties.len() {
            return Err(PlyError::Body {
                line: *line_no,
                reason: format!(
                    "expected {} values, found {}",
                    element.properties.len(),
                    tokens.len()
                ),
            });
        }

        positions.push(Vec3::new(
            parse_f32(tokens[x], *line_no)?,
            parse_f32(tokens[y], *line_no)?,
            parse_f32(tokens[z], *line_no)?,
        ));
        if let (Some(out), Some((nx, ny, nz))) = (normals.as_mut(), normal) {
            out.push(Vec3::new(
                parse_f32(tokens[nx], *line_no)?,
                parse_f32(tokens[ny], *line_no)?,
                parse_f32(tokens[nz], *line_no)?,
            ));
        }
        if let (Some(out), Some((r, g, b))) = (colors.as_mut(), color) {
            out.push([
                parse_channel(tokens[r], color_kind, *line_no)?,
                parse_channel(tokens[g], color_kind, *line_no)?,
                parse_channel(tokens[b], color_kind, *line_no)?,
            ]);
        }
        if let (Some(out), Some((s, t))) = (uvs.as_mut(), coords) {
            out.push([parse_f32(tokens[s], *line_no)?, parse_f32(tokens[t], *line_no)?]);
        }
    }

    mesh.positions = positions;
    mesh.vertex_normals = normals;
    mesh.vertex_colors = colors;
    mesh.texture_coords = uvs;
    Ok(())
}

fn read_faces(
    lines: &mut impl Iterator<Item = std::io::Result<String>>,
    line_no: &mut usize,
    element: &ElementDecl,
    mesh: &mut MeshData,
) -> Result<(), PlyError> {
    match element.properties.first() {
        Some(p) if p.is_list && (p.name == "vertex_indices" || p.name == "vertex_index") => {}
        _ => {
            return Err(PlyError::Header(
                "face element must start with a 'vertex_indices' list property".into(),
            ));
        }
    }
    if element.properties.iter().skip(1).any(|p| p.is_list) {
        return Err(PlyError::Header(
            "multiple list properties in face element are not supported".into(),
        ));
    }

    // Scalar columns follow the index list on each row, in declaration order.
    let scalar_names: Vec<&str> = element
        .properties
        .iter()
        .skip(1)
        .map(|p| p.name.as_str())
        .collect();
    let scalar_pos = |name: &str| scalar_names.iter().position(|n| *n == name);

    let normal = match (scalar_pos("nx"), scalar_pos("ny"), scalar_pos("nz")) {
        (Some(nx), Some(ny), Some(nz)) => Some((nx, ny, nz)),
        _ => None,
    };
    let color = match (scalar_pos("red"), scalar_pos("green"), scalar_pos("blue")) {
        (Some(r), Some(g), Some(b)) => Some((r, g, b)),
        _ => None,
    };
    let color_kind = color
        .map(|(r, _, _)| element.properties[r + 1].kind)
        .unwrap_or(ScalarKind::Integer);

    let mut faces = Vec::with_capacity(element.count);
    let mut normals = normal.map(|_| Vec::with_capacity(element.count));
    let mut colors = color.map(|_| Vec::with_capacity(element.count));

    for _ in 0..element.count {
        let line = next_line(lines, line_no)?.ok_or(PlyError::Body {
            line: *line_no,
            reason: "unexpected end of file inside face element".into(),
        })?;
        let tokens: Vec<&str> = line.split_whitespace().collect();

        let arity: usize = tokens
            .first()
            .and_then(|t| t.parse().ok())
            .ok_or_else(|| PlyError::Body {
                line: *line_no,
                reason: "face row does not start with an index count".into(),
            })?;
        if arity < 3 {
            return Err(PlyError::Body {
                line: *line_no,
                reason: format!("face with {arity} vertices"),
            });
        }
        let expected = 1 + arity + scalar_names.len();
        if tokens.len() < expected {
            return Err(PlyError::Body {
                line: *line_no,
                reason: format!("expected {} values, found {}", expected, tokens.len()),
            });
        }

        let mut indices = Vec::with_capacity(arity);
        for token in &tokens[1..=arity] {
            let index: u32 = token.parse().map_err(|_| PlyError::Body {
                line: *line_no,
                reason: format!("invalid vertex index '{token}'"),
            })?;
            indices.push(index);
        }

        let scalars = &tokens[1 + arity..];
        let face_normal = match normal {
            Some((nx, ny, nz)) => Some(Vec3::new(
                parse_f32(scalars[nx], *line_no)?,
                parse_f32(scalars[ny], *line_no)?,
                parse_f32(scalars[nz], *line_no)?,
            )),
            None => None,
        };
        let face_color = match color {
            Some((r, g, b)) => Some([
                parse_channel(scalars[r], color_kind, *line_no)?,
                parse_channel(scalars[g], color_kind, *line_no)?,
                parse_channel(scalars[b], color_kind, *line_no)?,
            ]),
            None => None,
        };

        // Fan-triangulate polygons; per-face attributes replicate onto each
        // emitted triangle.
        for i in 1..arity - 1 {
            faces.push([indices[0], indices[i], indices[i + 1]]);
            if let (Some(out), Some(n)) = (normals.as_mut(), face_normal) {
                out.push(n);
            }
            if let (Some(out), Some(c)) = (colors.as_mut(), face_color) {
                out.push(c);
            }
        }
    }

    mesh.faces = faces;
    mesh.face_normals = normals;
    mesh.face_colors = colors;
    Ok(())
}
