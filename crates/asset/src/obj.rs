//! OBJ subset parser: `v`, `vn` and triangular `f` records.
//!
//! Normals are rebuilt per position: every distinct `vn` referenced by a face
//! vertex using a position contributes once to that position's average.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::error::{MeshError, MeshResult};
use crate::mesh::Mesh;

/// Load a mesh from an OBJ file on disk.
pub fn load_mesh_from_path(path: impl AsRef<Path>) -> MeshResult<Mesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| MeshError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Loading mesh from {:?}", path);
    let mesh = load_mesh_from_reader(BufReader::new(file))?;
    log::info!(
        "Loaded mesh {:?}: {} vertices, {} triangles",
        path,
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Load a mesh from any [`BufRead`] implementation.
pub fn load_mesh_from_reader<R: BufRead>(reader: R) -> MeshResult<Mesh> {
    let mut parser = ObjParser::default();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| MeshError::ReadLine {
            line: line_no + 1,
            source,
        })?;
        parser.feed_line(line_no + 1, &line)?;
    }
    parser.finish()
}

/// Parse OBJ text into a renderer-ready [`Mesh`].
///
/// Empty input yields an empty mesh. Any malformed `v`/`vn`/`f` record aborts
/// the whole parse; no partial mesh is returned.
pub fn parse_mesh(source: &str) -> MeshResult<Mesh> {
    let mut parser = ObjParser::default();
    for (line_no, line) in source.lines().enumerate() {
        parser.feed_line(line_no + 1, line)?;
    }
    parser.finish()
}

/// OBJ index as written, plus its 0-based resolution.
///
/// Relative (negative) indices are resolved against the records seen before
/// the face line; positive ones are checked once the whole file is read.
#[derive(Clone, Copy, Debug)]
struct IndexRef {
    raw: i64,
    resolved: i64,
}

impl IndexRef {
    fn get(self, len: usize) -> Option<usize> {
        usize::try_from(self.resolved).ok().filter(|&i| i < len)
    }
}

#[derive(Clone, Copy, Debug)]
struct FaceVertex {
    position: IndexRef,
    normal: Option<IndexRef>,
}

#[derive(Debug)]
struct Face {
    line: usize,
    vertices: [FaceVertex; 3],
}

#[derive(Default)]
struct ObjParser {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    texcoord_count: usize,
    faces: Vec<Face>,
}

impl ObjParser {
    fn feed_line(&mut self, line_no: usize, line: &str) -> MeshResult<()> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(());
        }

        let mut parts = trimmed.split_whitespace();
        let Some(tag) = parts.next() else {
            return Ok(());
        };

        match tag {
            "v" => {
                let position = parse_vec3(parts, line_no, "v")?;
                self.positions.push(position);
            }
            "vn" => {
                let normal = parse_vec3(parts, line_no, "vn")?;
                self.normals.push(normal);
            }
            // Texture coordinates are unused, but relative `t` indices count them.
            "vt" => self.texcoord_count += 1,
            "f" => {
                let face = self.parse_face(parts, line_no)?;
                self.faces.push(face);
            }
            _ => {
                // o/g/s/usemtl/mtllib and friends carry nothing we render.
            }
        }
        Ok(())
    }

    fn parse_face<'a>(
        &self,
        parts: impl Iterator<Item = &'a str>,
        line_no: usize,
    ) -> MeshResult<Face> {
        let tokens: Vec<&str> = parts.collect();
        if tokens.len() != 3 {
            return Err(MeshError::UnsupportedFaceArity {
                line: line_no,
                arity: tokens.len(),
            });
        }

        let mut vertices = [FaceVertex {
            position: IndexRef { raw: 0, resolved: 0 },
            normal: None,
        }; 3];
        for (slot, token) in vertices.iter_mut().zip(tokens) {
            *slot = self.parse_face_vertex(token, line_no)?;
        }
        Ok(Face {
            line: line_no,
            vertices,
        })
    }

    fn parse_face_vertex(&self, token: &str, line_no: usize) -> MeshResult<FaceVertex> {
        let fields: Vec<&str> = token.split('/').collect();
        if fields.len() > 3 {
            return Err(MeshError::malformed(
                line_no,
                format!("face element '{token}' has more than three fields"),
            ));
        }

        let position = match fields[0] {
            "" => {
                return Err(MeshError::malformed(
                    line_no,
                    format!("face element '{token}' has no position index"),
                ));
            }
            value => parse_index(value, self.positions.len(), line_no)?,
        };

        if let Some(value) = fields.get(1).filter(|v| !v.is_empty()) {
            parse_index(value, self.texcoord_count, line_no)?;
        }

        let normal = match fields.get(2) {
            Some(value) if !value.is_empty() => {
                Some(parse_index(value, self.normals.len(), line_no)?)
            }
            _ => None,
        };

        Ok(FaceVertex { position, normal })
    }

    fn finish(self) -> MeshResult<Mesh> {
        log::debug!(
            "OBJ records: {} positions, {} normals, {} faces",
            self.positions.len(),
            self.normals.len(),
            self.faces.len()
        );

        // Distinct normals seen per position, in first-seen order.
        let mut per_position: Vec<Vec<[f32; 3]>> = vec![Vec::new(); self.positions.len()];
        let mut indices: Vec<u32> = Vec::with_capacity(self.faces.len() * 3);

        for face in &self.faces {
            for vertex in &face.vertices {
                let p = vertex.position.get(self.positions.len()).ok_or(
                    MeshError::DanglingPositionReference {
                        line: face.line,
                        index: vertex.position.raw,
                        available: self.positions.len(),
                    },
                )?;

                if let Some(n) = vertex.normal {
                    let ni = n
                        .get(self.normals.len())
                        .ok_or(MeshError::DanglingNormalReference {
                            line: face.line,
                            index: n.raw,
                            available: self.normals.len(),
                        })?;
                    let normal = self.normals[ni];
                    let seen = &mut per_position[p];
                    if !seen.contains(&normal) {
                        seen.push(normal);
                    }
                }

                indices.push(u32::try_from(p).map_err(|_| MeshError::TooManyVertices {
                    line: face.line,
                    index: p,
                })?);
            }
        }

        let positions: Vec<f32> = self.positions.iter().flatten().copied().collect();
        let normals: Vec<f32> = per_position
            .iter()
            .flat_map(|set| average(set))
            .collect();

        Ok(Mesh::new(positions, normals, indices))
    }
}

/// Component-wise mean; the zero vector for positions no face gave a normal.
fn average(normals: &[[f32; 3]]) -> [f32; 3] {
    if normals.is_empty() {
        return [0.0; 3];
    }
    let sum = normals.iter().fold([0.0f32; 3], |acc, n| {
        [acc[0] + n[0], acc[1] + n[1], acc[2] + n[2]]
    });
    let count = normals.len() as f32;
    [sum[0] / count, sum[1] / count, sum[2] / count]
}

fn parse_vec3<'a>(
    parts: impl Iterator<Item = &'a str>,
    line_no: usize,
    tag: &str,
) -> MeshResult<[f32; 3]> {
    let tokens: Vec<&str> = parts.collect();
    if tokens.len() != 3 {
        return Err(MeshError::malformed(
            line_no,
            format!("'{tag}' expects 3 components, found {}", tokens.len()),
        ));
    }

    let mut out = [0.0f32; 3];
    for (slot, token) in out.iter_mut().zip(tokens) {
        *slot = token.parse::<f32>().map_err(|_| {
            MeshError::malformed(line_no, format!("invalid number '{token}' in '{tag}' record"))
        })?;
    }
    Ok(out)
}

fn parse_index(token: &str, len: usize, line_no: usize) -> MeshResult<IndexRef> {
    let raw = token
        .parse::<i64>()
        .map_err(|_| MeshError::malformed(line_no, format!("invalid index '{token}'")))?;
    if raw == 0 {
        return Err(MeshError::malformed(
            line_no,
            "OBJ indices are 1-based; found 0",
        ));
    }

    let resolved = if raw > 0 { raw - 1 } else { len as i64 + raw };
    Ok(IndexRef { raw, resolved })
}
