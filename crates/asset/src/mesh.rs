//! CPU-side mesh representation produced by the OBJ loader.

/// Interleaved vertex used for GPU upload. Values are in object space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }
}

/// Indexed triangle mesh stored as flat arrays.
///
/// `normals` is aligned with `positions`: the normal of vertex `i` lives at
/// `normals[3 * i..3 * i + 3]`. Every entry of `indices` is a 0-based vertex
/// index and every three entries form one triangle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new(positions: Vec<f32>, normals: Vec<f32>, indices: Vec<u32>) -> Self {
        debug_assert_eq!(positions.len(), normals.len());
        debug_assert_eq!(indices.len() % 3, 0);
        Self {
            positions,
            normals,
            indices,
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// `true` when there is nothing to draw.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn position(&self, i: usize) -> Option<[f32; 3]> {
        read_vec3(&self.positions, i)
    }

    pub fn normal(&self, i: usize) -> Option<[f32; 3]> {
        read_vec3(&self.normals, i)
    }

    /// Interleave positions and normals for a single vertex buffer.
    pub fn vertices(&self) -> Vec<MeshVertex> {
        self.positions
            .chunks_exact(3)
            .zip(self.normals.chunks_exact(3))
            .map(|(p, n)| MeshVertex::new([p[0], p[1], p[2]], [n[0], n[1], n[2]]))
            .collect()
    }

    /// Axis-aligned bounds as `(min, max)`, `None` for a mesh without positions.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let mut iter = self.positions.chunks_exact(3);
        let first = iter.next()?;
        let mut min = [first[0], first[1], first[2]];
        let mut max = min;
        for p in iter {
            for axis in 0..3 {
                min[axis] = min[axis].min(p[axis]);
                max[axis] = max[axis].max(p[axis]);
            }
        }
        Some((min, max))
    }
}

fn read_vec3(data: &[f32], i: usize) -> Option<[f32; 3]> {
    let start = i.checked_mul(3)?;
    let end = start.checked_add(3)?;
    let v = data.get(start..end)?;
    Some([v[0], v[1], v[2]])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Mesh {
        Mesh::new(
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 2.0, -1.0],
            vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
            vec![0, 1, 2],
        )
    }

    #[test]
    fn default_mesh_is_empty() {
        let mesh = Mesh::default();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.bounds(), None);
    }

    #[test]
    fn counts_and_accessors() {
        let mesh = triangle();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.position(1), Some([1.0, 0.0, 0.0]));
        assert_eq!(mesh.normal(2), Some([0.0, 0.0, 1.0]));
        assert_eq!(mesh.position(3), None);
    }

    #[test]
    fn out_of_range_accessors_do_not_overflow() {
        let mesh = triangle();
        assert_eq!(mesh.position(usize::MAX / 3), None);
        assert_eq!(mesh.normal(usize::MAX / 3), None);
        assert_eq!(mesh.position(usize::MAX), None);
    }

    #[test]
    fn interleaved_vertices_follow_position_order() {
        let verts = triangle().vertices();
        assert_eq!(verts.len(), 3);
        assert_eq!(verts[2], MeshVertex::new([0.0, 2.0, -1.0], [0.0, 0.0, 1.0]));
    }

    #[test]
    fn bounds_cover_all_positions() {
        let (min, max) = triangle().bounds().unwrap();
        assert_eq!(min, [0.0, 0.0, -1.0]);
        assert_eq!(max, [1.0, 2.0, 0.0]);
    }
}
