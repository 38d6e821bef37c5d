//! Mutable position access for meshes the displacement engine writes into.

use glam::Vec3;

/// A mesh whose vertex positions can be rewritten in place.
///
/// The vertex count never changes through this interface. Implementors
/// recompute normals from the current positions on request.
pub trait PositionBuffer {
    fn vertex_count(&self) -> usize;

    fn position(&self, index: usize) -> [f32; 3];

    fn set_position(&mut self, index: usize, position: [f32; 3]);

    /// Flag the positions as changed so GPU copies get re-uploaded.
    fn mark_positions_dirty(&mut self);

    /// Rebuild vertex normals from the current positions.
    fn recompute_normals(&mut self);
}

/// Smooth vertex normals for an indexed triangle list.
///
/// Each triangle contributes its unnormalized face normal (so larger faces
/// weigh more) to its three corners; sums are then normalized. Vertices that
/// touch no triangle, or only degenerate ones, get a zero normal.
pub fn compute_vertex_normals(positions: &[[f32; 3]], indices: &[u32], normals: &mut Vec<[f32; 3]>) {
    let mut sums = vec![Vec3::ZERO; positions.len()];

    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let pa = Vec3::from_array(positions[a]);
        let pb = Vec3::from_array(positions[b]);
        let pc = Vec3::from_array(positions[c]);
        let face = (pc - pb).cross(pa - pb);
        sums[a] += face;
        sums[b] += face;
        sums[c] += face;
    }

    normals.clear();
    normals.extend(sums.into_iter().map(|n| n.normalize_or_zero().to_array()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_triangle_normal() {
        // Counter-clockwise seen from +Z.
        let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let mut normals = Vec::new();
        compute_vertex_normals(&positions, &[0, 1, 2], &mut normals);
        for n in &normals {
            assert_eq!(*n, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn test_larger_face_dominates_shared_vertex() {
        // Vertex 0 is shared by a big triangle facing +Z and a small one facing +X.
        let positions = [
            [0.0, 0.0, 0.0],
            [10.0, 0.0, 0.0],
            [0.0, 10.0, 0.0],
            [0.0, 0.1, 0.0],
            [0.0, 0.0, 0.1],
        ];
        let indices = [0, 1, 2, 0, 3, 4];
        let mut normals = Vec::new();
        compute_vertex_normals(&positions, &indices, &mut normals);
        let n = Vec3::from_array(normals[0]);
        assert!(n.z > 0.99, "expected +Z dominated normal, got {n:?}");
        assert!(n.x > 0.0);
    }

    #[test]
    fn test_unreferenced_vertex_gets_zero_normal() {
        let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [5.0, 5.0, 5.0]];
        let mut normals = vec![[9.0; 3]; 7];
        compute_vertex_normals(&positions, &[0, 1, 2], &mut normals);
        assert_eq!(normals.len(), 4);
        assert_eq!(normals[3], [0.0, 0.0, 0.0]);
    }
}
