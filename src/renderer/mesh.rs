//! Triangle mesh container and procedural demo geometry.

use std::collections::HashMap;

use glam::Vec3;

/// An indexed triangle mesh with per-vertex normals, ready for upload.
pub struct MeshData {
    /// Vertex positions in scene space.
    pub positions: Vec<Vec3>,
    /// Per-vertex normals.
    pub normals: Vec<Vec3>,
    /// Triangle indices (CCW winding).
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Generate a unit icosphere.
    /// Level 0 = icosahedron (20 triangles), each level quadruples that.
    #[must_use]
    pub fn icosphere(subdivisions: u32) -> Self {
        let phi = (1.0 + 5.0_f32.sqrt()) / 2.0;
        let inv_len = 1.0 / (1.0 + phi * phi).sqrt();

        let mut positions: Vec<Vec3> = vec![
            Vec3::new(-1.0, phi, 0.0) * inv_len,
            Vec3::new(1.0, phi, 0.0) * inv_len,
            Vec3::new(-1.0, -phi, 0.0) * inv_len,
            Vec3::new(1.0, -phi, 0.0) * inv_len,
            Vec3::new(0.0, -1.0, phi) * inv_len,
            Vec3::new(0.0, 1.0, phi) * inv_len,
            Vec3::new(0.0, -1.0, -phi) * inv_len,
            Vec3::new(0.0, 1.0, -phi) * inv_len,
            Vec3::new(phi, 0.0, -1.0) * inv_len,
            Vec3::new(phi, 0.0, 1.0) * inv_len,
            Vec3::new(-phi, 0.0, -1.0) * inv_len,
            Vec3::new(-phi, 0.0, 1.0) * inv_len,
        ];

        // CCW winding for outward-facing normals
        let mut indices: Vec<u32> = vec![
            0, 5, 11, 0, 1, 5, 0, 7, 1, 0, 10, 7, 0, 11, 10, //
            1, 9, 5, 5, 4, 11, 11, 2, 10, 10, 6, 7, 7, 8, 1, //
            3, 4, 9, 3, 2, 4, 3, 6, 2, 3, 8, 6, 3, 9, 8, //
            4, 5, 9, 2, 11, 4, 6, 10, 2, 8, 7, 6, 9, 1, 8,
        ];

        let mut midpoint_cache: HashMap<(u32, u32), u32> = HashMap::new();

        for _ in 0..subdivisions {
            let mut new_indices = Vec::with_capacity(indices.len() * 4);

            for tri in indices.chunks(3) {
                let (v0, v1, v2) = (tri[0], tri[1], tri[2]);

                let a = midpoint(&mut positions, &mut midpoint_cache, v0, v1);
                let b = midpoint(&mut positions, &mut midpoint_cache, v1, v2);
                let c = midpoint(&mut positions, &mut midpoint_cache, v2, v0);

                new_indices.extend_from_slice(&[v0, a, c]);
                new_indices.extend_from_slice(&[v1, b, a]);
                new_indices.extend_from_slice(&[v2, c, b]);
                new_indices.extend_from_slice(&[a, b, c]);
            }

            indices = new_indices;
        }

        // Unit sphere: normal = position
        let normals = positions.clone();
        Self {
            positions,
            normals,
            indices,
        }
    }

    /// Stand-in brain surface: two ellipsoid hemisphere shells sized like
    /// a human cortex in scene space (left-right x, inferior-superior y,
    /// posterior-anterior z, millimetres).
    #[must_use]
    pub fn demo_brain() -> Self {
        let scale = Vec3::new(34.0, 62.0, 84.0);
        let mut mesh = Self {
            positions: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        };
        for center_x in [-34.5_f32, 34.5] {
            let hemi = Self::icosphere(3).transformed(
                scale,
                Vec3::new(center_x, 0.0, 0.0),
            );
            mesh.append(hemi);
        }
        mesh
    }

    /// Scale then translate every vertex, recomputing ellipsoid normals.
    #[must_use]
    fn transformed(self, scale: Vec3, offset: Vec3) -> Self {
        let positions: Vec<Vec3> = self
            .positions
            .iter()
            .map(|&p| p * scale + offset)
            .collect();
        // Normals transform by the inverse scale.
        let normals: Vec<Vec3> = self
            .normals
            .iter()
            .map(|&n| (n / scale).normalize())
            .collect();
        Self {
            positions,
            normals,
            indices: self.indices,
        }
    }

    fn append(&mut self, other: Self) {
        #[allow(clippy::cast_possible_truncation)]
        let base = self.positions.len() as u32;
        self.positions.extend(other.positions);
        self.normals.extend(other.normals);
        self.indices.extend(other.indices.iter().map(|&i| base + i));
    }
}

fn midpoint(
    positions: &mut Vec<Vec3>,
    cache: &mut HashMap<(u32, u32), u32>,
    v0: u32,
    v1: u32,
) -> u32 {
    // Consistent ordering for the cache key
    let key = if v0 < v1 { (v0, v1) } else { (v1, v0) };

    if let Some(&idx) = cache.get(&key) {
        return idx;
    }

    let p0 = positions[v0 as usize];
    let p1 = positions[v1 as usize];
    let mid = ((p0 + p1) * 0.5).normalize();

    #[allow(clippy::cast_possible_truncation)]
    let idx = positions.len() as u32;
    positions.push(mid);
    let _ = cache.insert(key, idx);
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icosphere_subdivision_counts() {
        let base = MeshData::icosphere(0);
        assert_eq!(base.positions.len(), 12);
        assert_eq!(base.indices.len(), 20 * 3);

        let level2 = MeshData::icosphere(2);
        assert_eq!(level2.indices.len(), 320 * 3);
        for p in &level2.positions {
            assert!((p.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn demo_brain_spans_both_hemispheres() {
        let brain = MeshData::demo_brain();
        assert_eq!(brain.positions.len(), brain.normals.len());
        let min_x = brain.positions.iter().map(|p| p.x).fold(f32::MAX, f32::min);
        let max_x = brain.positions.iter().map(|p| p.x).fold(f32::MIN, f32::max);
        assert!(min_x < -60.0);
        assert!(max_x > 60.0);
        for n in &brain.normals {
            assert!((n.length() - 1.0).abs() < 1e-4);
        }
    }
}
