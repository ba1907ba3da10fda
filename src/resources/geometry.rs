use cgmath::{InnerSpace, Vector3};

/**
 * Procedural solids.
 *
 * A provider yields indexed geometry; [`flatten`] expands it into the
 * per-triangle arrays the scene objects are built from.
 */
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawGeometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

/// Per-triangle arrays: three entries per face, no index buffer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriangleArrays {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
}

impl TriangleArrays {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }
}

pub trait GeometryProvider {
    fn generate(&self) -> RawGeometry;
}

/// A regular icosahedron inscribed in a sphere.
#[derive(Clone, Copy, Debug)]
pub struct Icosahedron {
    pub center: Vector3<f32>,
    pub radius: f32,
}

impl Icosahedron {
    pub fn new(center: impl Into<Vector3<f32>>, radius: f32) -> Self {
        Self {
            center: center.into(),
            radius,
        }
    }
}

const PHI: f32 = 1.618_034;

#[rustfmt::skip]
const ICOSAHEDRON_VERTICES: [[f32; 3]; 12] = [
    [-1.0,  PHI,  0.0], [ 1.0,  PHI,  0.0], [-1.0, -PHI,  0.0], [ 1.0, -PHI,  0.0],
    [ 0.0, -1.0,  PHI], [ 0.0,  1.0,  PHI], [ 0.0, -1.0, -PHI], [ 0.0,  1.0, -PHI],
    [ PHI,  0.0, -1.0], [ PHI,  0.0,  1.0], [-PHI,  0.0, -1.0], [-PHI,  0.0,  1.0],
];

// Counter-clockwise seen from outside.
#[rustfmt::skip]
const ICOSAHEDRON_FACES: [u32; 60] = [
    0, 11, 5,   0, 5, 1,    0, 1, 7,    0, 7, 10,   0, 10, 11,
    1, 5, 9,    5, 11, 4,   11, 10, 2,  10, 7, 6,   7, 1, 8,
    3, 9, 4,    3, 4, 2,    3, 2, 6,    3, 6, 8,    3, 8, 9,
    4, 9, 5,    2, 4, 11,   6, 2, 10,   8, 6, 7,    9, 8, 1,
];

impl GeometryProvider for Icosahedron {
    fn generate(&self) -> RawGeometry {
        let (positions, normals) = ICOSAHEDRON_VERTICES
            .iter()
            .map(|v| {
                let direction = Vector3::from(*v).normalize();
                let position: [f32; 3] = (self.center + direction * self.radius).into();
                let normal: [f32; 3] = direction.into();
                (position, normal)
            })
            .unzip();
        RawGeometry {
            positions,
            normals,
            indices: ICOSAHEDRON_FACES.to_vec(),
        }
    }
}

/// Expands indexed geometry into one position and one flat face normal per
/// triangle corner.
pub fn flatten(geometry: &RawGeometry) -> TriangleArrays {
    let mut arrays = TriangleArrays {
        positions: Vec::with_capacity(geometry.indices.len()),
        normals: Vec::with_capacity(geometry.indices.len()),
    };
    for face in geometry.indices.chunks_exact(3) {
        let corners = [
            geometry.positions[face[0] as usize],
            geometry.positions[face[1] as usize],
            geometry.positions[face[2] as usize],
        ];
        let p0 = Vector3::from(corners[0]);
        let p1 = Vector3::from(corners[1]);
        let p2 = Vector3::from(corners[2]);
        let normal: [f32; 3] = (p1 - p0).cross(p2 - p0).normalize().into();

        arrays.positions.extend_from_slice(&corners);
        arrays.normals.extend_from_slice(&[normal; 3]);
    }
    arrays
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icosahedron_has_twelve_vertices_on_the_sphere() {
        let solid = Icosahedron::new([1.0, -2.0, 0.5], 2.0);
        let geometry = solid.generate();
        assert_eq!(geometry.positions.len(), 12);
        assert_eq!(geometry.normals.len(), 12);
        assert_eq!(geometry.indices.len(), 60);
        for p in &geometry.positions {
            let distance = (Vector3::from(*p) - solid.center).magnitude();
            assert!((distance - 2.0).abs() < 1e-5);
        }
    }

    #[test]
    fn flattened_faces_point_outwards() {
        let solid = Icosahedron::new([0.0, 0.0, 0.0], 1.0);
        let arrays = flatten(&solid.generate());
        assert_eq!(arrays.triangle_count(), 20);
        assert_eq!(arrays.vertex_count(), 60);
        assert_eq!(arrays.normals.len(), 60);

        for (corners, normals) in arrays
            .positions
            .chunks_exact(3)
            .zip(arrays.normals.chunks_exact(3))
        {
            let centroid = corners
                .iter()
                .fold(Vector3::new(0.0, 0.0, 0.0), |acc, p| acc + Vector3::from(*p))
                / 3.0;
            let normal = Vector3::from(normals[0]);
            assert!((normal.magnitude() - 1.0).abs() < 1e-5);
            assert!(normal.dot(centroid) > 0.0);
            assert_eq!(normals[0], normals[1]);
            assert_eq!(normals[1], normals[2]);
        }
    }
}
