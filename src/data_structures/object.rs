//! Renderable solids.
//!
//! A [`RenderableObject`] owns its per-vertex attribute arrays, its material
//! and, after [`RenderableObject::upload`], one GPU buffer per attribute plus
//! a small uniform block. Objects are built once at startup and never change
//! shape afterwards.

use crate::{
    resources::{geometry::TriangleArrays, mesh},
    transform::RotationSpec,
};

/// Texture coordinates handed to every triangle, in corner order.
pub const TRIANGLE_UVS: [[f32; 2]; 3] = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveMode {
    Triangles,
    TriangleStrip,
    Lines,
    LineStrip,
    Points,
}

impl PrimitiveMode {
    pub fn topology(self) -> wgpu::PrimitiveTopology {
        match self {
            PrimitiveMode::Triangles => wgpu::PrimitiveTopology::TriangleList,
            PrimitiveMode::TriangleStrip => wgpu::PrimitiveTopology::TriangleStrip,
            PrimitiveMode::Lines => wgpu::PrimitiveTopology::LineList,
            PrimitiveMode::LineStrip => wgpu::PrimitiveTopology::LineStrip,
            PrimitiveMode::Points => wgpu::PrimitiveTopology::PointList,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub shininess: f32,
}

/// Per-object uniform block, see `ObjectUniform` in `solid.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model_view: [[f32; 4]; 4],
    pub shininess: f32,
    pub alpha: f32,
    // Uniforms require 16 byte spacing
    pub _padding: [f32; 2],
}

/// GPU side of a [`RenderableObject`]. Created once, never reallocated.
#[derive(Debug)]
pub struct ObjectBuffers {
    pub position: wgpu::Buffer,
    pub color: wgpu::Buffer,
    pub specular: wgpu::Buffer,
    pub normal: wgpu::Buffer,
    pub tex_coord: wgpu::Buffer,
    pub uniform: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

#[derive(Debug)]
pub struct RenderableObject {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub tex_coords: Vec<[f32; 2]>,
    pub colors: Vec<[f32; 3]>,
    pub speculars: Vec<[f32; 3]>,
    pub material: Material,
    pub primitive_mode: PrimitiveMode,
    pub rotation: Option<RotationSpec>,
    pub is_translucent: bool,
    pub(crate) buffers: Option<ObjectBuffers>,
}

impl RenderableObject {
    /// Build an object from per-triangle arrays.
    ///
    /// Unless `colors` carries one entry per vertex, the material's diffuse
    /// colour is repeated for every vertex. The specular colour is always
    /// repeated. Each triangle gets the UVs of [`TRIANGLE_UVS`].
    pub fn from_triangles(
        name: impl Into<String>,
        arrays: TriangleArrays,
        material: Material,
        colors: Option<Vec<[f32; 3]>>,
    ) -> Self {
        let name = name.into();
        let vertex_count = arrays.vertex_count();
        if vertex_count == 0 {
            log::warn!("{name} has no vertices and will not be drawn");
        }
        if arrays.normals.len() != vertex_count {
            log::warn!(
                "{name}: got {} normals for {vertex_count} vertices, the object will not be drawn",
                arrays.normals.len()
            );
        }
        let colors = match colors {
            Some(colors) if colors.len() == vertex_count => colors,
            Some(colors) => {
                log::warn!(
                    "{name}: got {} colours for {vertex_count} vertices, using the flat diffuse colour",
                    colors.len()
                );
                vec![material.diffuse; vertex_count]
            }
            None => vec![material.diffuse; vertex_count],
        };
        let speculars = vec![material.specular; vertex_count];
        let tex_coords = TRIANGLE_UVS
            .iter()
            .copied()
            .cycle()
            .take(vertex_count)
            .collect();

        Self {
            name,
            positions: arrays.positions,
            normals: arrays.normals,
            tex_coords,
            colors,
            speculars,
            material,
            primitive_mode: PrimitiveMode::Triangles,
            rotation: None,
            is_translucent: false,
            buffers: None,
        }
    }

    pub fn with_rotation(mut self, rotation: RotationSpec) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn with_primitive_mode(mut self, primitive_mode: PrimitiveMode) -> Self {
        self.primitive_mode = primitive_mode;
        self
    }

    pub fn translucent(mut self) -> Self {
        self.is_translucent = true;
        self
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Non-empty, with one entry per vertex in every attribute array.
    pub fn is_drawable(&self) -> bool {
        let count = self.vertex_count();
        count > 0
            && [
                self.normals.len(),
                self.tex_coords.len(),
                self.colors.len(),
                self.speculars.len(),
            ]
            .iter()
            .all(|&len| len == count)
    }

    /// The object's own rotation, or the identity.
    pub fn model_view(&self) -> cgmath::Matrix4<f32> {
        match &self.rotation {
            Some(rotation) => rotation.matrix(),
            None => cgmath::SquareMatrix::identity(),
        }
    }

    pub fn uniform(&self, alpha: f32) -> ObjectUniform {
        ObjectUniform {
            model_view: self.model_view().into(),
            shininess: self.material.shininess,
            alpha,
            _padding: [0.0; 2],
        }
    }

    /// Create the GPU buffers. A second call keeps the existing buffers and
    /// objects that are not [drawable](Self::is_drawable) get none.
    pub fn upload(&mut self, device: &wgpu::Device, object_layout: &wgpu::BindGroupLayout) {
        if !self.is_drawable() {
            log::warn!("{} has empty or mismatched attribute arrays, skipping upload", self.name);
            return;
        }
        if self.buffers.is_some() {
            log::warn!("{} is already uploaded, buffers are never reallocated", self.name);
            return;
        }
        self.buffers = Some(mesh::create_object_buffers(device, self, object_layout));
    }

    pub fn buffers(&self) -> Option<&ObjectBuffers> {
        self.buffers.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use cgmath::SquareMatrix;

    use super::*;
    use crate::resources::geometry::{flatten, GeometryProvider, Icosahedron};

    fn gold() -> Material {
        Material {
            diffuse: [1.0, 0.8, 0.2],
            specular: [1.0, 1.0, 1.0],
            shininess: 32.0,
        }
    }

    fn two_triangles() -> TriangleArrays {
        TriangleArrays {
            positions: vec![[0.0; 3]; 6],
            normals: vec![[0.0, 0.0, 1.0]; 6],
        }
    }

    #[test]
    fn flat_colour_is_repeated_per_vertex() {
        let arrays = flatten(&Icosahedron::new([0.0, 0.0, 0.0], 1.0).generate());
        let object = RenderableObject::from_triangles("gold", arrays, gold(), None);
        assert_eq!(object.vertex_count(), 60);
        assert_eq!(object.colors.len(), 60);
        assert_eq!(object.speculars.len(), 60);
        assert!(object.colors.iter().all(|c| *c == gold().diffuse));
        assert!(object.speculars.iter().all(|c| *c == gold().specular));
    }

    #[test]
    fn explicit_per_vertex_colours_win() {
        let colors: Vec<[f32; 3]> = (0..6).map(|i| [i as f32, 0.0, 0.0]).collect();
        let object =
            RenderableObject::from_triangles("mixed", two_triangles(), gold(), Some(colors.clone()));
        assert_eq!(object.colors, colors);
    }

    #[test]
    fn short_colour_array_falls_back_to_flat_colour() {
        let object = RenderableObject::from_triangles(
            "short",
            two_triangles(),
            gold(),
            Some(vec![[0.0, 1.0, 0.0]; 2]),
        );
        assert_eq!(object.colors, vec![gold().diffuse; 6]);
    }

    #[test]
    fn every_triangle_gets_the_same_uvs() {
        let object = RenderableObject::from_triangles("uv", two_triangles(), gold(), None);
        assert_eq!(
            object.tex_coords,
            vec![
                [0.0, 0.0],
                [1.0, 0.0],
                [0.0, 1.0],
                [0.0, 0.0],
                [1.0, 0.0],
                [0.0, 1.0],
            ]
        );
    }

    #[test]
    fn icosahedron_is_drawable() {
        let arrays = flatten(&Icosahedron::new([0.0, 0.0, 0.0], 1.0).generate());
        let object = RenderableObject::from_triangles("gold", arrays, gold(), None);
        assert!(object.is_drawable());
    }

    #[test]
    fn empty_geometry_is_not_drawable() {
        let object =
            RenderableObject::from_triangles("empty", TriangleArrays::default(), gold(), None);
        assert_eq!(object.vertex_count(), 0);
        assert!(!object.is_drawable());
    }

    #[test]
    fn missing_normals_make_the_object_undrawable() {
        let arrays = TriangleArrays {
            positions: vec![[0.0; 3]; 6],
            normals: vec![[0.0, 0.0, 1.0]; 3],
        };
        let object = RenderableObject::from_triangles("short", arrays, gold(), None);
        assert_eq!(object.colors.len(), 6);
        assert!(!object.is_drawable());
    }

    #[test]
    fn model_view_defaults_to_identity() {
        let object = RenderableObject::from_triangles("plain", two_triangles(), gold(), None);
        assert_eq!(object.model_view(), cgmath::Matrix4::identity());
        assert!(object.buffers().is_none());

        let rotation = RotationSpec::new(30.0, [0.0, 1.0, 0.0]);
        let rotated = object.with_rotation(rotation);
        assert_eq!(rotated.model_view(), rotation.matrix());
    }

    #[test]
    fn uniform_carries_shininess_and_alpha() {
        let object = RenderableObject::from_triangles("u", two_triangles(), gold(), None);
        let uniform = object.uniform(0.5);
        assert_eq!(uniform.shininess, 32.0);
        assert_eq!(uniform.alpha, 0.5);
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 80);
    }
}
