use wgpu::util::DeviceExt;

use crate::data_structures::object::{ObjectBuffers, RenderableObject};

/**
 * One vertex buffer per attribute, bound to slots 0..=4 in this order:
 * position, normal, texture coordinate, diffuse colour, specular colour.
 */
pub const VERTEX_LAYOUTS: [wgpu::VertexBufferLayout<'static>; 5] = [
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        }],
    },
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x3,
        }],
    },
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 2,
            format: wgpu::VertexFormat::Float32x2,
        }],
    },
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 3,
            format: wgpu::VertexFormat::Float32x3,
        }],
    },
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 4,
            format: wgpu::VertexFormat::Float32x3,
        }],
    },
];

pub fn object_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("object_bind_group_layout"),
    })
}

fn vertex_buffer(device: &wgpu::Device, label: String, contents: &[u8]) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&label),
        contents,
        usage: wgpu::BufferUsages::VERTEX,
    })
}

pub(crate) fn create_object_buffers(
    device: &wgpu::Device,
    object: &RenderableObject,
    object_layout: &wgpu::BindGroupLayout,
) -> ObjectBuffers {
    let name = &object.name;
    let position = vertex_buffer(
        device,
        format!("{name} Position Buffer"),
        bytemuck::cast_slice(&object.positions),
    );
    let normal = vertex_buffer(
        device,
        format!("{name} Normal Buffer"),
        bytemuck::cast_slice(&object.normals),
    );
    let tex_coord = vertex_buffer(
        device,
        format!("{name} TexCoord Buffer"),
        bytemuck::cast_slice(&object.tex_coords),
    );
    let color = vertex_buffer(
        device,
        format!("{name} Color Buffer"),
        bytemuck::cast_slice(&object.colors),
    );
    let specular = vertex_buffer(
        device,
        format!("{name} Specular Buffer"),
        bytemuck::cast_slice(&object.speculars),
    );

    let uniform = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{name} Uniform Buffer")),
        contents: bytemuck::cast_slice(&[object.uniform(1.0)]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: object_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: uniform.as_entire_binding(),
        }],
        label: Some(&format!("{name} Bind Group")),
    });

    ObjectBuffers {
        position,
        color,
        specular,
        normal,
        tex_coord,
        uniform,
        bind_group,
    }
}
