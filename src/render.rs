//! Frame composition.
//!
//! A frame is drawn in two passes over the object list. The list is split by
//! position: the first half is opaque and drawn first with depth testing and
//! no blending, the second half is translucent and drawn last without depth
//! testing and with additive-over blending. Callers therefore have to put
//! opaque objects first; [`misplaced_objects`] reports objects whose
//! `is_translucent` flag disagrees with their position.
//!
//! # Key types
//!
//! - [`DrawPass`] is the per-object blend/depth mode
//! - [`DrawCommand`] is one entry of the ordered draw sequence from [`plan_frame`]
//! - [`FrameRenderer`] owns the scene uniform and records a frame on the GPU

use std::iter;

use cgmath::Matrix4;
use wgpu::util::DeviceExt;

use crate::{
    config::SceneConfig,
    context::Context,
    data_structures::{object::RenderableObject, scene_state::SceneState, texture::TextureResource},
    transform::{rotation_matrix, OrthoSpec, OPENGL_TO_WGPU_MATRIX},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DrawPass {
    Opaque,
    Translucent,
}

impl DrawPass {
    /// Which texture slot the pass samples from.
    pub fn texture_unit(self) -> usize {
        match self {
            DrawPass::Opaque => SceneConfig::OPAQUE_UNIT,
            DrawPass::Translucent => SceneConfig::TRANSLUCENT_UNIT,
        }
    }

    pub fn alpha(self, translucency: f32) -> f32 {
        match self {
            DrawPass::Opaque => 1.0,
            DrawPass::Translucent => translucency,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawCommand {
    /// Position in the object list.
    pub index: usize,
    pub pass: DrawPass,
}

/// Number of objects in the opaque group of a list of `len` objects.
///
/// An odd middle object is opaque.
pub fn opaque_count(len: usize) -> usize {
    len.div_ceil(2)
}

/// The pass of the object at `index` in a list of `len` objects.
pub fn pass_for(index: usize, len: usize) -> DrawPass {
    if index < opaque_count(len) {
        DrawPass::Opaque
    } else {
        DrawPass::Translucent
    }
}

/// Splits `objects` into the opaque and the translucent group, keeping order.
pub fn split_groups<T>(objects: &[T]) -> (&[T], &[T]) {
    objects.split_at(opaque_count(objects.len()))
}

/// The ordered draw sequence: the whole opaque group, then the whole
/// translucent group.
pub fn plan_frame<T>(objects: &[T]) -> Vec<DrawCommand> {
    let (opaque, translucent) = split_groups(objects);
    let opaque_commands = (0..opaque.len()).map(|index| DrawCommand {
        index,
        pass: DrawPass::Opaque,
    });
    let translucent_commands = (0..translucent.len()).map(|offset| DrawCommand {
        index: opaque.len() + offset,
        pass: DrawPass::Translucent,
    });
    opaque_commands.chain(translucent_commands).collect()
}

/// Indices of objects whose translucency flag contradicts their group.
pub fn misplaced_objects(objects: &[RenderableObject]) -> Vec<usize> {
    objects
        .iter()
        .enumerate()
        .filter(|(index, object)| {
            object.is_translucent != (pass_for(*index, objects.len()) == DrawPass::Translucent)
        })
        .map(|(index, _)| index)
        .collect()
}

/// Scene-wide uniform block, see `SceneUniform` in `solid.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniform {
    pub projection: [[f32; 4]; 4],
    pub rotation_x: [[f32; 4]; 4],
    pub rotation_y: [[f32; 4]; 4],
}

impl SceneUniform {
    pub fn new(projection: Matrix4<f32>, state: &SceneState) -> Self {
        Self {
            projection: projection.into(),
            rotation_x: rotation_matrix(state.rotation_around_x(), 1.0, 0.0, 0.0).into(),
            rotation_y: rotation_matrix(state.rotation_around_y(), 0.0, 1.0, 0.0).into(),
        }
    }
}

pub fn scene_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("scene_bind_group_layout"),
    })
}

#[derive(Debug)]
pub struct FrameRenderer {
    /// Computed once, the viewport never changes the projection.
    projection: Matrix4<f32>,
    translucency: f32,
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl FrameRenderer {
    pub fn new(ctx: &Context, ortho: &OrthoSpec, translucency: f32) -> Self {
        let projection = OPENGL_TO_WGPU_MATRIX * ortho.matrix();
        let uniform = SceneUniform::new(projection, &SceneState::default());
        let buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Scene Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &ctx.layouts.scene,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("scene_bind_group"),
        });
        Self {
            projection,
            translucency,
            buffer,
            bind_group,
        }
    }

    /// Clears, then draws every object in [`plan_frame`] order and presents.
    pub fn draw_frame(
        &self,
        ctx: &Context,
        state: &SceneState,
        objects: &[RenderableObject],
        textures: &[TextureResource],
    ) -> Result<(), wgpu::SurfaceError> {
        let output = ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let plan = plan_frame(objects);

        ctx.queue.write_buffer(
            &self.buffer,
            0,
            bytemuck::cast_slice(&[SceneUniform::new(self.projection, state)]),
        );
        for command in &plan {
            let object = &objects[command.index];
            if let Some(buffers) = object.buffers() {
                let uniform = object.uniform(command.pass.alpha(self.translucency));
                ctx.queue
                    .write_buffer(&buffers.uniform, 0, bytemuck::cast_slice(&[uniform]));
            }
        }

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, &self.bind_group, &[]);
            for command in &plan {
                let object = &objects[command.index];
                let Some(buffers) = object.buffers() else {
                    log::warn!("{} has no GPU buffers, skipping it", object.name);
                    continue;
                };
                let Some(pipeline) = ctx.pipelines.get(command.pass, object.primitive_mode) else {
                    log::warn!(
                        "no {:?} pipeline for {:?}, skipping {}",
                        command.pass,
                        object.primitive_mode,
                        object.name
                    );
                    continue;
                };
                let unit = command.pass.texture_unit();
                let Some(texture) = textures
                    .iter()
                    .find(|texture| texture.unit() == unit)
                    .and_then(TextureResource::bind_group)
                else {
                    log::warn!("texture unit {unit} is not loaded, skipping {}", object.name);
                    continue;
                };

                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(1, &buffers.bind_group, &[]);
                render_pass.set_bind_group(2, texture, &[]);
                render_pass.set_vertex_buffer(0, buffers.position.slice(..));
                render_pass.set_vertex_buffer(1, buffers.normal.slice(..));
                render_pass.set_vertex_buffer(2, buffers.tex_coord.slice(..));
                render_pass.set_vertex_buffer(3, buffers.color.slice(..));
                render_pass.set_vertex_buffer(4, buffers.specular.slice(..));
                render_pass.draw(0..object.vertex_count() as u32, 0..1);
            }
        }

        ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}
