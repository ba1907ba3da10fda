//! Render pipelines for the two draw passes.
//!
//! Both passes share one shader and one pipeline layout. They differ only in
//! depth and blend state, and wgpu bakes the primitive topology into the
//! pipeline, so one pipeline exists per pass and [`PrimitiveMode`] in use.

use std::collections::HashMap;

use crate::{data_structures::object::PrimitiveMode, render::DrawPass, resources::mesh::VERTEX_LAYOUTS};

pub mod opaque;
pub mod translucent;

pub(crate) const NO_STENCIL: wgpu::StencilState = wgpu::StencilState {
    front: wgpu::StencilFaceState::IGNORE,
    back: wgpu::StencilFaceState::IGNORE,
    read_mask: 0,
    write_mask: 0,
};

pub(crate) const NO_BIAS: wgpu::DepthBiasState = wgpu::DepthBiasState {
    constant: 0,
    slope_scale: 0.0,
    clamp: 0.0,
};

/// Bind group layouts shared by every pipeline, in group order.
#[derive(Debug)]
pub struct Layouts {
    pub scene: wgpu::BindGroupLayout,
    pub object: wgpu::BindGroupLayout,
    pub texture: wgpu::BindGroupLayout,
}

#[derive(Debug)]
pub struct Pipelines {
    opaque: HashMap<PrimitiveMode, wgpu::RenderPipeline>,
    translucent: HashMap<PrimitiveMode, wgpu::RenderPipeline>,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        layouts: &Layouts,
        modes: &[PrimitiveMode],
    ) -> Self {
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Solid Pipeline Layout"),
            bind_group_layouts: &[&layouts.scene, &layouts.object, &layouts.texture],
            push_constant_ranges: &[],
        });
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Solid Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("solid.wgsl").into()),
        });

        let mut opaque_pipelines = HashMap::new();
        let mut translucent_pipelines = HashMap::new();
        for &mode in modes {
            opaque_pipelines.entry(mode).or_insert_with(|| {
                opaque::mk_opaque_pipeline(device, &layout, &shader, config.format, mode)
            });
            translucent_pipelines.entry(mode).or_insert_with(|| {
                translucent::mk_translucent_pipeline(device, &layout, &shader, config.format, mode)
            });
        }
        Self {
            opaque: opaque_pipelines,
            translucent: translucent_pipelines,
        }
    }

    pub fn get(&self, pass: DrawPass, mode: PrimitiveMode) -> Option<&wgpu::RenderPipeline> {
        match pass {
            DrawPass::Opaque => self.opaque.get(&mode),
            DrawPass::Translucent => self.translucent.get(&mode),
        }
    }
}

pub fn mk_render_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    color_format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
    depth_stencil: wgpu::DepthStencilState,
    mode: PrimitiveMode,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &VERTEX_LAYOUTS,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: mode.topology(),
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Translucent solids show their back faces through the front.
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(depth_stencil),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}
