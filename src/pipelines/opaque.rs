use crate::{
    data_structures::{object::PrimitiveMode, texture::Texture},
    pipelines::{NO_BIAS, NO_STENCIL, mk_render_pipeline},
};

pub const OPAQUE_BLEND: Option<wgpu::BlendState> = None;

/// Nearest surface wins and is recorded for the rest of the frame.
pub const OPAQUE_DEPTH: wgpu::DepthStencilState = wgpu::DepthStencilState {
    format: Texture::DEPTH_FORMAT,
    depth_write_enabled: true,
    depth_compare: wgpu::CompareFunction::Less,
    stencil: NO_STENCIL,
    bias: NO_BIAS,
};

/// Depth-tested, depth-writing, unblended.
pub fn mk_opaque_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    color_format: wgpu::TextureFormat,
    mode: PrimitiveMode,
) -> wgpu::RenderPipeline {
    mk_render_pipeline(
        device,
        &format!("Opaque {mode:?} Pipeline"),
        layout,
        shader,
        color_format,
        OPAQUE_BLEND,
        OPAQUE_DEPTH,
        mode,
    )
}
