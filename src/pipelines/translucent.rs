use crate::{
    data_structures::{object::PrimitiveMode, texture::Texture},
    pipelines::{NO_BIAS, NO_STENCIL, mk_render_pipeline},
};

/// `src * src_alpha + dst`, for colour and alpha alike.
pub const ADDITIVE_OVER: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

/// The depth attachment stays bound for the whole frame, so the pipeline
/// still declares it but always passes the test and never writes to it.
pub const TRANSLUCENT_DEPTH: wgpu::DepthStencilState = wgpu::DepthStencilState {
    format: Texture::DEPTH_FORMAT,
    depth_write_enabled: false,
    depth_compare: wgpu::CompareFunction::Always,
    stencil: NO_STENCIL,
    bias: NO_BIAS,
};

/// Blended and without depth testing.
pub fn mk_translucent_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    color_format: wgpu::TextureFormat,
    mode: PrimitiveMode,
) -> wgpu::RenderPipeline {
    mk_render_pipeline(
        device,
        &format!("Translucent {mode:?} Pipeline"),
        layout,
        shader,
        color_format,
        Some(ADDITIVE_OVER),
        TRANSLUCENT_DEPTH,
        mode,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translucent_pass_ignores_depth() {
        assert_eq!(TRANSLUCENT_DEPTH.depth_compare, wgpu::CompareFunction::Always);
        assert!(!TRANSLUCENT_DEPTH.depth_write_enabled);
        assert_eq!(TRANSLUCENT_DEPTH.format, Texture::DEPTH_FORMAT);
    }

    #[test]
    fn blending_adds_alpha_weighted_source_to_destination() {
        for component in [ADDITIVE_OVER.color, ADDITIVE_OVER.alpha] {
            assert_eq!(component.src_factor, wgpu::BlendFactor::SrcAlpha);
            assert_eq!(component.dst_factor, wgpu::BlendFactor::One);
            assert_eq!(component.operation, wgpu::BlendOperation::Add);
        }
    }
}
