//! GPU textures and the per-source texture slots of a session.
//!
//! [`Texture`] wraps the wgpu objects needed to sample an image and
//! [`DepthTexture`] is the depth attachment. [`TextureResource`] is the
//! startup record for one external image: it starts empty and becomes ready
//! exactly once, when the decoded image has been uploaded.

use crate::config::TextureSource;

/// A GPU texture with its view and sampler.
#[derive(Clone, Debug)]
pub struct Texture {
    #[allow(unused)]
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

/// The depth attachment of the frame. Never sampled.
#[derive(Debug)]
pub struct DepthTexture {
    #[allow(unused)]
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl DepthTexture {
    /// `size` is [width, height] in pixels, zero extents are clamped to one.
    pub fn descriptor(size: [u32; 2], label: &str) -> wgpu::TextureDescriptor<'_> {
        wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: size[0].max(1),
                height: size[1].max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Texture::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        }
    }

    pub fn new(device: &wgpu::Device, size: [u32; 2], label: &str) -> Self {
        let texture = device.create_texture(&Self::descriptor(size, label));
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }
}

impl Texture {
    /// Standard depth buffer texture format (32-bit float).
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Upload a decoded sRGB image.
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        img: &image::RgbaImage,
        label: &str,
    ) -> Self {
        let (width, height) = img.dimensions();
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            img.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }
}

/// A sampled image bound to a fixed slot once it has been uploaded.
pub struct TextureResource {
    pub source: TextureSource,
    pub(crate) texture: Option<Texture>,
    pub(crate) bind_group: Option<wgpu::BindGroup>,
}

impl TextureResource {
    pub fn new(source: TextureSource) -> Self {
        Self {
            source,
            texture: None,
            bind_group: None,
        }
    }

    pub fn unit(&self) -> usize {
        self.source.unit
    }

    pub fn is_ready(&self) -> bool {
        self.texture.is_some()
    }

    /// Stores the uploaded texture. Returns `false` and keeps the first
    /// upload if the resource was already ready.
    pub(crate) fn mark_ready(&mut self, texture: Texture, bind_group: wgpu::BindGroup) -> bool {
        if self.is_ready() {
            log::warn!(
                "texture {} was already loaded, ignoring the second upload",
                self.source.file_name
            );
            return false;
        }
        self.texture = Some(texture);
        self.bind_group = Some(bind_group);
        true
    }

    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.bind_group.as_ref()
    }
}

impl std::fmt::Debug for TextureResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureResource")
            .field("source", &self.source)
            .field("ready", &self.is_ready())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_attachment_is_not_sampled() {
        let desc = DepthTexture::descriptor([0, 480], "depth");
        assert_eq!(desc.usage, wgpu::TextureUsages::RENDER_ATTACHMENT);
        assert_eq!(desc.format, Texture::DEPTH_FORMAT);
        assert_eq!((desc.size.width, desc.size.height), (1, 480));
    }

    #[test]
    fn new_resource_is_not_ready() {
        let resource = TextureResource::new(TextureSource {
            file_name: "gold.png".to_string(),
            unit: 0,
        });
        assert!(!resource.is_ready());
        assert!(resource.bind_group().is_none());
        assert_eq!(resource.unit(), 0);
    }
}
