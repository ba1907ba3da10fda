use std::sync::Arc;

use anyhow::Context as _;
use winit::window::Window;

use crate::{
    data_structures::{object::PrimitiveMode, texture},
    pipelines::{Layouts, Pipelines},
    render,
    resources::{mesh, texture::texture_layout},
};

/// The window and the GPU objects that live as long as it does.
#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: texture::DepthTexture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub layouts: Layouts,
    pub pipelines: Pipelines,
    pub clear_colour: wgpu::Color,
}

impl Context {
    /// Sets up the GPU for `window` and builds a pipeline pair for every
    /// primitive mode in `modes`.
    ///
    /// Fails if no adapter or device is available or if the shader or any
    /// pipeline is rejected by validation.
    pub async fn new(
        window: Arc<Window>,
        modes: &[PrimitiveMode],
        clear_colour: wgpu::Color,
    ) -> anyhow::Result<Self> {
        let size = window.inner_size();

        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("cannot create a surface for the window")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no graphics adapter can present to this window")?;
        log::info!("device and queue on {}", adapter.get_info().name);
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
                ..Default::default()
            })
            .await
            .context("cannot open the graphics device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        // The shader writes linear colour, the surface does the sRGB encoding.
        let Some(surface_format) = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
        else {
            anyhow::bail!("the surface reports no usable texture format");
        };
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let layouts = Layouts {
            scene: render::scene_layout(&device),
            object: mesh::object_layout(&device),
            texture: texture_layout(&device),
        };
        let pipelines = Pipelines::new(&device, &config, &layouts, modes);
        if let Some(error) = device.pop_error_scope().await {
            anyhow::bail!("shader or pipeline setup failed: {error}");
        }

        let depth_texture =
            texture::DepthTexture::new(&device, [config.width, config.height], "depth_texture");

        Ok(Self {
            window,
            depth_texture,
            surface,
            device,
            queue,
            config,
            layouts,
            pipelines,
            clear_colour,
        })
    }

    /// Reconfigures the surface and the depth attachment. The projection
    /// stays as it is.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            texture::DepthTexture::new(&self.device, [width, height], "depth_texture");
    }

    pub fn window(&self) -> &Window {
        &self.window
    }
}
