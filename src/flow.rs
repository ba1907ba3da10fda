//! Application event loop.
//!
//! Startup opens the window, sets up the GPU, uploads every object and then
//! starts one asynchronous load per configured texture. Loaded images come
//! back as [`LucentEvent::TextureLoaded`] through the event loop proxy, are
//! uploaded on the main thread and counted by the readiness gate.
//!
//! # Lifecycle
//!
//! 1. `resumed` creates the window and the [`Session`], then spawns the loads
//! 2. `user_event` uploads each loaded texture and reports it to the gate
//! 3. `RedrawRequested` asks the [`FrameScheduler`] to draw or to retry later
//! 4. pointer events go to the [`InteractionController`] and request a redraw
//!
//! Setup failures are fatal: the loop exits and [`run`] returns the error.

use std::{collections::HashSet, fmt::Debug, sync::Arc};

use instant::Duration;
use winit::{
    application::ApplicationHandler,
    event::{StartCause, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::Window,
};

use crate::{
    config::SceneConfig,
    context::Context,
    data_structures::{
        object::{PrimitiveMode, RenderableObject},
        scene_state::SceneState,
        texture::{Texture, TextureResource},
    },
    interaction::{InteractionController, Response},
    readiness::ReadinessGate,
    render::{self, FrameRenderer},
    resources::texture::{load_image, texture_bind_group},
    schedule::{FrameScheduler, Repaint},
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// How long a closed gate waits before the next readiness check.
pub const RETRY_INTERVAL: Duration = Duration::from_millis(16);

/// Everything that exists once the GPU is up.
#[derive(Debug)]
pub struct Session {
    pub(crate) ctx: Context,
    pub(crate) renderer: FrameRenderer,
    pub(crate) objects: Vec<RenderableObject>,
    pub(crate) textures: Vec<TextureResource>,
    pub(crate) gate: ReadinessGate,
    pub(crate) scheduler: FrameScheduler,
    pub(crate) scene: SceneState,
    pub(crate) interaction: InteractionController,
}

impl Session {
    async fn new(
        window: Arc<Window>,
        config: &SceneConfig,
        mut objects: Vec<RenderableObject>,
    ) -> anyhow::Result<Self> {
        let modes: Vec<PrimitiveMode> = objects
            .iter()
            .map(|object| object.primitive_mode)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let ctx = Context::new(window, &modes, config.clear_colour).await?;

        for object in &mut objects {
            object.upload(&ctx.device, &ctx.layouts.object);
        }
        let misplaced = render::misplaced_objects(&objects);
        if !misplaced.is_empty() {
            log::warn!(
                "objects {misplaced:?} are in the wrong half of the list, they are drawn in the pass of their position"
            );
        }

        let renderer = FrameRenderer::new(&ctx, &config.ortho, config.translucency);
        let textures: Vec<TextureResource> = config
            .textures
            .iter()
            .cloned()
            .map(TextureResource::new)
            .collect();
        let gate = ReadinessGate::new(textures.len());
        log::info!(
            "{} objects uploaded, waiting for {} textures",
            objects.len(),
            gate.required()
        );

        Ok(Self {
            ctx,
            renderer,
            objects,
            textures,
            gate,
            scheduler: FrameScheduler::new(config.stall_warning),
            scene: SceneState::default(),
            interaction: InteractionController::new(),
        })
    }

    /// Uploads a decoded image into the slot of `unit` and reports it to the
    /// gate. Unknown units and repeated uploads are ignored.
    fn upload_texture(&mut self, unit: usize, file_name: &str, img: &image::RgbaImage) {
        let Some(resource) = self.textures.iter_mut().find(|t| t.unit() == unit) else {
            log::warn!("no texture slot for unit {unit}, dropping {file_name}");
            return;
        };
        let texture = Texture::from_image(&self.ctx.device, &self.ctx.queue, img, file_name);
        let bind_group =
            texture_bind_group(&self.ctx.device, &self.ctx.layouts.texture, &texture, file_name);
        if resource.mark_ready(texture, bind_group) {
            self.gate.on_resource_ready();
            log::info!(
                "texture {file_name} ready on unit {unit} ({}/{})",
                self.gate.loaded(),
                self.gate.required()
            );
        }
    }

    fn repaint(&mut self, event_loop: &ActiveEventLoop) {
        let Self {
            ctx,
            renderer,
            objects,
            textures,
            gate,
            scheduler,
            scene,
            ..
        } = self;
        match scheduler.on_repaint(gate, || renderer.draw_frame(ctx, scene, objects, textures)) {
            Repaint::Drawn(Ok(())) => {}
            Repaint::Rescheduled => {
                #[cfg(not(target_arch = "wasm32"))]
                event_loop.set_control_flow(ControlFlow::wait_duration(RETRY_INTERVAL));
                // The browser paces redraws to its animation frames.
                #[cfg(target_arch = "wasm32")]
                ctx.window.request_redraw();
            }
            // Reconfigure the surface if it's lost or outdated
            Repaint::Drawn(Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                let size = ctx.window.inner_size();
                ctx.resize(size.width, size.height);
                ctx.window.request_redraw();
            }
            Repaint::Drawn(Err(wgpu::SurfaceError::OutOfMemory)) => {
                log::error!("out of GPU memory, shutting down");
                event_loop.exit();
            }
            Repaint::Drawn(Err(e)) => {
                log::error!("Unable to render {e}");
            }
        }
    }
}

pub(crate) enum LucentEvent {
    TextureLoaded {
        unit: usize,
        file_name: String,
        result: anyhow::Result<image::RgbaImage>,
    },
    /// Sent by the asynchronous setup on the web.
    #[allow(dead_code)]
    Initialized(anyhow::Result<Box<Session>>),
}

impl Debug for LucentEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TextureLoaded {
                unit,
                file_name,
                result,
            } => f
                .debug_struct("TextureLoaded")
                .field("unit", unit)
                .field("file_name", file_name)
                .field("ok", &result.is_ok())
                .finish(),
            Self::Initialized(result) => f
                .debug_tuple("Initialized")
                .field(&result.is_ok())
                .finish(),
        }
    }
}

pub(crate) struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    proxy: winit::event_loop::EventLoopProxy<LucentEvent>,
    config: SceneConfig,
    session: Option<Session>,
    // Moved into the session once the GPU is up.
    pending_objects: Option<Vec<RenderableObject>>,
    fatal: Option<anyhow::Error>,
}

impl App {
    fn new(
        event_loop: &EventLoop<LucentEvent>,
        config: SceneConfig,
        objects: Vec<RenderableObject>,
    ) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime: tokio::runtime::Runtime::new()?,
            proxy,
            config,
            session: None,
            pending_objects: Some(objects),
            fatal: None,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{error:#}");
        self.fatal = Some(error);
        event_loop.exit();
    }

    fn start_session(&mut self, mut session: Session) {
        let size = session.ctx.window.inner_size();
        session.ctx.resize(size.width, size.height);
        session.ctx.window.request_redraw();
        self.session = Some(session);
        self.spawn_texture_loads();
    }

    /// One load per texture, in no particular completion order.
    fn spawn_texture_loads(&self) {
        for source in self.config.textures.iter().cloned() {
            let proxy = self.proxy.clone();
            let load = async move {
                let result = load_image(&source.file_name).await;
                let event = LucentEvent::TextureLoaded {
                    unit: source.unit,
                    file_name: source.file_name,
                    result,
                };
                if proxy.send_event(event).is_err() {
                    log::warn!("event loop closed before texture unit {} arrived", source.unit);
                }
            };
            #[cfg(not(target_arch = "wasm32"))]
            self.async_runtime.spawn(load);
            #[cfg(target_arch = "wasm32")]
            wasm_bindgen_futures::spawn_local(load);
        }
    }
}

impl ApplicationHandler<LucentEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(objects) = self.pending_objects.take() else {
            return;
        };

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.viewport[0],
                self.config.viewport[1],
            ));

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let window = wgpu::web_sys::window().unwrap_throw();
            let document = window.document().unwrap_throw();
            let canvas = document.get_element_by_id(CANVAS_ID).unwrap_throw();
            let html_canvas_element = canvas.unchecked_into();
            window_attributes = window_attributes.with_canvas(Some(html_canvas_element));
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, anyhow::Error::new(e).context("cannot open a window")),
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            let init = Session::new(window, &self.config, objects);
            match self.async_runtime.block_on(init) {
                Ok(session) => self.start_session(session),
                Err(e) => self.fail(event_loop, e),
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            let config = self.config.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = Session::new(window, &config, objects).await.map(Box::new);
                if proxy.send_event(LucentEvent::Initialized(result)).is_err() {
                    log::error!("event loop closed during setup");
                }
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: LucentEvent) {
        match event {
            LucentEvent::Initialized(Ok(session)) => self.start_session(*session),
            LucentEvent::Initialized(Err(e)) => self.fail(event_loop, e),
            LucentEvent::TextureLoaded {
                unit,
                file_name,
                result,
            } => {
                let Some(session) = &mut self.session else {
                    log::warn!("texture {file_name} arrived before the GPU was ready");
                    return;
                };
                match result {
                    Ok(img) => {
                        session.upload_texture(unit, &file_name, &img);
                        session.ctx.window.request_redraw();
                    }
                    // The gate stays closed, the scheduler keeps waiting.
                    Err(e) => log::error!("cannot load texture {file_name}: {e:#}"),
                }
            }
        }
    }

    fn new_events(&mut self, event_loop: &ActiveEventLoop, cause: StartCause) {
        if let StartCause::ResumeTimeReached { .. } = cause {
            event_loop.set_control_flow(ControlFlow::Wait);
            if let Some(session) = &self.session {
                session.ctx.window.request_redraw();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let session = match &mut self.session {
            Some(session) => session,
            None => return,
        };

        let scale_factor = session.ctx.window.scale_factor();
        if session
            .interaction
            .on_window_event(&mut session.scene, &event, scale_factor)
            == Response::Redraw
        {
            session.ctx.window.request_redraw();
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                session.ctx.resize(size.width, size.height);
                session.ctx.window.request_redraw();
            }
            WindowEvent::RedrawRequested => session.repaint(event_loop),
            _ => {}
        }
    }
}

/// Opens the window and runs the scene until it is closed.
///
/// `objects` must list every opaque object before every translucent one.
pub fn run(config: SceneConfig, objects: Vec<RenderableObject>) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Could not initialize logger: {e}").into());
        }
    }

    let event_loop: EventLoop<LucentEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop, config, objects)?;

    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn run_web() -> Result<(), wasm_bindgen::JsValue> {
    run(SceneConfig::default(), crate::scene::default_scene())
        .map_err(|e| wasm_bindgen::JsValue::from_str(&format!("{e:#}")))
}
