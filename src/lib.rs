//! lucent-ngin
//!
//! A small cross-platform renderer for a scene of textured solids, some of
//! them opaque and some translucent, that the user turns by dragging with the
//! mouse. It runs natively and in the browser through WebGL.
//!
//! Nothing is drawn until every configured texture has been loaded. After
//! that each repaint draws the opaque half of the object list with depth
//! testing, then blends the translucent half on top.
//!
//! High-level modules
//! - `config`: window, projection, texture and blending settings
//! - `context`: central GPU and window context that owns device/queue/pipelines
//! - `data_structures`: solids, textures and the interactive scene state
//! - `flow`: the event loop tying loading, scheduling and input together
//! - `interaction`: drag-to-rotate from pointer events
//! - `pipelines`: the opaque and the translucent render pipelines
//! - `readiness`: the gate that holds back drawing until resources are loaded
//! - `render`: frame composition and the draw order of the two passes
//! - `resources`: procedural geometry, GPU buffer creation and image loading
//! - `scene`: the default set of solids
//! - `schedule`: the repaint decision made on every redraw request
//! - `transform`: rotation and orthographic projection matrices
//!

pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod interaction;
pub mod pipelines;
pub mod readiness;
pub mod render;
pub mod resources;
pub mod scene;
pub mod schedule;
pub mod transform;

// Re-exports commonly used types for convenience in downstream code.
pub use config::{SceneConfig, TextureSource};
pub use data_structures::object::{Material, PrimitiveMode, RenderableObject};
pub use flow::run;
pub use transform::{ortho_matrix, rotation_matrix};
pub use cgmath;
pub use winit::event::WindowEvent;
