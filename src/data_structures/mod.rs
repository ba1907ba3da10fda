//! Engine data structures: solids, textures and the interactive scene state.
//!
//! - `object` holds renderable solids with their attribute arrays and GPU buffers
//! - `scene_state` holds the scene rotation and the drag gesture in progress
//! - `texture` contains the GPU texture wrapper and the per-source texture slots

pub mod object;
pub mod scene_state;
pub mod texture;
