//! Startup configuration.
//!
//! The viewport, the projection box and the two texture sources are the only
//! external inputs. They are read once when the session starts.

use std::time::Duration;

use crate::transform::OrthoSpec;

/// One image that has to be loaded before the first frame.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureSource {
    /// Path below the asset root (native) or below `<origin>/assets` (web).
    pub file_name: String,
    /// Slot the texture is bound to when drawing.
    pub unit: usize,
}

#[derive(Clone, Debug)]
pub struct SceneConfig {
    pub title: String,
    /// Window size in logical pixels, the unit pointer drags are measured in.
    pub viewport: [u32; 2],
    pub ortho: OrthoSpec,
    pub textures: Vec<TextureSource>,
    pub clear_colour: wgpu::Color,
    /// Alpha used for every object of the translucent group.
    pub translucency: f32,
    /// How long the scheduler waits before warning about missing textures.
    pub stall_warning: Duration,
}

impl SceneConfig {
    /// Texture slot of the opaque group.
    pub const OPAQUE_UNIT: usize = 0;
    /// Texture slot of the translucent group.
    pub const TRANSLUCENT_UNIT: usize = 1;
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            title: "lucent".to_string(),
            viewport: [600, 600],
            ortho: OrthoSpec {
                left: -2.0,
                right: 2.0,
                bottom: -2.0,
                top: 2.0,
                near: -10.0,
                far: 10.0,
            },
            textures: vec![
                TextureSource {
                    file_name: "gold.png".to_string(),
                    unit: Self::OPAQUE_UNIT,
                },
                TextureSource {
                    file_name: "water.png".to_string(),
                    unit: Self::TRANSLUCENT_UNIT,
                },
            ],
            clear_colour: wgpu::Color::BLACK,
            translucency: 0.5,
            stall_warning: Duration::from_secs(5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_needs_gold_and_water_on_distinct_units() {
        let config = SceneConfig::default();
        assert_eq!(config.textures.len(), 2);
        assert_eq!(config.textures[0].file_name, "gold.png");
        assert_eq!(config.textures[0].unit, SceneConfig::OPAQUE_UNIT);
        assert_eq!(config.textures[1].file_name, "water.png");
        assert_eq!(config.textures[1].unit, SceneConfig::TRANSLUCENT_UNIT);
    }

    #[test]
    fn default_projection_box_has_non_zero_spans() {
        let o = SceneConfig::default().ortho;
        assert_ne!(o.right, o.left);
        assert_ne!(o.top, o.bottom);
        assert_ne!(o.far, o.near);
    }
}
