use glam::Vec2;

use crate::renderer::Shading;
use crate::world::{DEFAULT_PLANE_LEN, DEFAULT_TEXTURE_SIZE};

/// Movement constants, all per second of simulated time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tuning {
    pub move_speed: f32,        // cells / second
    pub rot_speed: f32,         // radians / second
    pub sprint_multiplier: f32, // applied to move_speed while Sprint is held
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            rot_speed: 3.0,
            sprint_multiplier: 2.0,
        }
    }
}

/// Everything the engine needs besides the map and textures.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub screen_w: usize,
    pub screen_h: usize,
    pub texture_size: usize,

    /* spawn */
    pub spawn_pos: Vec2,
    pub spawn_dir: Vec2,
    pub plane_len: f32,

    pub tuning: Tuning,
    pub shading: Shading,

    /// `None` hides the overlay.
    pub minimap_cell_px: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            screen_w: 640,
            screen_h: 480,
            texture_size: DEFAULT_TEXTURE_SIZE,
            spawn_pos: Vec2::new(22.5, 11.5),
            spawn_dir: Vec2::NEG_X,
            plane_len: DEFAULT_PLANE_LEN,
            tuning: Tuning::default(),
            shading: Shading::default(),
            minimap_cell_px: Some(5),
        }
    }
}
