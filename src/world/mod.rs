mod camera;
mod map;
pub mod texture;

pub use camera::{Camera, DEFAULT_PLANE_LEN};

pub use map::{Cell, MapError, Material, WorldMap};

pub use texture::{
    DEFAULT_TEXTURE_SIZE, NO_TEXTURE, Texture, TextureBank, TextureError, TextureId, generate,
    generate_count,
};
