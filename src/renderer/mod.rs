//! Rendering abstraction layer.
//!
//! *The engine never touches a pixel buffer directly.*
//! It casts rays, turns each hit into a [`ColumnStrip`] and hands the strips
//! to a type that implements [`Renderer`].
//!
//! * Back-ends own their frame buffer and decide its pixel format.
//! * The finished frame leaves through a `submit` closure as packed
//!   `0x00RRGGBB` words, which is what every window toolkit we target eats.
//!
//! **Current limitation**: flat two-colour floor/ceiling; no floor casting.

use crate::{color::Color, world::Material, world::TextureBank};

/// Packed pixel format handed to the presentation surface (0x00RRGGBB).
pub type Rgba = u32;

/// Which grid line a ray crossed last.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// Crossed a vertical line: east/west face.
    X,
    /// Crossed a horizontal line: north/south face.
    Y,
}

/// One textured vertical wall slice, already projected to the screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnStrip {
    pub x: usize,
    pub material: Material,

    /* screen extents, inclusive, clipped to the frame */
    pub line_height: i32,
    pub draw_start: i32,
    pub draw_end: i32,

    /* texture addressing */
    pub tex_x: usize,
    pub tex_step: f32, // texels per screen pixel
    pub tex_pos: f32,  // texel row at `draw_start`

    /// North/south faces are drawn at half brightness.
    pub shaded: bool,
}

/// Flat floor/ceiling colours split at the horizon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shading {
    pub ceiling: Color,
    pub floor: Color,
}

impl Default for Shading {
    fn default() -> Self {
        Self {
            ceiling: Color::rgb(56, 56, 64),
            floor: Color::rgb(92, 88, 80),
        }
    }
}

/// Unpacked frame buffer, row-major.
#[derive(Clone, Debug, Default)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Color>,
}

impl Frame {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; width * height],
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Color {
        self.pixels[y * self.width + x]
    }
}

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
/// Software callers typically forward it to their window-manager.
pub trait Renderer {
    /// (Re)allocate scratch for the requested resolution and paint the
    /// ceiling/floor split.
    fn begin_frame(&mut self, width: usize, height: usize, shading: &Shading);

    /// Rasterise one textured wall column into the internal buffer.
    fn draw_column(&mut self, strip: &ColumnStrip, bank: &TextureBank);

    /// Solid rectangle, clipped to the frame.  Used for overlays.
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color);

    /// Finish the frame and **loan** the packed buffer to `submit`.
    ///
    /// * `submit(&[Rgba], w, h)` is run exactly once per frame.
    /// * Whatever `submit` returns is handed back to the caller.
    fn end_frame<F, T>(&mut self, submit: F) -> T
    where
        F: FnOnce(&[Rgba], usize, usize) -> T;
}

/// Convenience blanket-impl with a one-liner `draw_frame` adaptor.
pub trait RendererExt: Renderer {
    fn draw_frame<F, T>(
        &mut self,
        width: usize,
        height: usize,
        shading: &Shading,
        strips: &[ColumnStrip],
        bank: &TextureBank,
        submit: F,
    ) -> T
    where
        F: FnOnce(&[Rgba], usize, usize) -> T,
    {
        self.begin_frame(width, height, shading);
        for s in strips {
            self.draw_column(s, bank);
        }
        self.end_frame(submit)
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}

pub mod software;

pub use software::Software;
