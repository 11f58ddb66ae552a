//! ---------------------------------------------------------------------------
//! Classic software (CPU) column renderer
//!
//! * Keeps an unpacked [`Frame`] of [`Color`]s and a packed `0x00RRGGBB`
//!   mirror that is refreshed once per frame in `end_frame`.
//! * Every frame is fully overwritten: the ceiling/floor split first, then
//!   one textured strip per screen column, then overlays.
//! ---------------------------------------------------------------------------

use crate::{
    color::Color,
    engine::raycast::texel_row,
    renderer::{ColumnStrip, Frame, Renderer, Rgba, Shading},
    world::TextureBank,
};

/*───────────────────────────────────────────────────────────────────────*/
/*                              Backend                                 */
/*───────────────────────────────────────────────────────────────────────*/

/// Wolfenstein-style column renderer.
#[derive(Default)]
pub struct Software {
    frame: Frame,
    packed: Vec<Rgba>,
}

impl Software {
    /// Last rendered frame, unpacked.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize, shading: &Shading) {
        // (re)allocate if resolution changed
        if w != self.frame.width || h != self.frame.height {
            log::debug!("software renderer resized to {w}x{h}");
            self.frame = Frame::new(w, h);
            self.packed.resize(w * h, 0);
        }

        /* ceiling above the horizon, floor below */
        let split = (h / 2) * w;
        let (top, bottom) = self.frame.pixels.split_at_mut(split);
        top.fill(shading.ceiling);
        bottom.fill(shading.floor);
    }

    fn draw_column(&mut self, strip: &ColumnStrip, bank: &TextureBank) {
        let (w, h) = (self.frame.width, self.frame.height);
        if strip.x >= w || strip.draw_start > strip.draw_end {
            return;
        }

        let tex = bank.texture(strip.material);
        let mask = tex.mask() as i32;
        let y0 = strip.draw_start.max(0) as usize;
        let y1 = strip.draw_end.min(h as i32 - 1) as usize;

        let mut tex_pos = strip.tex_pos;
        let mut idx = y0 * w + strip.x;
        for _ in y0..=y1 {
            let tex_y = texel_row(tex_pos, mask) as usize;
            tex_pos += strip.tex_step;

            let c = tex.texel(strip.tex_x, tex_y);
            self.frame.pixels[idx] = if strip.shaded { c.darken() } else { c };
            idx += w;
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        let fw = self.frame.width as i32;
        let fh = self.frame.height as i32;
        let (x0, x1) = (x.max(0), (x + w).min(fw));
        let (y0, y1) = (y.max(0), (y + h).min(fh));
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        for row in y0..y1 {
            let start = row as usize * self.frame.width;
            self.frame.pixels[start + x0 as usize..start + x1 as usize].fill(color);
        }
    }

    fn end_frame<F, T>(&mut self, submit: F) -> T
    where
        F: FnOnce(&[Rgba], usize, usize) -> T,
    {
        for (dst, c) in self.packed.iter_mut().zip(&self.frame.pixels) {
            *dst = c.to_argb() & 0x00FF_FFFF;
        }
        submit(&self.packed, self.frame.width, self.frame.height)
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        renderer::RendererExt,
        world::{Material, Texture, TextureBank},
    };

    const BLUE: Color = Color::rgb(0, 0, 200);

    /* tiny helpers ---------------------------------------------------*/
    fn tiny_bank() -> TextureBank {
        let mut bank = TextureBank::new(4).unwrap();
        bank.insert(
            Material::Stone,
            Texture {
                size: 4,
                pixels: vec![BLUE; 16],
            },
        )
        .unwrap();
        bank
    }

    fn blue_strip(x: usize) -> ColumnStrip {
        ColumnStrip {
            x,
            material: Material::Stone,
            line_height: 4,
            draw_start: 2,
            draw_end: 5,
            tex_x: 1,
            tex_step: 1.0,
            tex_pos: 0.0,
            shaded: false,
        }
    }

    #[test]
    fn software_renders_strip() {
        let bank = tiny_bank();
        let mut sw = Software::default();
        let shading = Shading::default();

        let (packed, w, h) = sw.draw_frame(8, 8, &shading, &[blue_strip(3)], &bank, |fb, w, h| {
            (fb.to_vec(), w, h)
        });

        assert_eq!((w, h), (8, 8));
        let frame = sw.frame();
        for y in 0..8 {
            let expected = match y {
                2..=5 => BLUE,
                0..=3 => shading.ceiling,
                _ => shading.floor,
            };
            assert_eq!(frame.get(3, y), expected, "row {y}");
        }
        assert_eq!(packed[2 * 8 + 3], 0x00_0000C8);
        assert_eq!(frame.get(0, 0), shading.ceiling);
        assert_eq!(frame.get(0, 7), shading.floor);
    }

    #[test]
    fn shaded_strip_is_darker() {
        let bank = tiny_bank();
        let mut sw = Software::default();
        let strip = ColumnStrip {
            shaded: true,
            ..blue_strip(0)
        };
        sw.draw_frame(4, 8, &Shading::default(), &[strip], &bank, |_, _, _| ());
        assert_eq!(sw.frame().get(0, 3), BLUE.darken());
    }

    #[test]
    fn fill_rect_clips() {
        let mut sw = Software::default();
        sw.begin_frame(4, 4, &Shading::default());
        sw.fill_rect(-2, 2, 4, 10, Color::WHITE);
        assert_eq!(sw.frame().get(0, 3), Color::WHITE);
        assert_eq!(sw.frame().get(1, 2), Color::WHITE);
        assert_ne!(sw.frame().get(2, 2), Color::WHITE);
        assert_ne!(sw.frame().get(0, 1), Color::WHITE);
    }
}
