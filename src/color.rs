//! Plain RGBA colour used by textures and the frame buffer.
//!
//! Nothing inside the engine knows about packed pixel layouts; packing happens
//! once per frame at the presentation boundary.

/// 8-bit-per-channel colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Halve every colour channel (alpha untouched).
    #[inline]
    pub const fn darken(self) -> Self {
        Self {
            r: self.r >> 1,
            g: self.g >> 1,
            b: self.b >> 1,
            a: self.a,
        }
    }

    /// Multiply every colour channel by `k` (clamped to `0.0..=1.0`).
    #[inline]
    pub fn scale(self, k: f32) -> Self {
        let k = k.clamp(0.0, 1.0);
        let ch = |c: u8| (c as f32 * k).round() as u8;
        Self {
            r: ch(self.r),
            g: ch(self.g),
            b: ch(self.b),
            a: self.a,
        }
    }

    /// Add a signed offset to every colour channel, saturating.
    #[inline]
    pub fn offset(self, d: i16) -> Self {
        let ch = |c: u8| (c as i16 + d).clamp(0, 255) as u8;
        Self {
            r: ch(self.r),
            g: ch(self.g),
            b: ch(self.b),
            a: self.a,
        }
    }

    /// 0xAARRGGBB.  minifb ignores the top byte.
    #[inline]
    pub const fn to_argb(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Channel-wise mean of a set of colours; black for an empty set.
    pub fn average(colors: &[Color]) -> Color {
        if colors.is_empty() {
            return Color::BLACK;
        }
        let (mut r, mut g, mut b) = (0u64, 0u64, 0u64);
        for c in colors {
            r += c.r as u64;
            g += c.g as u64;
            b += c.b as u64;
        }
        let n = colors.len() as u64;
        Color::rgb((r / n) as u8, (g / n) as u8, (b / n) as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_argb() {
        let c = Color {
            r: 0x11,
            g: 0x22,
            b: 0x33,
            a: 0xFF,
        };
        assert_eq!(c.to_argb(), 0xFF_112233);
    }

    #[test]
    fn darken_halves_channels() {
        assert_eq!(Color::rgb(200, 101, 0).darken(), Color::rgb(100, 50, 0));
    }

    #[test]
    fn offset_saturates() {
        assert_eq!(Color::rgb(250, 5, 100).offset(10), Color::rgb(255, 15, 110));
        assert_eq!(Color::rgb(250, 5, 100).offset(-10), Color::rgb(240, 0, 90));
    }
}
