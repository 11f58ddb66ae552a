// Procedural wall textures and the bank the renderer samples them from.
// The renderer and engine interact with the bank through `Material` only.

use std::collections::HashMap;
use std::f32::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::map::Material;
use crate::color::Color;

/// Runtime handle for a texture in this bank.
///
/// *Guaranteed* to remain stable for the lifetime of the bank.
pub type TextureId = u16;

/// `TextureId` whose pixels are the checkerboard fallback.
/// Always = 0 because `TextureBank::new()` inserts it first.
pub const NO_TEXTURE: TextureId = 0;

/// Side length used when nothing else is configured.
pub const DEFAULT_TEXTURE_SIZE: usize = 64;

/// Square texture, row-major.  Side is always a power of two so samplers
/// can wrap with `& mask()` instead of `%`.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub size: usize,
    pub pixels: Vec<Color>,
}

impl Texture {
    /// Two-tone 8-px checkerboard at `size`.
    pub fn checker(size: usize) -> Self {
        const LIGHT: Color = Color::rgb(160, 160, 160);
        const DARK: Color = Color::rgb(64, 64, 64);
        let cell = (size / 8).max(1);
        let mut pixels = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                pixels.push(if (x / cell ^ y / cell) & 1 == 0 {
                    LIGHT
                } else {
                    DARK
                });
            }
        }
        Texture { size, pixels }
    }

    /// Fill a `size`² texture with the rule for `material`.
    pub fn procedural<R: Rng>(material: Material, size: usize, rng: &mut R) -> Self {
        let mut pixels = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                pixels.push(match material {
                    Material::Stone => stone_texel(rng),
                    Material::Brick => brick_texel(x, y, size),
                    Material::Metal => metal_texel(x, y, size, rng),
                    Material::Wood => wood_texel(x, size),
                    Material::Pattern(id) => pattern_texel(x, y, size, id),
                });
            }
        }
        Texture { size, pixels }
    }

    /// Wrap mask for either axis.
    #[inline(always)]
    pub fn mask(&self) -> usize {
        self.size - 1
    }

    /// Sample with wrap-around on both axes.
    #[inline(always)]
    pub fn texel(&self, x: usize, y: usize) -> Color {
        let m = self.mask();
        self.pixels[(y & m) * self.size + (x & m)]
    }
}

/*──────────────────────── per-material rules ─────────────────────────*/

const STONE: Color = Color::rgb(112, 110, 104);
const BRICK: Color = Color::rgb(150, 46, 34);
const MORTAR: Color = Color::rgb(184, 180, 170);
const PLATE: Color = Color::rgb(118, 122, 132);
const PLATE_EDGE: Color = Color::rgb(58, 60, 68);
const RIVET: Color = Color::rgb(205, 208, 215);
const WOOD: Color = Color::rgb(146, 94, 48);

fn stone_texel<R: Rng>(rng: &mut R) -> Color {
    STONE.offset(rng.random_range(-28..=28))
}

/// Mortar every `size/2` px across and every `size/4` px down.
fn brick_texel(x: usize, y: usize, size: usize) -> Color {
    let (every_x, every_y) = ((size / 2).max(1), (size / 4).max(1));
    if x % every_x == 0 || y % every_y == 0 {
        MORTAR
    } else {
        BRICK
    }
}

/// Dark rim, 2x2 rivets where the `size/4` grid lines cross, noisy plate
/// elsewhere.
fn metal_texel<R: Rng>(x: usize, y: usize, size: usize, rng: &mut R) -> Color {
    let rim = (size / 16).max(1);
    if x < rim || y < rim || x >= size - rim || y >= size - rim {
        return PLATE_EDGE;
    }

    let tile = size / 4;
    let on_line = |v: usize| {
        let r = v % tile;
        r == 0 || r == tile - 1
    };
    if tile >= 4 && on_line(x) && on_line(y) {
        return RIVET;
    }

    PLATE.offset(rng.random_range(-12..=12))
}

/// Six full sine periods across the texture so the grain tiles seamlessly.
fn wood_texel(x: usize, size: usize) -> Color {
    let phase = x as f32 * TAU * 6.0 / size as f32;
    WOOD.scale(0.7 + 0.3 * (0.5 + 0.5 * phase.sin()))
}

fn pattern_texel(x: usize, y: usize, size: usize, id: u8) -> Color {
    let xor = ((x * 256 / size) ^ (y * 256 / size)) as u8;
    Color::rgb(id.wrapping_mul(48), xor, xor / 2)
}

/// Things that can go wrong when building or using the bank.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    /// Samplers wrap with a bit mask, so only powers of two work.
    #[error("texture size {0} is not a power of two")]
    NotPowerOfTwo(usize),

    /// Attempted to insert a second texture for the same material.
    #[error("material `{0}` already has a texture")]
    Duplicate(Material),

    /// Texture side differs from the bank's.
    #[error("texture is {actual} px, bank expects {expected} px")]
    SizeMismatch { expected: usize, actual: usize },

    /// Requested ID is outside `0 ..= bank.len()`.
    #[error("texture id {0} out of range")]
    BadId(TextureId),
}

fn check_size(size: usize) -> Result<(), TextureError> {
    if size.is_power_of_two() {
        Ok(())
    } else {
        Err(TextureError::NotPowerOfTwo(size))
    }
}

/// Generate one texture per material, in order.  Runs once at start-up.
pub fn generate<R: Rng>(
    materials: &[Material],
    size: usize,
    rng: &mut R,
) -> Result<Vec<Texture>, TextureError> {
    check_size(size)?;
    Ok(materials
        .iter()
        .map(|&m| Texture::procedural(m, size, rng))
        .collect())
}

/// Generate textures for cell ids `1..=material_count`.
pub fn generate_count<R: Rng>(
    material_count: u8,
    size: usize,
    rng: &mut R,
) -> Result<Vec<Texture>, TextureError> {
    let materials: Vec<Material> = (1..=material_count)
        .filter_map(Material::from_id)
        .collect();
    generate(&materials, size, rng)
}

/// Material → texture cache.
///
/// * Stores exactly one texture per material.
/// * ID **0** is always the checkerboard, returned for unknown materials.
/// * Every texture has the same power-of-two side.
pub struct TextureBank {
    by_material: HashMap<Material, TextureId>,
    data: Vec<Texture>,
    tints: Vec<Color>, // average colour per id, for the minimap
    size: usize,
}

impl TextureBank {
    // ---------------------------------------------------------------------
    // Constructors
    // ---------------------------------------------------------------------

    /// Empty bank holding only the fallback checkerboard.
    pub fn new(size: usize) -> Result<Self, TextureError> {
        check_size(size)?;
        let fallback = Texture::checker(size);
        Ok(Self {
            by_material: HashMap::new(),
            tints: vec![Color::average(&fallback.pixels)],
            data: vec![fallback],
            size,
        })
    }

    /// Generate textures for `materials`.  With `seed` the output is
    /// reproducible; without it every run looks slightly different.
    pub fn procedural(
        materials: &[Material],
        size: usize,
        seed: Option<u64>,
    ) -> Result<Self, TextureError> {
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };

        let mut bank = Self::new(size)?;
        for (&m, tex) in materials.iter().zip(generate(materials, size, &mut rng)?) {
            bank.insert(m, tex)?;
        }
        log::debug!(
            "generated {} textures at {size}x{size} (seed {seed:?})",
            materials.len()
        );
        Ok(bank)
    }

    // ---------------------------------------------------------------------
    // Query helpers
    // ---------------------------------------------------------------------

    /// Number of material textures; the fallback checker is not counted.
    pub fn len(&self) -> usize {
        self.by_material.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_material.is_empty()
    }

    /// Side length shared by every texture.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn id(&self, material: Material) -> Option<TextureId> {
        self.by_material.get(&material).copied()
    }

    /// Borrow a texture by id, with bounds-checking.
    pub fn get(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.data.get(id as usize).ok_or(TextureError::BadId(id))
    }

    /// Fallback-safe lookup: unknown materials get the checkerboard.
    #[inline]
    pub fn texture(&self, material: Material) -> &Texture {
        &self.data[self.id(material).unwrap_or(NO_TEXTURE) as usize]
    }

    /// Average colour of a material's texture.
    pub fn tint(&self, material: Material) -> Color {
        self.tints[self.id(material).unwrap_or(NO_TEXTURE) as usize]
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Insert a texture for `material`, returning its id.
    pub fn insert(&mut self, material: Material, tex: Texture) -> Result<TextureId, TextureError> {
        if self.by_material.contains_key(&material) {
            return Err(TextureError::Duplicate(material));
        }
        if tex.size != self.size {
            return Err(TextureError::SizeMismatch {
                expected: self.size,
                actual: tex.size,
            });
        }
        let id = self.data.len() as TextureId;
        self.tints.push(Color::average(&tex.pixels));
        self.data.push(tex);
        self.by_material.insert(material, id);
        Ok(id)
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
