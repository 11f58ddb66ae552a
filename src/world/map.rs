//! Grid world: one byte per cell, `0` = floor, anything else = wall material.
//!
//! The map is validated once at construction and never mutated afterwards.
//! Every border cell must be solid; the DDA walk in [`crate::engine::raycast`]
//! relies on that to terminate, so a map with a hole in its border is refused
//! instead of being patched up at runtime.

use std::fmt;
use std::str::FromStr;

use glam::{IVec2, Vec2};

/// Compiled-in 24×24 level.  One glyph per cell, rows run north → south.
const BUILTIN_LAYOUT: &str = "
111111111111111111111111
100000000000000000000001
100000000000000000000001
100022222000003030300001
100020002000000000000001
100020002000003000300001
100020002000000000000001
100022022000003030300001
100000000000000000000001
100000000000000000000001
100000000000000000000001
100000000000000000000001
100000000000000000000001
100000000000000000000001
100000000000000000000001
144444444000000000000001
140400004000000000000001
140000504000000000000001
140400004000000000000001
140444444000000000000001
140000000000000000000001
144444444000000000000001
100000000000000000000001
111111111111111111111111
";

/// Wall material.  Replaces raw `cell - 1` texture indexing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Material {
    /// Rough noise over a grey base (cell id 1).
    Stone,
    /// Red brick with a mortar grid (cell id 2).
    Brick,
    /// Riveted metal plate (cell id 3).
    Metal,
    /// Sine-banded wood grain (cell id 4).
    Wood,
    /// Any other id: XOR checker fallback.
    Pattern(u8),
}

impl Material {
    /// Map a stored cell id to its material; `0` is floor, not a material.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => None,
            1 => Some(Self::Stone),
            2 => Some(Self::Brick),
            3 => Some(Self::Metal),
            4 => Some(Self::Wood),
            n => Some(Self::Pattern(n)),
        }
    }

    /// Cell id this material is stored as.
    pub fn id(self) -> u8 {
        match self {
            Self::Stone => 1,
            Self::Brick => 2,
            Self::Metal => 3,
            Self::Wood => 4,
            Self::Pattern(n) => n,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Stone => "stone",
            Self::Brick => "brick",
            Self::Metal => "metal",
            Self::Wood => "wood",
            Self::Pattern(_) => "pattern",
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pattern(n) => write!(f, "pattern#{n}"),
            other => f.write_str(other.name()),
        }
    }
}

/// Classification of one in-bounds cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Wall(Material),
}

impl Cell {
    #[inline]
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// Things that make a map unusable.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MapError {
    #[error("map has no cells")]
    Empty,

    #[error("map is {width}x{height}, need at least 3x3")]
    TooSmall { width: usize, height: usize },

    #[error("row {row} has {len} cells, expected {expected}")]
    Ragged { row: usize, len: usize, expected: usize },

    #[error("cell buffer holds {actual} cells, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Border cell is floor; rays and the player could leave the grid.
    #[error("border cell ({col}, {row}) is open")]
    OpenBorder { col: usize, row: usize },

    #[error("unexpected glyph `{glyph}` at row {row}, column {col}")]
    BadGlyph { row: usize, col: usize, glyph: char },
}

/// Immutable, validated wall grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldMap {
    width: usize,
    height: usize,
    cells: Vec<u8>, // row-major
}

impl WorldMap {
    /// Build from a row-major cell buffer.
    pub fn new(width: usize, height: usize, cells: Vec<u8>) -> Result<Self, MapError> {
        if width == 0 || height == 0 {
            return Err(MapError::Empty);
        }
        if width < 3 || height < 3 {
            return Err(MapError::TooSmall { width, height });
        }
        if cells.len() != width * height {
            return Err(MapError::SizeMismatch {
                expected: width * height,
                actual: cells.len(),
            });
        }

        let map = Self {
            width,
            height,
            cells,
        };
        map.check_border()?;
        Ok(map)
    }

    /// The level the binary starts in.
    pub fn builtin() -> Result<Self, MapError> {
        BUILTIN_LAYOUT.parse()
    }

    fn check_border(&self) -> Result<(), MapError> {
        let (w, h) = (self.width, self.height);
        let border = (0..w)
            .flat_map(|col| [(col, 0), (col, h - 1)])
            .chain((1..h - 1).flat_map(|row| [(0, row), (w - 1, row)]));

        for (col, row) in border {
            if self.cells[row * w + col] == 0 {
                return Err(MapError::OpenBorder { col, row });
            }
        }
        Ok(())
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, col: i32, row: i32) -> Option<usize> {
        if col < 0 || row < 0 || col as usize >= self.width || row as usize >= self.height {
            return None;
        }
        Some(row as usize * self.width + col as usize)
    }

    /// Stored id at `(col, row)`, or `u8::MAX` outside the grid.
    #[inline]
    pub fn raw(&self, col: i32, row: i32) -> u8 {
        self.index(col, row).map_or(u8::MAX, |i| self.cells[i])
    }

    /// Classify `(col, row)`; `None` when outside `[0, w) × [0, h)`.
    #[inline]
    pub fn cell_at(&self, col: i32, row: i32) -> Option<Cell> {
        let id = self.cells[self.index(col, row)?];
        Some(match Material::from_id(id) {
            Some(m) => Cell::Wall(m),
            None => Cell::Empty,
        })
    }

    /// Wall or outside the grid.
    #[inline]
    pub fn is_solid(&self, col: i32, row: i32) -> bool {
        self.raw(col, row) != 0
    }

    /// Solidity of the cell containing a world-space point.
    #[inline]
    pub fn is_solid_at(&self, p: Vec2) -> bool {
        let c = Self::cell_of(p);
        self.is_solid(c.x, c.y)
    }

    /// Grid cell containing `p` (`floor` on both axes).
    #[inline]
    pub fn cell_of(p: Vec2) -> IVec2 {
        p.floor().as_ivec2()
    }

    /// Distinct materials used by the map, sorted.
    pub fn materials(&self) -> Vec<Material> {
        let mut seen = [false; 256];
        for &id in &self.cells {
            seen[id as usize] = true;
        }
        (1..=255u8)
            .filter(|&id| seen[id as usize])
            .filter_map(Material::from_id)
            .collect()
    }
}

impl FromStr for WorldMap {
    type Err = MapError;

    /// One line per row, one hex digit per cell.  Blank lines are skipped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cells = Vec::new();
        let mut width = 0;
        let mut height = 0;

        for line in s.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let row = height;
            let start = cells.len();
            for (col, glyph) in line.chars().enumerate() {
                let id = glyph
                    .to_digit(16)
                    .ok_or(MapError::BadGlyph { row, col, glyph })?;
                cells.push(id as u8);
            }

            let len = cells.len() - start;
            if row == 0 {
                width = len;
            } else if len != width {
                return Err(MapError::Ragged {
                    row,
                    len,
                    expected: width,
                });
            }
            height += 1;
        }

        Self::new(width, height, cells)
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
