use glam::{IVec2, Vec2};

/// Default camera-plane length; ≈ 66° horizontal field of view.
pub const DEFAULT_PLANE_LEN: f32 = 0.66;

/// Player view-point in grid space.
///
/// * `pos` is in cell units; cell `(c, r)` covers `[c, c+1) × [r, r+1)`.
/// * `dir` is unit length, `plane` is perpendicular to it and points to the
///   viewer's right.  `|plane|` sets the field of view.
/// * x grows east, y grows south, so a positive turn is clockwise on the
///   minimap (a right turn).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pos: Vec2,
    dir: Vec2,
    plane: Vec2,
}

impl Camera {
    /// Create a camera at `pos` looking along `dir` (normalised here).
    pub fn new(pos: Vec2, dir: Vec2, plane_len: f32) -> Self {
        let dir = dir.normalize_or(Vec2::X);
        Self {
            pos,
            dir,
            plane: dir.perp() * plane_len,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn dir(&self) -> Vec2 {
        self.dir
    }

    #[inline]
    pub fn plane(&self) -> Vec2 {
        self.plane
    }

    /// Grid cell the camera stands in.
    #[inline]
    pub fn cell(&self) -> IVec2 {
        self.pos.floor().as_ivec2()
    }

    /// Horizontal field of view in radians.
    pub fn fov(&self) -> f32 {
        2.0 * (self.plane.length() / self.dir.length()).atan()
    }

    /// Rotate view and plane together by `angle` radians (positive = right).
    pub fn rotate(&mut self, angle: f32) {
        let rot = Vec2::from_angle(angle);
        self.dir = rot.rotate(self.dir);
        self.plane = rot.rotate(self.plane);
    }

    pub(crate) fn set_pos(&mut self, pos: Vec2) {
        self.pos = pos;
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
