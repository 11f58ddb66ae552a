//! Grid collision for the camera.
//!
//! Each axis is tested on its own: X against the current row, then Y against
//! the column we ended up in.  Running diagonally into a wall therefore keeps
//! the free component and the camera slides along the face.

use glam::Vec2;

use crate::world::WorldMap;

/// Keeps a pulled-back camera off the exact border line.
const EDGE: f32 = 1e-3;

/// What the caller gets back.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveResult {
    pub pos: Vec2,      // final position
    pub blocked_x: bool, // X component refused
    pub blocked_y: bool, // Y component refused
}

/// Move `pos` by `delta`, committing each axis only if it lands in floor.
pub fn slide_move(map: &WorldMap, pos: Vec2, delta: Vec2) -> MoveResult {
    let mut next = pos;

    let blocked_x = map.is_solid_at(Vec2::new(pos.x + delta.x, pos.y));
    if !blocked_x {
        next.x += delta.x;
    }

    let blocked_y = map.is_solid_at(Vec2::new(next.x, pos.y + delta.y));
    if !blocked_y {
        next.y += delta.y;
    }

    MoveResult {
        pos: next,
        blocked_x,
        blocked_y,
    }
}

/// Positions on floor come back untouched.  Anything else is pulled inside
/// the border ring.
pub fn clamp_to_interior(map: &WorldMap, pos: Vec2) -> Vec2 {
    if !map.is_solid_at(pos) {
        return pos;
    }
    let max = Vec2::new(map.width() as f32 - 1.0, map.height() as f32 - 1.0) - EDGE;
    let clamped = pos.clamp(Vec2::ONE, max);
    log::warn!(
        "camera at {pos} left the {}x{} floor, pulled back to {clamped}",
        map.width(),
        map.height()
    );
    clamped
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
