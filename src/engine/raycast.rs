//! DDA grid traversal and per-column projection.
//!
//! ```text
//!   camera_x ∈ [-1, 1]   ray = dir + plane · camera_x
//!   walk grid lines until a solid cell → perpendicular distance
//!   line_height = screen_h / perp_dist
//! ```
//!
//! Distances are measured along the view axis, not along the ray, so a flat
//! wall facing the camera projects to a constant height (no fisheye).

use glam::{IVec2, Vec2};
use rayon::prelude::*;

use crate::{
    renderer::{ColumnStrip, Side},
    world::{Camera, Cell, Material, WorldMap},
};

/// Stand-in for `1 / 0` when a ray component is exactly zero.
const NEVER: f32 = 1e30;

/// Closest a wall may get before projection, keeps `h / perp` finite.
const MIN_PERP: f32 = 1e-4;

/// Result of one DDA walk.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Solid cell the ray stopped in.
    pub cell: IVec2,
    pub side: Side,
    pub material: Material,
    /// Distance along the camera's forward axis.
    pub perp_dist: f32,
    /// Fractional hit position along the face, `0.0..1.0`.
    pub wall_x: f32,
    /// Grid lines crossed.
    pub steps: u32,
}

/// Screen column → camera-space x in `[-1, 1)`.
#[inline]
pub fn camera_x(x: usize, screen_w: usize) -> f32 {
    2.0 * x as f32 / screen_w as f32 - 1.0
}

#[inline]
pub fn ray_direction(camera: &Camera, camera_x: f32) -> Vec2 {
    camera.dir() + camera.plane() * camera_x
}

/// Wrapped texel row for an accumulated texture position.
/// `mask` must be `size - 1` for a power-of-two `size`.
#[inline(always)]
pub fn texel_row(tex_pos: f32, mask: i32) -> i32 {
    (tex_pos.floor() as i32) & mask
}

/// Walk `ray_dir` from `origin` until a solid cell.
///
/// Gives up after `width + height` grid crossings (more than any straight
/// walk across a bordered map needs) and returns `None`; that only happens
/// for an origin outside the grid.
pub fn cast(map: &WorldMap, origin: Vec2, ray_dir: Vec2) -> Option<RayHit> {
    let mut cell = WorldMap::cell_of(origin);

    let delta = Vec2::new(
        if ray_dir.x == 0.0 { NEVER } else { (1.0 / ray_dir.x).abs() },
        if ray_dir.y == 0.0 { NEVER } else { (1.0 / ray_dir.y).abs() },
    );

    /* step direction and distance to the first grid line on each axis */
    let (step_x, mut side_x) = if ray_dir.x < 0.0 {
        (-1, (origin.x - cell.x as f32) * delta.x)
    } else {
        (1, (cell.x as f32 + 1.0 - origin.x) * delta.x)
    };
    let (step_y, mut side_y) = if ray_dir.y < 0.0 {
        (-1, (origin.y - cell.y as f32) * delta.y)
    } else {
        (1, (cell.y as f32 + 1.0 - origin.y) * delta.y)
    };

    let cap = (map.width() + map.height()) as u32;
    let mut steps = 0;
    let (side, material) = loop {
        if steps == cap {
            log::warn!("ray from {origin} along {ray_dir} did not hit a wall in {cap} steps");
            return None;
        }
        steps += 1;

        let side = if side_x < side_y {
            side_x += delta.x;
            cell.x += step_x;
            Side::X
        } else {
            side_y += delta.y;
            cell.y += step_y;
            Side::Y
        };

        match map.cell_at(cell.x, cell.y)? {
            Cell::Empty => continue,
            Cell::Wall(material) => break (side, material),
        }
    };

    /* back off the last increment: distance to the face we just crossed */
    let perp_dist = match side {
        Side::X => side_x - delta.x,
        Side::Y => side_y - delta.y,
    };

    let wall_x = match side {
        Side::X => origin.y + perp_dist * ray_dir.y,
        Side::Y => origin.x + perp_dist * ray_dir.x,
    };

    Some(RayHit {
        cell,
        side,
        material,
        perp_dist,
        wall_x: wall_x - wall_x.floor(),
        steps,
    })
}

/// Project a hit in screen column `x` onto a `screen_h`-tall frame.
pub fn project(
    hit: &RayHit,
    ray_dir: Vec2,
    x: usize,
    screen_h: usize,
    tex_size: usize,
) -> ColumnStrip {
    let h = screen_h as i32;
    let line_height = (screen_h as f32 / hit.perp_dist.max(MIN_PERP)) as i32;

    let draw_start = (h / 2 - line_height / 2).max(0);
    let draw_end = (h / 2 + line_height / 2).min(h - 1);

    /* texture column; flip faces that would otherwise read right-to-left */
    let mut tex_x = ((hit.wall_x * tex_size as f32) as usize).min(tex_size - 1);
    let mirrored = match hit.side {
        Side::X => ray_dir.x > 0.0,
        Side::Y => ray_dir.y < 0.0,
    };
    if mirrored {
        tex_x = tex_size - tex_x - 1;
    }

    let tex_step = tex_size as f32 / line_height.max(1) as f32;
    let tex_pos = (draw_start - h / 2 + line_height / 2) as f32 * tex_step;

    ColumnStrip {
        x,
        material: hit.material,
        line_height,
        draw_start,
        draw_end,
        tex_x,
        tex_step,
        tex_pos,
        shaded: hit.side == Side::Y,
    }
}

/// Cast one ray per screen column and project the hits into `out`.
///
/// Columns are independent, so rays are cast on the rayon pool; `out` is
/// filled in column order once every worker has finished.  Columns whose ray
/// escapes (unreachable for validated maps) are left out.
pub fn cast_columns(
    map: &WorldMap,
    camera: &Camera,
    screen_w: usize,
    screen_h: usize,
    tex_size: usize,
    out: &mut Vec<ColumnStrip>,
) {
    out.clear();
    out.par_extend((0..screen_w).into_par_iter().filter_map(|x| {
        let ray = ray_direction(camera, camera_x(x, screen_w));
        let hit = cast(map, camera.pos(), ray)?;
        Some(project(&hit, ray, x, screen_h, tex_size))
    }));
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
