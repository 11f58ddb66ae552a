//! Top-down overlay in the frame's top-left corner.
//!
//! Screen pixel ↔ grid cell is a plain scale + offset, so the player marker
//! always lands inside the cell the camera stands in.

use glam::{IVec2, Vec2};

use crate::{
    color::Color,
    renderer::Renderer,
    world::{Camera, Cell, TextureBank, WorldMap},
};

const FLOOR: Color = Color::rgb(24, 24, 28);
const MARKER: Color = Color::rgb(250, 220, 40);
const HEADING: Color = Color::rgb(255, 90, 60);
const MARGIN: i32 = 4;

/// Largest accepted cell size in pixels.
pub const MAX_CELL_PX: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Minimap {
    /// Side of one grid cell in screen pixels.
    pub cell_px: i32,
    /// Screen position of the map's top-left corner.
    pub origin: IVec2,
}

impl Minimap {
    pub fn new(cell_px: usize) -> Self {
        Self {
            cell_px: cell_px.clamp(1, MAX_CELL_PX) as i32,
            origin: IVec2::splat(MARGIN),
        }
    }

    /// Screen pixel of a world-space point.
    #[inline]
    pub fn to_screen(&self, p: Vec2) -> IVec2 {
        self.origin + (p * self.cell_px as f32).floor().as_ivec2()
    }

    /// Where the player marker is drawn.
    #[inline]
    pub fn marker_pixel(&self, pos: Vec2) -> IVec2 {
        self.to_screen(pos)
    }

    /// Grid cell under a screen pixel, `None` outside the map area.
    pub fn cell_at_pixel(&self, px: IVec2, map: &WorldMap) -> Option<IVec2> {
        let local = px - self.origin;
        if local.x < 0 || local.y < 0 {
            return None;
        }
        let cell = local / self.cell_px;
        map.cell_at(cell.x, cell.y).map(|_| cell)
    }

    /// Screen size of the whole overlay.
    pub fn extent(&self, map: &WorldMap) -> IVec2 {
        IVec2::new(map.width() as i32, map.height() as i32) * self.cell_px
    }

    pub fn draw<R: Renderer>(
        &self,
        r: &mut R,
        map: &WorldMap,
        camera: &Camera,
        bank: &TextureBank,
    ) {
        let s = self.cell_px;
        for row in 0..map.height() as i32 {
            for col in 0..map.width() as i32 {
                let color = match map.cell_at(col, row) {
                    Some(Cell::Wall(m)) => bank.tint(m),
                    _ => FLOOR,
                };
                let at = self.origin + IVec2::new(col, row) * s;
                r.fill_rect(at.x, at.y, s, s, color);
            }
        }

        /* heading tick: a dotted line one cell long */
        let pos = camera.pos();
        for i in 1..=s.max(2) {
            let p = self.to_screen(pos + camera.dir() * (i as f32 / s as f32));
            r.fill_rect(p.x, p.y, 1, 1, HEADING);
        }

        /* marker: centred when there is room, otherwise the exact pixel */
        let m = self.marker_pixel(pos);
        if s >= 3 {
            r.fill_rect(m.x - 1, m.y - 1, 3, 3, MARKER);
        } else {
            r.fill_rect(m.x, m.y, 1, 1, MARKER);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{Renderer, Shading, Software};
    use crate::world::DEFAULT_PLANE_LEN;

    #[test]
    fn marker_maps_back_to_camera_cell() {
        let map = WorldMap::builtin().unwrap();
        for cell_px in [1, 3, 5, 8] {
            let mm = Minimap::new(cell_px);
            for i in 0..500 {
                let t = i as f32 * 0.618;
                let pos = Vec2::new(1.0 + (t * 7.3) % 22.0, 1.0 + (t * 3.1) % 22.0);
                let cam = Camera::new(pos, Vec2::X, DEFAULT_PLANE_LEN);
                let px = mm.marker_pixel(cam.pos());
                assert_eq!(mm.cell_at_pixel(px, &map), Some(cam.cell()), "{pos} @ {cell_px}px");
            }
        }
    }

    #[test]
    fn cell_size_is_bounded() {
        assert_eq!(Minimap::new(0).cell_px, 1);
        assert_eq!(Minimap::new(usize::MAX).cell_px, MAX_CELL_PX as i32);
    }

    #[test]
    fn pixels_outside_the_map_have_no_cell() {
        let map = WorldMap::builtin().unwrap();
        let mm = Minimap::new(4);
        assert_eq!(mm.cell_at_pixel(IVec2::new(0, 0), &map), None);
        let end = mm.origin + mm.extent(&map);
        assert_eq!(mm.cell_at_pixel(end, &map), None);
        assert_eq!(mm.cell_at_pixel(end - 1, &map), Some(IVec2::new(23, 23)));
    }

    #[test]
    fn draws_walls_floor_and_marker() {
        let map: WorldMap = "1111\n1001\n1001\n1111".parse().unwrap();
        let bank = TextureBank::procedural(&map.materials(), 8, Some(1)).unwrap();
        let cam = Camera::new(Vec2::new(1.5, 2.5), Vec2::X, DEFAULT_PLANE_LEN);
        let mm = Minimap::new(4);

        let mut sw = Software::default();
        sw.begin_frame(40, 40, &Shading::default());
        mm.draw(&mut sw, &map, &cam, &bank);

        let frame = sw.frame();
        // wall cell (0,0) in its tint, floor cell (2,1) dark
        assert_eq!(frame.get(5, 5), bank.tint(crate::world::Material::Stone));
        assert_eq!(frame.get(4 + 2 * 4 + 1, 4 + 4 + 1), FLOOR);
        let m = mm.marker_pixel(cam.pos());
        assert_eq!(frame.get(m.x as usize, m.y as usize), MARKER);
    }
}
