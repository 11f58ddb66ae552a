use std::fmt;

use glam::{IVec2, Vec2};

use crate::{
    engine::{
        clock::FpsCounter,
        collision::{clamp_to_interior, slide_move},
        config::EngineConfig,
        input::{Buttons, FrameSink, InputSource},
        minimap::Minimap,
        raycast,
    },
    renderer::{ColumnStrip, Renderer},
    world::{Camera, MapError, TextureBank, TextureError, WorldMap},
};

/// Frame-loop state machine.  Starts in `NotStarted`; nothing is simulated
/// until [`Engine::start`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    NotStarted,
    Running,
    Paused,
}

/// Things that stop an engine from being built.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum EngineError {
    #[error(transparent)]
    Map(#[from] MapError),

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error("resolution {width}x{height} is not drawable")]
    BadResolution { width: usize, height: usize },

    #[error("texture bank holds {bank} px textures, config asks for {config} px")]
    TextureSize { bank: usize, config: usize },

    #[error("spawn point {0} is not on an empty cell")]
    SpawnBlocked(Vec2),
}

/// Read-only snapshot for a HUD overlay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Telemetry {
    pub position: Vec2,
    pub cell: IVec2,
    pub direction: Vec2,
    pub fps: f32,
    pub wall_ahead: bool,
    pub frames: u64,
    pub state: LoopState,
}

impl fmt::Display for Telemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pos ({:.2}, {:.2})  {:.1} fps",
            self.position.x, self.position.y, self.fps
        )?;
        if self.wall_ahead {
            f.write_str("  WALL AHEAD")?;
        }
        if self.state != LoopState::Running {
            write!(f, "  [{:?}]", self.state)?;
        }
        Ok(())
    }
}

/// Owns the camera and drives update → render once per frame.
pub struct Engine<R: Renderer> {
    renderer: R,
    map: WorldMap,
    textures: TextureBank,
    camera: Camera,
    config: EngineConfig,
    minimap: Option<Minimap>,
    state: LoopState,
    strips: Vec<ColumnStrip>,
    fps: FpsCounter,
    frames: u64,
}

impl<R: Renderer> Engine<R> {
    pub fn new(
        renderer: R,
        map: WorldMap,
        textures: TextureBank,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        let (width, height) = (config.screen_w, config.screen_h);
        if width == 0 || height == 0 {
            return Err(EngineError::BadResolution { width, height });
        }
        if textures.size() != config.texture_size {
            return Err(EngineError::TextureSize {
                bank: textures.size(),
                config: config.texture_size,
            });
        }
        if map.is_solid_at(config.spawn_pos) {
            return Err(EngineError::SpawnBlocked(config.spawn_pos));
        }

        log::info!(
            "engine ready: {}x{} map, {} textures, {width}x{height} screen",
            map.width(),
            map.height(),
            textures.len()
        );

        Ok(Self {
            renderer,
            camera: Camera::new(config.spawn_pos, config.spawn_dir, config.plane_len),
            minimap: config.minimap_cell_px.map(Minimap::new),
            strips: Vec::with_capacity(width),
            map,
            textures,
            config,
            state: LoopState::NotStarted,
            fps: FpsCounter::default(),
            frames: 0,
        })
    }

    /// Built-in level with procedural textures (`seed` makes them reproducible).
    pub fn builtin(
        renderer: R,
        config: EngineConfig,
        seed: Option<u64>,
    ) -> Result<Self, EngineError> {
        let map = WorldMap::builtin()?;
        let textures = TextureBank::procedural(&map.materials(), config.texture_size, seed)?;
        Self::new(renderer, map, textures, config)
    }

    /*──────────────────────── accessors ───────────────────────────────*/

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    pub fn map(&self) -> &WorldMap {
        &self.map
    }

    #[inline]
    pub fn textures(&self) -> &TextureBank {
        &self.textures
    }

    #[inline]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    pub fn minimap(&self) -> Option<&Minimap> {
        self.minimap.as_ref()
    }

    #[inline]
    pub fn state(&self) -> LoopState {
        self.state
    }

    /*──────────────────────── loop state ──────────────────────────────*/

    /// Begin the update → render cycle.  Starting twice is harmless.
    pub fn start(&mut self) {
        if self.state == LoopState::NotStarted {
            log::info!("engine started");
            self.state = LoopState::Running;
        }
    }

    pub fn pause(&mut self) {
        if self.state == LoopState::Running {
            log::info!("engine paused");
            self.state = LoopState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == LoopState::Paused {
            log::info!("engine resumed");
            self.state = LoopState::Running;
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.state {
            LoopState::Running => self.pause(),
            LoopState::Paused => self.resume(),
            LoopState::NotStarted => {}
        }
    }

    /*──────────────────────── simulation ──────────────────────────────*/

    /// Apply one frame of input, `dt` seconds long.
    pub fn update<I: InputSource + ?Sized>(&mut self, dt: f32, input: &I) {
        let held = input.buttons();
        let tuning = self.config.tuning;
        let axis = |pos: Buttons, neg: Buttons| {
            held.contains(pos) as i32 as f32 - held.contains(neg) as i32 as f32
        };

        /* 1. turn: dir and plane share one rotation */
        let turn = axis(Buttons::TURN_RIGHT, Buttons::TURN_LEFT);
        if turn != 0.0 {
            self.camera.rotate(turn * tuning.rot_speed * dt);
        }

        /* 2. walk, each axis checked on its own */
        let walk = axis(Buttons::FORWARD, Buttons::BACK);
        if walk != 0.0 {
            let mut speed = tuning.move_speed * dt;
            if held.contains(Buttons::SPRINT) {
                speed *= tuning.sprint_multiplier;
            }
            let delta = self.camera.dir() * walk * speed;
            let moved = slide_move(&self.map, self.camera.pos(), delta);
            self.camera.set_pos(clamp_to_interior(&self.map, moved.pos));
        }
    }

    /// Is the cell one step along the view direction solid?
    pub fn wall_ahead(&self) -> bool {
        self.map.is_solid_at(self.camera.pos() + self.camera.dir())
    }

    /*──────────────────────── rendering ───────────────────────────────*/

    /// Draw the current view and hand it to `sink`.
    pub fn render<S: FrameSink + ?Sized>(&mut self, sink: &mut S) -> Result<(), S::Error> {
        let (w, h) = (self.config.screen_w, self.config.screen_h);

        raycast::cast_columns(
            &self.map,
            &self.camera,
            w,
            h,
            self.textures.size(),
            &mut self.strips,
        );

        self.renderer.begin_frame(w, h, &self.config.shading);
        for strip in &self.strips {
            self.renderer.draw_column(strip, &self.textures);
        }
        if let Some(minimap) = &self.minimap {
            minimap.draw(&mut self.renderer, &self.map, &self.camera, &self.textures);
        }
        self.renderer.end_frame(|fb, w, h| sink.present(fb, w, h))
    }

    /// One frame: update then render.  Returns `Ok(false)` without touching
    /// anything unless the loop is running.
    pub fn tick<I, S>(&mut self, dt: f32, input: &I, sink: &mut S) -> Result<bool, S::Error>
    where
        I: InputSource + ?Sized,
        S: FrameSink + ?Sized,
    {
        if self.state != LoopState::Running {
            return Ok(false);
        }
        self.update(dt, input);
        self.render(sink)?;
        self.fps.record(dt);
        self.frames += 1;
        Ok(true)
    }

    pub fn telemetry(&self) -> Telemetry {
        Telemetry {
            position: self.camera.pos(),
            cell: self.camera.cell(),
            direction: self.camera.dir(),
            fps: self.fps.fps(),
            wall_ahead: self.wall_ahead(),
            frames: self.frames,
            state: self.state,
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use super::*;
    use crate::{
        color::Color,
        engine::input::{InputState, Key},
        engine::config::Tuning,
        renderer::{Rgba, Shading, Software},
    };

    #[derive(Default)]
    struct VecSink {
        frames: Vec<(Vec<Rgba>, usize, usize)>,
    }

    impl FrameSink for VecSink {
        type Error = Infallible;

        fn present(&mut self, pixels: &[Rgba], w: usize, h: usize) -> Result<(), Infallible> {
            self.frames.push((pixels.to_vec(), w, h));
            Ok(())
        }
    }

    fn room() -> WorldMap {
        "11111\n10001\n10001\n10001\n11111".parse().unwrap()
    }

    fn config(pos: Vec2, dir: Vec2) -> EngineConfig {
        EngineConfig {
            screen_w: 64,
            screen_h: 48,
            texture_size: 16,
            spawn_pos: pos,
            spawn_dir: dir,
            tuning: Tuning {
                move_speed: 1.0,
                rot_speed: 1.0,
                sprint_multiplier: 2.0,
            },
            minimap_cell_px: None,
            ..EngineConfig::default()
        }
    }

    fn engine(map: WorldMap, pos: Vec2, dir: Vec2) -> Engine<Software> {
        let textures = TextureBank::procedural(&map.materials(), 16, Some(9)).unwrap();
        Engine::new(Software::default(), map, textures, config(pos, dir)).unwrap()
    }

    fn holding(keys: &[Key]) -> InputState {
        let mut input = InputState::default();
        for &k in keys {
            input.press(k);
        }
        input
    }

    #[test]
    fn builtin_engine_starts_on_floor() {
        let e = Engine::builtin(Software::default(), EngineConfig::default(), Some(1)).unwrap();
        assert_eq!(e.state(), LoopState::NotStarted);
        assert!(!e.map().is_solid_at(e.camera().pos()));
        assert!(e.minimap().is_some());
    }

    #[test]
    fn construction_errors() {
        let map = room();
        let bank = || TextureBank::procedural(&map.materials(), 16, Some(0)).unwrap();

        let err = Engine::new(
            Software::default(),
            map.clone(),
            bank(),
            config(Vec2::new(0.5, 0.5), Vec2::X),
        )
        .err();
        assert_eq!(err, Some(EngineError::SpawnBlocked(Vec2::new(0.5, 0.5))));

        let mut cfg = config(Vec2::new(2.5, 2.5), Vec2::X);
        cfg.screen_w = 0;
        let err = Engine::new(Software::default(), map.clone(), bank(), cfg).err();
        assert_eq!(
            err,
            Some(EngineError::BadResolution {
                width: 0,
                height: 48
            })
        );

        let mut cfg = config(Vec2::new(2.5, 2.5), Vec2::X);
        cfg.texture_size = 64;
        let err = Engine::new(Software::default(), map.clone(), bank(), cfg).err();
        assert_eq!(err, Some(EngineError::TextureSize { bank: 16, config: 64 }));
    }

    #[test]
    fn ticks_only_while_running() {
        let mut e = engine(room(), Vec2::new(2.5, 2.5), Vec2::X);
        let mut sink = VecSink::default();
        let input = holding(&[Key::Forward]);

        assert_eq!(e.tick(0.1, &input, &mut sink), Ok(false));
        assert!(sink.frames.is_empty());
        assert_eq!(e.camera().pos(), Vec2::new(2.5, 2.5));

        e.start();
        assert_eq!(e.tick(0.1, &input, &mut sink), Ok(true));
        assert_eq!(sink.frames.len(), 1);
        let (pixels, w, h) = &sink.frames[0];
        assert_eq!((*w, *h), (64, 48));
        assert_eq!(pixels.len(), 64 * 48);
        assert!(e.camera().pos().x > 2.5);

        e.toggle_pause();
        assert_eq!(e.state(), LoopState::Paused);
        let before = *e.camera();
        assert_eq!(e.tick(0.1, &input, &mut sink), Ok(false));
        assert_eq!(*e.camera(), before);

        e.toggle_pause();
        e.start(); // no-op while running
        assert_eq!(e.state(), LoopState::Running);
        assert_eq!(e.tick(0.1, &input, &mut sink), Ok(true));
        assert_eq!(e.telemetry().frames, 2);
    }

    #[test]
    fn diagonal_move_slides_along_wall() {
        // facing north-west from next to the west wall
        let mut e = engine(room(), Vec2::new(1.5, 2.5), Vec2::new(-1.0, -1.0));
        e.update(1.0, &holding(&[Key::Forward]));
        let pos = e.camera().pos();
        assert_eq!(pos.x, 1.5, "x must stay blocked");
        assert!(pos.y < 2.5 - 0.5, "y must still move: {pos}");
    }

    #[test]
    fn cannot_walk_through_walls() {
        let mut e = engine(room(), Vec2::new(2.5, 2.5), Vec2::NEG_X);
        let input = holding(&[Key::Forward, Key::Sprint]);
        for _ in 0..200 {
            e.update(0.05, &input);
        }
        let pos = e.camera().pos();
        assert!(pos.x >= 1.0 && !e.map().is_solid_at(pos), "{pos}");
    }

    #[test]
    fn stays_on_floor_walking_into_every_border() {
        let input = holding(&[Key::Forward, Key::Sprint]);
        for dir in [Vec2::X, Vec2::NEG_X, Vec2::Y, Vec2::NEG_Y] {
            let mut e = engine(room(), Vec2::new(2.5, 2.5), dir);
            for _ in 0..200 {
                e.update(0.05, &input);
                let pos = e.camera().pos();
                assert!(!e.map().is_solid_at(pos), "{dir}: {pos}");
            }
            assert!(e.wall_ahead(), "{dir}");
        }
    }

    #[test]
    fn can_stop_just_short_of_east_wall() {
        let mut e = engine(room(), Vec2::new(3.5, 2.5), Vec2::X);
        e.update(0.4995, &holding(&[Key::Forward]));
        let pos = e.camera().pos();
        assert!((pos.x - 3.9995).abs() < 1e-4, "{pos}");
        assert_eq!(pos.y, 2.5);
    }

    #[test]
    fn sprint_doubles_distance_and_back_reverses() {
        let mut a = engine(room(), Vec2::new(2.0, 2.5), Vec2::X);
        let mut b = engine(room(), Vec2::new(2.0, 2.5), Vec2::X);
        a.update(0.25, &holding(&[Key::Forward]));
        b.update(0.25, &holding(&[Key::Forward, Key::Sprint]));
        assert!((a.camera().pos().x - 2.25).abs() < 1e-6);
        assert!((b.camera().pos().x - 2.5).abs() < 1e-6);

        b.update(0.25, &holding(&[Key::Back]));
        assert!((b.camera().pos().x - 2.25).abs() < 1e-6);
    }

    #[test]
    fn turning_is_time_scaled_and_keeps_basis() {
        let mut e = engine(room(), Vec2::new(2.5, 2.5), Vec2::X);
        e.update(std::f32::consts::FRAC_PI_2, &holding(&[Key::TurnRight]));
        assert!((e.camera().dir() - Vec2::Y).length() < 1e-5);

        let left = holding(&[Key::TurnLeft]);
        for _ in 0..1000 {
            e.update(0.016, &left);
        }
        let cam = e.camera();
        assert!(cam.dir().dot(cam.plane()).abs() < 1e-4);
        assert!((cam.dir().length() - 1.0).abs() < 1e-4);
        // both turn keys cancel
        let before = *e.camera();
        e.update(0.5, &holding(&[Key::TurnLeft, Key::TurnRight]));
        assert_eq!(*e.camera(), before);
    }

    #[test]
    fn wall_ahead_is_read_only() {
        let e = engine(room(), Vec2::new(1.5, 2.5), Vec2::NEG_X);
        let before = *e.camera();
        assert!(e.wall_ahead());
        assert!(e.telemetry().wall_ahead);
        assert_eq!(*e.camera(), before);

        let e = engine(room(), Vec2::new(1.5, 2.5), Vec2::X);
        assert!(!e.wall_ahead());
    }

    #[test]
    fn frame_has_wall_in_the_middle_and_flat_sky_floor() {
        let mut e = engine(room(), Vec2::new(3.5, 2.5), Vec2::NEG_X);
        e.render(&mut VecSink::default()).unwrap();
        let frame = e.renderer().frame();
        let shading = Shading::default();

        let mid = frame.get(32, 24);
        assert_ne!(mid, shading.ceiling);
        assert_ne!(mid, shading.floor);
        // wall is 2.5 cells away: about 19 px tall, so the top rows are sky
        assert_eq!(frame.get(32, 0), shading.ceiling);
        assert_eq!(frame.get(32, 47), shading.floor);
    }

    #[test]
    fn minimap_overlay_is_drawn() {
        let map = room();
        let textures = TextureBank::procedural(&map.materials(), 16, Some(2)).unwrap();
        let mut cfg = config(Vec2::new(2.5, 2.5), Vec2::X);
        cfg.minimap_cell_px = Some(3);
        let mut e = Engine::new(Software::default(), map, textures, cfg).unwrap();
        e.render(&mut VecSink::default()).unwrap();

        let mm = *e.minimap().unwrap();
        let m = mm.marker_pixel(e.camera().pos());
        assert_eq!(mm.cell_at_pixel(m, e.map()), Some(e.camera().cell()));
        assert_ne!(e.renderer().frame().get(m.x as usize, m.y as usize), Color::BLACK);
    }

    #[test]
    fn telemetry_reports_fps_and_cell() {
        let mut e = engine(room(), Vec2::new(2.5, 3.5), Vec2::X);
        e.start();
        let mut sink = VecSink::default();
        for _ in 0..40 {
            e.tick(1.0 / 40.0, &InputState::default(), &mut sink).unwrap();
        }
        let t = e.telemetry();
        assert_eq!(t.cell, IVec2::new(2, 3));
        assert!((t.fps - 40.0).abs() < 1.0, "{}", t.fps);
        assert!(t.to_string().starts_with("pos (2.50, 3.50)"));
    }
}
