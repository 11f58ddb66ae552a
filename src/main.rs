//! Windowed raycaster.
//!
//! Controls  W/↑ = forward  S/↓ = back  A/← D/→ = turn  Shift = sprint
//!           Enter/Space = start  P = pause  Esc = quit
//!
//! ```bash
//! cargo run --release -- --scale 2 --seed 7
//! ```

use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use minifb::{Key as WinKey, KeyRepeat, Scale, Window, WindowOptions};

use retro_raycaster::{
    engine::{
        Engine, EngineConfig, FrameClock, FrameSink, InputSource, Key, LoopState, MAX_CELL_PX,
        Tuning,
    },
    renderer::{Rgba, Software},
};

const TITLE: &str = "Retro Raycaster";
const HUD_EVERY: Duration = Duration::from_secs(1);

// ─── CLI ────────────────────────────────────────────────────────────────────
#[derive(Parser, Debug)]
#[command(version, about = "Wolfenstein-style raycaster with procedural textures")]
struct Args {
    /// Internal render width in pixels.
    #[arg(long, default_value_t = 640)]
    width: usize,

    /// Internal render height in pixels.
    #[arg(long, default_value_t = 480)]
    height: usize,

    /// Window upscaling.
    #[arg(long, value_enum, default_value_t = WindowScale::X1)]
    scale: WindowScale,

    /// Texture side; must be a power of two.
    #[arg(long, default_value_t = 64)]
    texture_size: usize,

    /// Seed for the noise textures; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Walking speed, cells per second.
    #[arg(long, default_value_t = 5.0)]
    move_speed: f32,

    /// Turning speed, radians per second.
    #[arg(long, default_value_t = 3.0)]
    rot_speed: f32,

    /// Speed multiplier while Shift is held.
    #[arg(long, default_value_t = 2.0)]
    sprint: f32,

    /// Camera-plane length; 0.66 ≈ 66° field of view.
    #[arg(long, default_value_t = 0.66)]
    fov_plane: f32,

    /// Minimap cell size in pixels.
    #[arg(
        long,
        default_value_t = 5,
        value_parser = clap::value_parser!(u16).range(1..=MAX_CELL_PX as i64)
    )]
    minimap_cell: u16,

    /// Hide the minimap.
    #[arg(long)]
    no_minimap: bool,

    /// Frame-rate cap.
    #[arg(long, default_value_t = 60)]
    fps: usize,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum WindowScale {
    #[value(name = "1")]
    X1,
    #[value(name = "2")]
    X2,
    #[value(name = "4")]
    X4,
}

impl From<WindowScale> for Scale {
    fn from(s: WindowScale) -> Self {
        match s {
            WindowScale::X1 => Scale::X1,
            WindowScale::X2 => Scale::X2,
            WindowScale::X4 => Scale::X4,
        }
    }
}

impl Args {
    fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            screen_w: self.width,
            screen_h: self.height,
            texture_size: self.texture_size,
            plane_len: self.fov_plane,
            tuning: Tuning {
                move_speed: self.move_speed,
                rot_speed: self.rot_speed,
                sprint_multiplier: self.sprint,
            },
            minimap_cell_px: (!self.no_minimap).then_some(usize::from(self.minimap_cell)),
            ..EngineConfig::default()
        }
    }
}

// ─── host bindings ──────────────────────────────────────────────────────────
fn bindings(key: Key) -> &'static [WinKey] {
    match key {
        Key::Forward => &[WinKey::W, WinKey::Up],
        Key::Back => &[WinKey::S, WinKey::Down],
        Key::TurnLeft => &[WinKey::A, WinKey::Left],
        Key::TurnRight => &[WinKey::D, WinKey::Right],
        Key::Sprint => &[WinKey::LeftShift, WinKey::RightShift],
    }
}

/// Local wrapper so the engine traits can be implemented for `minifb::Window`.
struct Host<'a>(&'a mut Window);

impl InputSource for Host<'_> {
    fn is_key_down(&self, key: Key) -> bool {
        bindings(key).iter().any(|&k| Window::is_key_down(self.0, k))
    }
}

impl FrameSink for Host<'_> {
    type Error = minifb::Error;

    fn present(&mut self, pixels: &[Rgba], width: usize, height: usize) -> Result<(), Self::Error> {
        self.0.update_with_buffer(pixels, width, height)
    }
}

// ─── entry point ────────────────────────────────────────────────────────────
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut engine = Engine::builtin(Software::default(), args.engine_config(), args.seed)
        .context("building engine")?;

    let mut win = Window::new(
        TITLE,
        args.width,
        args.height,
        WindowOptions {
            scale: args.scale.into(),
            ..WindowOptions::default()
        },
    )
    .context("opening window")?;
    win.set_target_fps(args.fps);

    // show the level behind the start prompt
    engine.render(&mut Host(&mut win))?;
    win.set_title(&format!("{TITLE} | press Enter to start"));
    log::info!("press Enter or Space to start, P to pause, Esc to quit");

    let mut clock = FrameClock::new();
    let mut last_hud = Instant::now();

    while win.is_open() && !win.is_key_down(WinKey::Escape) {
        let dt = clock.tick();

        if engine.state() == LoopState::NotStarted
            && (win.is_key_pressed(WinKey::Enter, KeyRepeat::No)
                || win.is_key_pressed(WinKey::Space, KeyRepeat::No))
        {
            engine.start();
        }
        if win.is_key_pressed(WinKey::P, KeyRepeat::No) {
            engine.toggle_pause();
        }

        /* read input once, then simulate + present */
        let held = InputSource::buttons(&Host(&mut win));
        if !engine.tick(dt, &held, &mut Host(&mut win))? {
            win.update(); // keep pumping events while idle
        }

        if last_hud.elapsed() >= HUD_EVERY && engine.state() != LoopState::NotStarted {
            let hud = engine.telemetry();
            log::info!("{hud}");
            win.set_title(&format!("{TITLE} | {hud}"));
            last_hud = Instant::now();
        }
    }
    Ok(())
}
