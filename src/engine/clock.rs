use std::time::{Duration, Instant};

/// Longest step the simulation will take in one frame.
pub const MAX_FRAME_DT: Duration = Duration::from_millis(100);

/// Wall-clock frame timer.
///
/// Caps each delta so a window that was dragged or suspended does not move
/// the camera through half the map on the next frame.
pub struct FrameClock {
    last: Instant,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// Seconds since the previous call (or construction), capped.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).min(MAX_FRAME_DT);
        self.last = now;
        dt.as_secs_f32()
    }
}

/// Frames-per-second estimate refreshed every `window` of simulated time.
#[derive(Clone, Copy, Debug)]
pub struct FpsCounter {
    window: f32,
    acc_time: f32,
    acc_frames: u32,
    fps: f32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl FpsCounter {
    pub fn new(window: f32) -> Self {
        Self {
            window,
            acc_time: 0.0,
            acc_frames: 0,
            fps: 0.0,
        }
    }

    pub fn record(&mut self, dt: f32) {
        self.acc_time += dt;
        self.acc_frames += 1;
        if self.acc_time >= self.window {
            self.fps = self.acc_frames as f32 / self.acc_time;
            self.acc_time = 0.0;
            self.acc_frames = 0;
        }
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_caps_long_frames() {
        let mut clock = FrameClock::new();
        clock.last -= Duration::from_secs(5);
        let dt = clock.tick();
        assert!(dt <= MAX_FRAME_DT.as_secs_f32() + 1e-6);
        assert!(clock.tick() < 0.1);
    }

    #[test]
    fn fps_refreshes_per_window() {
        let mut fps = FpsCounter::new(0.5);
        for _ in 0..14 {
            fps.record(1.0 / 30.0);
        }
        assert_eq!(fps.fps(), 0.0);
        fps.record(0.05);
        let expected = 15.0 / (14.0 / 30.0 + 0.05);
        assert!((fps.fps() - expected).abs() < 0.01, "{}", fps.fps());
    }
}
