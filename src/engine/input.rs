//! Host boundary: where key state comes from and where frames go.
//!
//! The engine only ever sees these two traits, so it has no idea whether it
//! runs under a window toolkit, a test harness or a recorded demo.

use bitflags::bitflags;

use crate::renderer::Rgba;

/// Logical controls the engine reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Forward,
    Back,
    TurnLeft,
    TurnRight,
    Sprint,
}

impl Key {
    pub const ALL: [Key; 5] = [
        Key::Forward,
        Key::Back,
        Key::TurnLeft,
        Key::TurnRight,
        Key::Sprint,
    ];

    #[inline]
    pub fn button(self) -> Buttons {
        match self {
            Key::Forward => Buttons::FORWARD,
            Key::Back => Buttons::BACK,
            Key::TurnLeft => Buttons::TURN_LEFT,
            Key::TurnRight => Buttons::TURN_RIGHT,
            Key::Sprint => Buttons::SPRINT,
        }
    }
}

bitflags! {
    /// Held controls, one bit per [`Key`].
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Buttons: u8 {
        const FORWARD    = 0b0000_0001;
        const BACK       = 0b0000_0010;
        const TURN_LEFT  = 0b0000_0100;
        const TURN_RIGHT = 0b0000_1000;
        const SPRINT     = 0b0001_0000;
    }
}

/// Anything that can answer "is this key held right now?".
pub trait InputSource {
    fn is_key_down(&self, key: Key) -> bool;

    /// Snapshot every control at once; read once per frame.
    fn buttons(&self) -> Buttons {
        Key::ALL
            .into_iter()
            .filter(|&k| self.is_key_down(k))
            .fold(Buttons::empty(), |acc, k| acc | k.button())
    }
}

/// Presentation surface for finished frames (`0x00RRGGBB`, row-major).
pub trait FrameSink {
    type Error;

    fn present(&mut self, pixels: &[Rgba], width: usize, height: usize) -> Result<(), Self::Error>;
}

/// Press/release record fed by event handlers and read by the engine.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputState {
    held: Buttons,
}

impl InputState {
    pub fn press(&mut self, key: Key) {
        self.held.insert(key.button());
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(key.button());
    }

    pub fn set(&mut self, key: Key, down: bool) {
        self.held.set(key.button(), down);
    }

    pub fn clear(&mut self) {
        self.held = Buttons::empty();
    }
}

impl InputSource for InputState {
    #[inline]
    fn is_key_down(&self, key: Key) -> bool {
        self.held.contains(key.button())
    }

    #[inline]
    fn buttons(&self) -> Buttons {
        self.held
    }
}

impl InputSource for Buttons {
    #[inline]
    fn is_key_down(&self, key: Key) -> bool {
        self.contains(key.button())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_release_round_trip() {
        let mut input = InputState::default();
        input.press(Key::Forward);
        input.press(Key::Sprint);
        assert!(input.is_key_down(Key::Forward));
        assert!(input.is_key_down(Key::Sprint));
        assert!(!input.is_key_down(Key::Back));

        input.release(Key::Forward);
        assert_eq!(input.buttons(), Buttons::SPRINT);

        input.set(Key::TurnLeft, true);
        input.clear();
        assert_eq!(input.buttons(), Buttons::empty());
    }

    struct OnlyTurnRight;
    impl InputSource for OnlyTurnRight {
        fn is_key_down(&self, key: Key) -> bool {
            key == Key::TurnRight
        }
    }

    #[test]
    fn default_snapshot_polls_every_key() {
        assert_eq!(OnlyTurnRight.buttons(), Buttons::TURN_RIGHT);
    }
}
