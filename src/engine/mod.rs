pub mod clock;
pub mod collision;
pub mod config;
mod engine;
pub mod input;
pub mod minimap;
pub mod raycast;

pub use clock::{FpsCounter, FrameClock, MAX_FRAME_DT};
pub use collision::{MoveResult, slide_move};
pub use config::{EngineConfig, Tuning};
pub use engine::{Engine, EngineError, LoopState, Telemetry};
pub use input::{Buttons, FrameSink, InputSource, InputState, Key};
pub use minimap::{MAX_CELL_PX, Minimap};
pub use raycast::{RayHit, cast, cast_columns, project};
