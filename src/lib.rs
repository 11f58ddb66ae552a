//! Wolfenstein-style raycaster.
//!
//! * [`world`]    – wall grid, camera, procedural textures
//! * [`engine`]   – DDA ray casting, movement/collision, frame loop, minimap
//! * [`renderer`] – column rasteriser behind the [`renderer::Renderer`] trait
//!
//! The crate never opens a window.  Hosts implement
//! [`engine::InputSource`] and [`engine::FrameSink`] and call
//! [`engine::Engine::tick`] once per displayed frame.

pub mod color;
pub mod engine;
pub mod renderer;
pub mod world;
