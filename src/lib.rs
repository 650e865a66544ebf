//! Interactive 2D drawing core: rasterization, selection transforms and
//! rectangular clipping with live preview.
//!
//! Hosts own the window and event loop. They feed normalized
//! [`draw::input::InputEvent`]s and [`draw::input::Command`]s into a
//! [`draw::CanvasSession`] and paint the [`draw::render::DrawCommand`]s it
//! returns.

pub mod draw;
pub mod logging;
