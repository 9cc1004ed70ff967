//! photo3d engine crate.
//!
//! Renders a photo as a sampled grid of vertices (triangles, points or a line
//! strip) that the user rotates and zooms with pointer gestures.

pub mod camera;
pub mod coords;
pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod render;
pub mod window;
