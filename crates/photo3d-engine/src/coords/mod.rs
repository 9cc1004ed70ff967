//! Coordinate types shared by the runtime and renderer.

mod viewport;

pub use viewport::Viewport;
