//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the single window, and wires them to the
//! photo renderer.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
