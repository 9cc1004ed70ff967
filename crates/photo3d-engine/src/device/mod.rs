//! GPU device and surface management.
//!
//! Creates the wgpu device/queue, keeps the window surface configured across
//! resizes, and hands out one drawable per frame.

mod context;
mod frame;
mod init;
mod surface;

pub use context::Gpu;
pub use frame::GpuFrame;
pub use init::GpuInit;
pub use surface::{classify_surface_error, SurfaceErrorAction};
