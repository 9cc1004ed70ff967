//! Core engine-facing contracts.
//!
//! Defines the interface between the runtime (platform loop) and the
//! application, without leaking winit event types into user code.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
