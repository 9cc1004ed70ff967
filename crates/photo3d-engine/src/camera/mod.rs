//! Camera state and its gesture-driven mutation.
//!
//! `CameraState` is read by transform composition and written only by
//! `GestureController`. Mode, step and image changes never touch it.

mod controller;
mod state;

pub use controller::{GestureController, PAN_SENSITIVITY};
pub use state::{CameraState, FOV_DEFAULT_DEG, FOV_MAX_DEG, FOV_MIN_DEG};
