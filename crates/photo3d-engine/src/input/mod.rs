//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Runtime code translates platform events into `InputEvent`s; the
//! `GestureRecognizer` folds those into discrete `GestureEvent`s.

pub(crate) mod platform;
mod recognizer;
mod types;

pub use recognizer::{GestureRecognizer, WHEEL_ZOOM_BASE};
pub use types::{
    GestureEvent,
    InputEvent,
    Key,
    KeyState,
    MouseButton,
    MouseButtonState,
    MouseWheelDelta,
    PanDelta,
    PointerButtonEvent,
    PointerMoveEvent,
};
