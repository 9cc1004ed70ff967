use std::path::PathBuf;

/// Keyboard key identifier.
///
/// Only the keys the viewer binds are named; everything else maps to
/// `Key::Unknown` with the platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,

    ArrowUp,
    ArrowDown,

    Digit1,
    Digit2,
    Digit3,

    /// Platform-dependent key not represented here.
    Unknown(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MouseButtonState {
    Pressed,
    Released,
}

/// Mouse wheel delta.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MouseWheelDelta {
    /// Line-based scrolling (typical mouse wheel).
    Line { x: f32, y: f32 },
    /// Pixel-based scrolling (typical touchpad), in logical pixels.
    Pixel { x: f32, y: f32 },
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerMoveEvent {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerButtonEvent {
    pub button: MouseButton,
    pub state: MouseButtonState,
}

/// Platform-agnostic input events emitted by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key {
        key: Key,
        state: KeyState,
        /// True when event is a key-repeat.
        repeat: bool,
    },

    PointerMoved(PointerMoveEvent),
    PointerButton(PointerButtonEvent),

    MouseWheel(MouseWheelDelta),

    /// Touchpad pinch step; positive values zoom in.
    Pinch(f32),

    /// A file was dropped onto the window.
    FileDropped(PathBuf),

    /// Pointer left the window surface.
    PointerLeft,

    /// Window focus change.
    Focused(bool),
}

/// Incremental pan translation in logical pixels since the previous update.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct PanDelta {
    pub dx: f32,
    pub dy: f32,
}

impl PanDelta {
    #[inline]
    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}

/// A discrete gesture update consumed by the camera controller.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum GestureEvent {
    Pan(PanDelta),
    /// Dimensionless scale factor relative to the previous update.
    Pinch(f32),
}

