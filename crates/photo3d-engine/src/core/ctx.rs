use winit::window::Window;

use crate::camera::CameraState;
use crate::render::{FrameOutcome, PhotoRenderer, RenderSettings};

use super::app::AppControl;

/// Per-window handles and immutable window metadata.
pub struct WindowCtx<'a> {
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    pub fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }
}

/// Context passed to every `core::App` callback.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `PhotoRenderer<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub renderer: &'a mut PhotoRenderer<'w>,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Draws one frame and maps the outcome to a runtime directive.
    ///
    /// Skipped frames are not errors; only a fatal surface error exits.
    pub fn render(&mut self, settings: RenderSettings, camera: &CameraState) -> AppControl {
        match self.renderer.render_frame(settings, camera) {
            FrameOutcome::Presented => AppControl::Continue,
            FrameOutcome::Skipped(reason) => {
                log::trace!("frame skipped: {reason:?}");
                AppControl::Continue
            }
            FrameOutcome::Fatal => {
                log::error!("unrecoverable surface error, shutting down");
                AppControl::Exit
            }
        }
    }
}
