use crate::input::InputEvent;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum AppControl {
    /// Nothing visible changed.
    #[default]
    Continue,
    /// State changed; schedule a redraw.
    Redraw,
    Exit,
}

impl AppControl {
    /// Combines two directives, keeping the strongest.
    pub fn merge(self, other: AppControl) -> AppControl {
        use AppControl::*;
        match (self, other) {
            (Exit, _) | (_, Exit) => Exit,
            (Redraw, _) | (_, Redraw) => Redraw,
            _ => Continue,
        }
    }
}

/// Application contract implemented by higher layers.
///
/// The runtime is event driven: frames are only drawn after a callback asks
/// for one with [`AppControl::Redraw`], or after a resize.
pub trait App {
    /// Called once the window and renderer exist, before the first frame.
    fn on_start(&mut self, ctx: &mut FrameCtx<'_, '_>) {
        let _ = ctx;
    }

    /// Called for every translated input event.
    fn on_input(&mut self, event: &InputEvent, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let _ = (event, ctx);
        AppControl::Continue
    }

    /// Called when the window needs to be drawn.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
