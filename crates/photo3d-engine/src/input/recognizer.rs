use super::types::{
    GestureEvent, InputEvent, MouseButton, MouseButtonState, MouseWheelDelta, PanDelta,
    PointerButtonEvent, PointerMoveEvent,
};

/// Scale factor applied per wheel line.
pub const WHEEL_ZOOM_BASE: f32 = 1.1;

/// Logical pixels per wheel line for pixel-based scrolling.
const PIXELS_PER_LINE: f32 = 120.0;

/// An in-progress drag.
#[derive(Debug, Copy, Clone, Default)]
struct PanGesture {
    /// Pointer position when the gesture started; unknown until the first move.
    origin: Option<(f32, f32)>,
    /// Cumulative translation already reported downstream.
    reported: (f32, f32),
}

/// Folds raw pointer/wheel/pinch input into discrete gesture updates.
///
/// Pan output is always incremental: the recognizer tracks the cumulative
/// translation since the gesture started and reports only the part not yet
/// handed out. Pinch output consumes the scale accumulator, which is reset to
/// `1.0` after every emitted update.
#[derive(Debug)]
pub struct GestureRecognizer {
    pointer_pos: Option<(f32, f32)>,
    pan: Option<PanGesture>,
    pinch_scale: f32,
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self {
            pointer_pos: None,
            pan: None,
            pinch_scale: 1.0,
        }
    }
}

impl GestureRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true while a drag is in progress.
    pub fn is_panning(&self) -> bool {
        self.pan.is_some()
    }

    /// Current (unconsumed) pinch scale. `1.0` between updates.
    pub fn pinch_scale(&self) -> f32 {
        self.pinch_scale
    }

    /// Feeds one input event; returns a gesture update when one is recognized.
    pub fn handle(&mut self, event: &InputEvent) -> Option<GestureEvent> {
        match event {
            InputEvent::PointerButton(PointerButtonEvent {
                button: MouseButton::Left,
                state,
            }) => {
                match state {
                    MouseButtonState::Pressed => {
                        self.pan = Some(PanGesture {
                            origin: self.pointer_pos,
                            reported: (0.0, 0.0),
                        });
                    }
                    MouseButtonState::Released => self.pan = None,
                }
                None
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer_pos = Some((*x, *y));
                self.track_pan(*x, *y)
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
                self.pan = None;
                None
            }

            InputEvent::Focused(false) => {
                // Avoid a stuck drag when focus changes mid-press.
                self.pan = None;
                None
            }

            InputEvent::Pinch(delta) => self.accumulate_scale(1.0 + *delta),

            InputEvent::MouseWheel(delta) => {
                let lines = match delta {
                    MouseWheelDelta::Line { y, .. } => *y,
                    MouseWheelDelta::Pixel { y, .. } => *y / PIXELS_PER_LINE,
                };
                if lines == 0.0 {
                    return None;
                }
                self.accumulate_scale(WHEEL_ZOOM_BASE.powf(lines))
            }

            _ => None,
        }
    }

    fn track_pan(&mut self, x: f32, y: f32) -> Option<GestureEvent> {
        let pan = self.pan.as_mut()?;

        let Some(origin) = pan.origin else {
            pan.origin = Some((x, y));
            return None;
        };

        let translation = (x - origin.0, y - origin.1);
        let delta = PanDelta::new(translation.0 - pan.reported.0, translation.1 - pan.reported.1);
        pan.reported = translation;

        (!delta.is_zero()).then_some(GestureEvent::Pan(delta))
    }

    fn accumulate_scale(&mut self, factor: f32) -> Option<GestureEvent> {
        self.pinch_scale *= factor;

        let scale = self.pinch_scale;
        self.pinch_scale = 1.0;

        if scale.is_finite() && scale > 0.0 {
            Some(GestureEvent::Pinch(scale))
        } else {
            log::debug!("dropping degenerate pinch scale {scale}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved(PointerMoveEvent { x, y })
    }

    fn left(state: MouseButtonState) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state,
        })
    }

    #[test]
    fn moves_without_button_do_not_pan() {
        let mut r = GestureRecognizer::new();
        assert_eq!(r.handle(&moved(10.0, 10.0)), None);
        assert_eq!(r.handle(&moved(20.0, 30.0)), None);
    }

    #[test]
    fn drag_reports_incremental_deltas() {
        let mut r = GestureRecognizer::new();
        r.handle(&moved(10.0, 10.0));
        r.handle(&left(MouseButtonState::Pressed));

        assert_eq!(
            r.handle(&moved(15.0, 12.0)),
            Some(GestureEvent::Pan(PanDelta::new(5.0, 2.0)))
        );
        assert_eq!(
            r.handle(&moved(25.0, 12.0)),
            Some(GestureEvent::Pan(PanDelta::new(10.0, 0.0)))
        );

        r.handle(&left(MouseButtonState::Released));
        assert_eq!(r.handle(&moved(100.0, 100.0)), None);
    }

    #[test]
    fn sum_of_deltas_equals_total_translation() {
        let mut r = GestureRecognizer::new();
        r.handle(&moved(0.0, 0.0));
        r.handle(&left(MouseButtonState::Pressed));

        let (mut sx, mut sy) = (0.0, 0.0);
        for i in 1..=20 {
            if let Some(GestureEvent::Pan(d)) = r.handle(&moved(i as f32 * 3.0, i as f32 * -2.0)) {
                sx += d.dx;
                sy += d.dy;
            }
        }
        assert_relative_eq!(sx, 60.0);
        assert_relative_eq!(sy, -40.0);
    }

    #[test]
    fn press_before_first_move_anchors_on_first_move() {
        let mut r = GestureRecognizer::new();
        r.handle(&left(MouseButtonState::Pressed));
        assert_eq!(r.handle(&moved(50.0, 50.0)), None);
        assert_eq!(
            r.handle(&moved(51.0, 50.0)),
            Some(GestureEvent::Pan(PanDelta::new(1.0, 0.0)))
        );
    }

    #[test]
    fn focus_loss_and_leave_end_the_pan() {
        let mut r = GestureRecognizer::new();
        r.handle(&moved(0.0, 0.0));
        r.handle(&left(MouseButtonState::Pressed));
        r.handle(&InputEvent::Focused(false));
        assert!(!r.is_panning());

        r.handle(&left(MouseButtonState::Pressed));
        r.handle(&InputEvent::PointerLeft);
        assert!(!r.is_panning());
    }

    #[test]
    fn right_button_does_not_pan() {
        let mut r = GestureRecognizer::new();
        r.handle(&moved(0.0, 0.0));
        r.handle(&InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Right,
            state: MouseButtonState::Pressed,
        }));
        assert_eq!(r.handle(&moved(5.0, 5.0)), None);
    }

    #[test]
    fn pinch_resets_accumulator_after_each_update() {
        let mut r = GestureRecognizer::new();
        assert_eq!(r.handle(&InputEvent::Pinch(0.25)), Some(GestureEvent::Pinch(1.25)));
        assert_eq!(r.pinch_scale(), 1.0);
        assert_eq!(r.handle(&InputEvent::Pinch(0.25)), Some(GestureEvent::Pinch(1.25)));
    }

    #[test]
    fn wheel_maps_lines_to_exponential_scale() {
        let mut r = GestureRecognizer::new();
        let Some(GestureEvent::Pinch(s)) =
            r.handle(&InputEvent::MouseWheel(MouseWheelDelta::Line { x: 0.0, y: 2.0 }))
        else {
            panic!("expected pinch");
        };
        assert_relative_eq!(s, 1.21, epsilon = 1e-6);

        let Some(GestureEvent::Pinch(s)) =
            r.handle(&InputEvent::MouseWheel(MouseWheelDelta::Pixel { x: 0.0, y: -120.0 }))
        else {
            panic!("expected pinch");
        };
        assert_relative_eq!(s, 1.0 / 1.1, epsilon = 1e-6);
    }

    #[test]
    fn degenerate_pinch_is_dropped_and_accumulator_recovers() {
        let mut r = GestureRecognizer::new();
        assert_eq!(r.handle(&InputEvent::Pinch(-1.0)), None);
        assert_eq!(r.pinch_scale(), 1.0);
        assert_eq!(
            r.handle(&InputEvent::MouseWheel(MouseWheelDelta::Line { x: 1.0, y: 0.0 })),
            None
        );
    }
}
