use crate::input::{GestureEvent, PanDelta};

use super::state::{clamp_fov, CameraState};

/// Radians of rotation per full image extent of pan travel.
pub const PAN_SENSITIVITY: f32 = 0.8;

/// Applies gesture deltas to a [`CameraState`].
///
/// Stateless: incremental deltas are produced upstream by the
/// `GestureRecognizer`, so every call here is a pure state transition.
#[derive(Debug, Copy, Clone, Default)]
pub struct GestureController;

impl GestureController {
    pub fn new() -> Self {
        Self
    }

    /// Dispatches one recognized gesture. `image_size` is `(width, height)` in pixels.
    pub fn apply(&self, camera: &mut CameraState, event: GestureEvent, image_size: (f32, f32)) {
        match event {
            GestureEvent::Pan(delta) => self.on_pan(camera, delta, image_size),
            GestureEvent::Pinch(scale) => self.on_pinch(camera, scale),
        }
    }

    /// Rotates the model by an incremental pan translation.
    ///
    /// Horizontal travel turns about Y, vertical travel about X, normalized by
    /// the image extent on that axis.
    pub fn on_pan(&self, camera: &mut CameraState, delta: PanDelta, image_size: (f32, f32)) {
        let (w, h) = (positive_or_one(image_size.0), positive_or_one(image_size.1));
        if !(delta.dx.is_finite() && delta.dy.is_finite()) {
            return;
        }

        camera.rotation_y += PAN_SENSITIVITY * delta.dx / w;
        camera.rotation_x += PAN_SENSITIVITY * delta.dy / h;
    }

    /// Zooms by dividing the field of view by `scale`, then clamping.
    ///
    /// Non-positive or non-finite scale factors are ignored.
    pub fn on_pinch(&self, camera: &mut CameraState, scale: f32) {
        if !(scale.is_finite() && scale > 0.0) {
            return;
        }
        camera.field_of_view_deg = clamp_fov(camera.field_of_view_deg / scale);
    }
}

fn positive_or_one(v: f32) -> f32 {
    if v.is_finite() && v > 0.0 { v } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{FOV_MAX_DEG, FOV_MIN_DEG};
    use approx::assert_relative_eq;

    const IMAGE: (f32, f32) = (400.0, 300.0);

    #[test]
    fn full_width_pan_turns_point_eight_radians_about_y() {
        let mut cam = CameraState::default();
        GestureController::new().on_pan(&mut cam, PanDelta::new(IMAGE.0, 0.0), IMAGE);
        assert_relative_eq!(cam.rotation_y(), 0.8);
        assert_eq!(cam.rotation_x(), 0.0);
    }

    #[test]
    fn vertical_pan_is_normalized_by_height() {
        let mut cam = CameraState::default();
        GestureController::new().on_pan(&mut cam, PanDelta::new(0.0, 150.0), IMAGE);
        assert_relative_eq!(cam.rotation_x(), 0.4);
        assert_eq!(cam.rotation_y(), 0.0);
    }

    #[test]
    fn pans_accumulate() {
        let mut cam = CameraState::default();
        let ctl = GestureController::new();
        for _ in 0..4 {
            ctl.on_pan(&mut cam, PanDelta::new(100.0, -75.0), IMAGE);
        }
        assert_relative_eq!(cam.rotation_y(), 0.8, epsilon = 1e-6);
        assert_relative_eq!(cam.rotation_x(), -0.8, epsilon = 1e-6);
    }

    #[test]
    fn pan_with_zero_sized_image_does_not_divide_by_zero() {
        let mut cam = CameraState::default();
        GestureController::new().on_pan(&mut cam, PanDelta::new(1.0, 1.0), (0.0, -5.0));
        assert!(cam.rotation_x().is_finite() && cam.rotation_y().is_finite());
    }

    #[test]
    fn repeated_zoom_in_settles_at_lower_clamp() {
        let mut cam = CameraState::default();
        let ctl = GestureController::new();
        for _ in 0..10 {
            ctl.on_pinch(&mut cam, 2.0);
            assert!(cam.field_of_view_deg() >= FOV_MIN_DEG);
        }
        assert_eq!(cam.field_of_view_deg(), FOV_MIN_DEG);
    }

    #[test]
    fn repeated_zoom_out_settles_at_upper_clamp() {
        let mut cam = CameraState::default();
        let ctl = GestureController::new();
        for _ in 0..10 {
            ctl.on_pinch(&mut cam, 0.1);
            assert!(cam.field_of_view_deg() <= FOV_MAX_DEG);
        }
        assert_eq!(cam.field_of_view_deg(), FOV_MAX_DEG);
    }

    #[test]
    fn pinch_divides_field_of_view() {
        let mut cam = CameraState::default();
        GestureController::new().on_pinch(&mut cam, 1.5);
        assert_relative_eq!(cam.field_of_view_deg(), 40.0);
    }

    #[test]
    fn invalid_pinch_scale_is_ignored() {
        let mut cam = CameraState::default();
        let ctl = GestureController::new();
        ctl.on_pinch(&mut cam, 0.0);
        ctl.on_pinch(&mut cam, -2.0);
        ctl.on_pinch(&mut cam, f32::NAN);
        assert_eq!(cam, CameraState::default());
    }

    #[test]
    fn apply_dispatches_by_event_kind() {
        let mut cam = CameraState::default();
        let ctl = GestureController::new();
        ctl.apply(&mut cam, GestureEvent::Pinch(2.0), IMAGE);
        ctl.apply(&mut cam, GestureEvent::Pan(PanDelta::new(IMAGE.0, 0.0)), IMAGE);
        assert_relative_eq!(cam.field_of_view_deg(), 30.0);
        assert_relative_eq!(cam.rotation_y(), 0.8);
    }

    #[test]
    fn constructor_clamps_field_of_view() {
        assert_eq!(CameraState::new(0.0, 0.0, 500.0).field_of_view_deg(), FOV_MAX_DEG);
        assert_eq!(CameraState::new(0.0, 0.0, 1.0).field_of_view_deg(), FOV_MIN_DEG);
    }
}
