//! Camera transform composition.
//!
//! The eye is fixed; only the model rotates. Depth uses the wgpu `[0, 1]`
//! clip-space convention.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::camera::CameraState;

pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 10.0;
pub const EYE: Vec3 = Vec3::new(0.0, 0.0, 2.0);

/// Projection, view and model matrices for one frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transforms {
    pub projection: Mat4,
    pub view: Mat4,
    pub model: Mat4,
}

impl Transforms {
    /// Composes the matrices for `camera` at the given viewport aspect ratio.
    ///
    /// A non-positive or non-finite aspect ratio falls back to `1.0`.
    pub fn compose(camera: &CameraState, aspect: f32) -> Self {
        let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };

        let projection = Mat4::perspective_rh(
            camera.field_of_view_deg().to_radians(),
            aspect,
            Z_NEAR,
            Z_FAR,
        );
        let view = Mat4::look_at_rh(EYE, Vec3::ZERO, Vec3::Y);

        // X first, then Y, each post-multiplied onto the identity.
        let model = Mat4::IDENTITY
            * Mat4::from_rotation_x(camera.rotation_x)
            * Mat4::from_rotation_y(camera.rotation_y);

        Self {
            projection,
            view,
            model,
        }
    }
}

/// One `mat4x4<f32>` uniform, column-major.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct MatrixUniform {
    pub cols: [[f32; 4]; 4],
}

impl From<Mat4> for MatrixUniform {
    fn from(m: Mat4) -> Self {
        Self {
            cols: m.to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn default_camera_has_identity_model() {
        let t = Transforms::compose(&CameraState::default(), 1.5);
        assert!(t.model.abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn view_moves_origin_two_units_forward() {
        let t = Transforms::compose(&CameraState::default(), 1.0);
        let p = t.view * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!(p.abs_diff_eq(Vec4::new(0.0, 0.0, -2.0, 1.0), 1e-6));
    }

    #[test]
    fn model_rotates_about_x_before_y() {
        let mut cam = CameraState::default();
        cam.rotation_x = 0.3;
        cam.rotation_y = -1.1;
        let t = Transforms::compose(&cam, 1.0);

        let expected = Mat4::from_rotation_x(0.3) * Mat4::from_rotation_y(-1.1);
        assert!(t.model.abs_diff_eq(expected, 1e-6));

        let swapped = Mat4::from_rotation_y(-1.1) * Mat4::from_rotation_x(0.3);
        assert!(!t.model.abs_diff_eq(swapped, 1e-3));
    }

    #[test]
    fn projection_uses_field_of_view_and_aspect() {
        let t = Transforms::compose(&CameraState::default(), 2.0);
        let expected = Mat4::perspective_rh(60f32.to_radians(), 2.0, Z_NEAR, Z_FAR);
        assert!(t.projection.abs_diff_eq(expected, 1e-6));

        // y scale = cot(fov / 2), x scale = y scale / aspect
        let f = 1.0 / (30f32.to_radians()).tan();
        assert!((t.projection.y_axis.y - f).abs() < 1e-5);
        assert!((t.projection.x_axis.x - f / 2.0).abs() < 1e-5);
    }

    #[test]
    fn degenerate_aspect_falls_back_to_square() {
        let cam = CameraState::default();
        assert_eq!(Transforms::compose(&cam, 0.0), Transforms::compose(&cam, 1.0));
        assert_eq!(Transforms::compose(&cam, f32::NAN), Transforms::compose(&cam, 1.0));
    }

    #[test]
    fn grid_centre_projects_inside_clip_volume() {
        let t = Transforms::compose(&CameraState::default(), 1.0);
        let clip = t.projection * t.view * t.model * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip / clip.w;
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
    }
}
