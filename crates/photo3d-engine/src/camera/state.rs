pub const FOV_MIN_DEG: f32 = 20.0;
pub const FOV_MAX_DEG: f32 = 160.0;
pub const FOV_DEFAULT_DEG: f32 = 60.0;

/// Accumulated model rotation and vertical field of view.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraState {
    /// Rotation about the X axis, radians. Driven by vertical pans.
    pub(crate) rotation_x: f32,
    /// Rotation about the Y axis, radians. Driven by horizontal pans.
    pub(crate) rotation_y: f32,
    /// Vertical field of view in degrees, kept within `[FOV_MIN_DEG, FOV_MAX_DEG]`.
    pub(crate) field_of_view_deg: f32,
}

impl CameraState {
    pub fn new(rotation_x: f32, rotation_y: f32, field_of_view_deg: f32) -> Self {
        Self {
            rotation_x,
            rotation_y,
            field_of_view_deg: clamp_fov(field_of_view_deg),
        }
    }

    #[inline]
    pub fn rotation_x(&self) -> f32 {
        self.rotation_x
    }

    #[inline]
    pub fn rotation_y(&self) -> f32 {
        self.rotation_y
    }

    #[inline]
    pub fn field_of_view_deg(&self) -> f32 {
        self.field_of_view_deg
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            rotation_x: 0.0,
            rotation_y: 0.0,
            field_of_view_deg: FOV_DEFAULT_DEG,
        }
    }
}

pub(super) fn clamp_fov(deg: f32) -> f32 {
    if deg.is_nan() {
        return FOV_DEFAULT_DEG;
    }
    deg.clamp(FOV_MIN_DEG, FOV_MAX_DEG)
}
