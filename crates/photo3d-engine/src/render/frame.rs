//! Per-frame CPU data and outcome reporting.

use crate::camera::CameraState;
use crate::coords::Viewport;

use super::mesh::GridMesh;
use super::settings::{PrimitiveMode, RenderSettings};
use super::transform::Transforms;

/// Everything the GPU needs for one frame, rebuilt from scratch every time.
///
/// Mesh, uniforms and transforms are always derived together from the same
/// `(image, mode, step, camera, viewport)` inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    pub mesh: GridMesh,
    pub transforms: Transforms,
}

impl FramePlan {
    pub fn build(
        image_size: (f32, f32),
        settings: RenderSettings,
        camera: &CameraState,
        viewport: Viewport,
    ) -> Self {
        let mesh = GridMesh::build(image_size.0, image_size.1, settings.mode, settings.step);
        let transforms = Transforms::compose(camera, viewport.aspect_ratio());
        Self { mesh, transforms }
    }

    /// The single draw call this frame issues.
    pub fn draw_call(&self) -> DrawCall {
        match self.mesh.mode {
            PrimitiveMode::Triangles => match self.mesh.index_count() {
                0 => DrawCall::Empty,
                index_count => DrawCall::Indexed { index_count },
            },
            PrimitiveMode::Points | PrimitiveMode::Lines => match self.mesh.vertex_count() {
                0 => DrawCall::Empty,
                vertex_count => DrawCall::NonIndexed { vertex_count },
            },
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DrawCall {
    /// Indexed triangle list.
    Indexed { index_count: u32 },
    /// Point list or line strip over the whole vertex buffer.
    NonIndexed { vertex_count: u32 },
    /// Degenerate grid (a single row or column of triangles); nothing to draw.
    Empty,
}

/// Why a frame was not drawn.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SkipReason {
    /// No GPU device or pipeline; every render call is a no-op.
    Uninitialized,
    /// No photo has been loaded yet.
    NoImage,
    /// The compositor had no drawable available.
    SurfaceUnavailable,
    /// The window is minimized.
    ZeroSizedViewport,
    /// The mesh needs a buffer larger than the device allows.
    MeshTooLarge,
}

/// Result of one `render_frame` call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    Presented,
    Skipped(SkipReason),
    /// Unrecoverable surface error; the caller should shut down.
    Fatal,
}
