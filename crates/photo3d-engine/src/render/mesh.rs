//! Grid mesh generation over an image.
//!
//! The grid lives directly in normalized device coordinates: the image spans
//! `[-1, 1]` on both axes, row 0 at the top. Each grid cell is `step` image
//! pixels wide and each vertex sits at its cell centre.

use bytemuck::{Pod, Zeroable};

use super::settings::{PrimitiveMode, SamplingStep};

/// Column stride of the sparse (points/lines) sampling loops.
///
/// Fixed regardless of the sampling step, unlike the row stride.
pub const SPARSE_COLUMN_STRIDE: usize = 4;

/// One grid vertex as uploaded to the GPU.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct GridVertex {
    /// NDC position, `z = 0`, `w = 1`.
    pub position: [f32; 4],
    /// Normalized texture coordinate in `[0, 1)`.
    pub texcoord: [f32; 2],
}

impl GridVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x4, // position
        1 => Float32x2  // texcoord
    ];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GridVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Per-draw uniform block consumed by the vertex stage.
///
/// Must match `PointUniforms` in `shaders/photo.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PointUniforms {
    /// Half a grid cell in NDC units, which equals one cell in texture space.
    pub texcoord_scale: [f32; 2],
    /// Sampling step, in pixels.
    pub point_size_px: f32,
    pub _pad: f32, // 16-byte alignment
}

/// Upper bound on `rows * cols` for one grid.
///
/// Keeps every vertex index and count within `u32`. Steps small enough to
/// exceed it are raised until the grid fits.
pub const MAX_GRID_VERTICES: usize = 1 << 24;

/// Grid layout shared by every primitive mode.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GridDims {
    pub rows: usize,
    pub cols: usize,
    /// Effective sampling step in pixels. Equals the requested step unless
    /// that would exceed [`MAX_GRID_VERTICES`].
    pub step: f32,
    /// Cell width in NDC units.
    pub cell_x: f32,
    /// Cell height in NDC units.
    pub cell_y: f32,
}

impl GridDims {
    /// Computes the grid for an image of `width × height` pixels.
    ///
    /// Non-positive or non-finite dimensions are treated as one pixel.
    pub fn new(width: f32, height: f32, step: SamplingStep) -> Self {
        let width = sanitize_dim(width);
        let height = sanitize_dim(height);
        let step = fit_step(width as f64, height as f64, step.get() as f64);

        Self {
            rows: grid_extent(height as f64, step),
            cols: grid_extent(width as f64, step),
            step: step as f32,
            cell_x: (step / width as f64 * 2.0) as f32,
            cell_y: (step / height as f64 * 2.0) as f32,
        }
    }

    #[inline]
    pub fn vertex_total(&self) -> usize {
        self.rows * self.cols
    }

    /// Vertex and index buffer sizes in bytes that [`GridMesh::build`] would
    /// produce for `mode`, without building it.
    pub fn buffer_sizes(&self, mode: PrimitiveMode) -> (u64, u64) {
        let vertex_size = std::mem::size_of::<GridVertex>() as u64;
        match mode {
            PrimitiveMode::Triangles => {
                let cells = (self.rows as u64 - 1) * (self.cols as u64 - 1);
                (self.vertex_total() as u64 * vertex_size, cells * 6 * 4)
            }
            PrimitiveMode::Points | PrimitiveMode::Lines => {
                let rows = self.rows.div_ceil(SamplingStep::new(self.step).row_stride());
                let cols = self.cols.div_ceil(SPARSE_COLUMN_STRIDE);
                ((rows * cols) as u64 * vertex_size, 0)
            }
        }
    }

    /// True when both buffers for `mode` fit under `max_buffer_size`.
    pub fn fits_buffer_limit(&self, mode: PrimitiveMode, max_buffer_size: u64) -> bool {
        let (vertex, index) = self.buffer_sizes(mode);
        vertex <= max_buffer_size && index <= max_buffer_size
    }

    fn vertex(&self, row: usize, col: usize) -> GridVertex {
        let x = col as f32 * self.cell_x + self.cell_x / 2.0 - 1.0;
        let y = 1.0 - row as f32 * self.cell_y - self.cell_y / 2.0;
        GridVertex {
            position: [x, y, 0.0, 1.0],
            texcoord: [col as f32 / self.cols as f32, row as f32 / self.rows as f32],
        }
    }
}

fn sanitize_dim(v: f32) -> f32 {
    if v.is_finite() && v > 0.0 { v } else { 1.0 }
}

/// `floor(extent / step) + 1`, computed in f64 so tiny steps cannot wrap.
fn grid_extent(extent: f64, step: f64) -> usize {
    (extent / step).floor() as usize + 1
}

fn grid_total(width: f64, height: f64, step: f64) -> f64 {
    ((width / step).floor() + 1.0) * ((height / step).floor() + 1.0)
}

/// Smallest step not below `step` whose grid stays within the vertex cap.
fn fit_step(width: f64, height: f64, step: f64) -> f64 {
    let cap = MAX_GRID_VERTICES as f64;
    if grid_total(width, height, step) <= cap {
        return step;
    }

    // Start from the area bound, then widen until the floors settle under the cap.
    let mut fitted = (width * height / cap).sqrt().max(step);
    while grid_total(width, height, fitted) > cap {
        fitted *= 1.0 + 1.0 / 64.0;
    }
    log::debug!("sampling step {step} too fine for {width}x{height}; using {fitted}");
    fitted
}

/// CPU-side geometry for one frame.
///
/// `indices` is present only for [`PrimitiveMode::Triangles`].
#[derive(Debug, Clone, PartialEq)]
pub struct GridMesh {
    pub mode: PrimitiveMode,
    pub dims: GridDims,
    pub vertices: Vec<GridVertex>,
    pub indices: Option<Vec<u32>>,
    pub uniforms: PointUniforms,
}

impl GridMesh {
    /// Builds the mesh and its uniform block for `(width, height, mode, step)`.
    ///
    /// Pure: identical inputs always produce identical output.
    pub fn build(width: f32, height: f32, mode: PrimitiveMode, step: SamplingStep) -> Self {
        let dims = GridDims::new(width, height, step);

        let (vertices, indices) = match mode {
            PrimitiveMode::Triangles => (dense_vertices(&dims), Some(triangle_indices(&dims))),
            PrimitiveMode::Points | PrimitiveMode::Lines => (sparse_vertices(&dims), None),
        };

        let uniforms = PointUniforms {
            texcoord_scale: [dims.cell_x / 2.0, dims.cell_y / 2.0],
            point_size_px: dims.step,
            _pad: 0.0,
        };

        Self {
            mode,
            dims,
            vertices,
            indices,
            uniforms,
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    #[inline]
    pub fn index_count(&self) -> u32 {
        self.indices.as_ref().map_or(0, |i| i.len() as u32)
    }
}

fn dense_vertices(dims: &GridDims) -> Vec<GridVertex> {
    let mut out = Vec::with_capacity(dims.vertex_total());
    for row in 0..dims.rows {
        for col in 0..dims.cols {
            out.push(dims.vertex(row, col));
        }
    }
    out
}

// Row stride follows the step; column stride is fixed. See SPARSE_COLUMN_STRIDE.
fn sparse_vertices(dims: &GridDims) -> Vec<GridVertex> {
    let mut out = Vec::new();
    for row in (0..dims.rows).step_by(SamplingStep::new(dims.step).row_stride()) {
        for col in (0..dims.cols).step_by(SPARSE_COLUMN_STRIDE) {
            out.push(dims.vertex(row, col));
        }
    }
    out
}

/// Two triangles per cell: (r,c)-(r,c+1)-(r+1,c) and (r+1,c)-(r,c+1)-(r+1,c+1).
fn triangle_indices(dims: &GridDims) -> Vec<u32> {
    let rows = dims.rows as u32;
    let cols = dims.cols as u32;
    let mut out = Vec::with_capacity(6 * (dims.rows - 1) * (dims.cols - 1));

    for row in 0..rows - 1 {
        for col in 0..cols - 1 {
            let top_left = cols * row + col;
            let top_right = top_left + 1;
            let bottom_left = cols * (row + 1) + col;
            let bottom_right = bottom_left + 1;

            out.extend_from_slice(&[
                top_left,
                top_right,
                bottom_left,
                bottom_left,
                top_right,
                bottom_right,
            ]);
        }
    }
    out
}
