//! GPU rendering subsystem.
//!
//! The photo is drawn as a grid of vertices sampled from the image and pushed
//! through a model/view/projection chain.
//!
//! Convention:
//! - Grid vertices are emitted directly in NDC: the image spans `[-1, 1]` on
//!   both axes, row 0 at the top, +Y up.
//! - Texture coordinates run 0..1 with +V down the image.
//! - All per-frame data is rebuilt every frame; nothing is cached between frames.

mod frame;
mod mesh;
mod pipeline;
mod settings;
mod texture;
mod transform;

pub use frame::{DrawCall, FrameOutcome, FramePlan, SkipReason};
pub use mesh::{GridDims, GridMesh, GridVertex, PointUniforms, MAX_GRID_VERTICES, SPARSE_COLUMN_STRIDE};
pub use pipeline::PhotoRenderer;
pub use settings::{ParseModeError, PrimitiveMode, RenderSettings, SamplingStep};
pub use texture::{decode_image, ColorSpace, DecodedImage, PhotoTexture, TextureError};
pub use transform::{Transforms, EYE, Z_FAR, Z_NEAR};
