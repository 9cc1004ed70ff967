use std::path::PathBuf;

use clap::Parser;
use photo3d_engine::render::PrimitiveMode;

use crate::controls::{SLIDER_MAX, SLIDER_MIN};

/// Views a photo as a rotatable grid of triangles, points or lines.
///
/// Drag to rotate, scroll or pinch to zoom. Keys 1/2/3 switch mode,
/// Up/Down change density, Escape quits. Drop an image on the window to
/// replace the current one.
#[derive(Parser, Debug, Clone)]
#[command(name = "photo3d-viewer", version)]
pub struct Args {
    /// Image to open at startup (PNG, JPEG, BMP, GIF, TIFF, WEBP).
    #[arg(value_name = "IMAGE")]
    pub image: Option<PathBuf>,

    /// Initial primitive mode: triangles, points or lines.
    #[arg(long, default_value_t = PrimitiveMode::Triangles)]
    pub mode: PrimitiveMode,

    /// Initial density slider value.
    #[arg(long, default_value_t = 5.0, value_parser = parse_slider)]
    pub step: f32,

    /// Log filter in env_logger syntax (overrides RUST_LOG).
    #[arg(long, value_name = "FILTER")]
    pub log: Option<String>,
}

fn parse_slider(s: &str) -> Result<f32, String> {
    let v: f32 = s.parse().map_err(|e| format!("{e}"))?;
    if (SLIDER_MIN..=SLIDER_MAX).contains(&v) {
        Ok(v)
    } else {
        Err(format!("must be between {SLIDER_MIN} and {SLIDER_MAX}"))
    }
}
