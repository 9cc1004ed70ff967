//! Photo decoding and GPU texture upload.

use std::path::Path;

/// How decoded photo bytes are interpreted when sampled.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum ColorSpace {
    /// Texel values are passed through unchanged (`Rgba8Unorm`).
    #[default]
    Linear,
    /// Texels are decoded from sRGB on sampling (`Rgba8UnormSrgb`).
    Srgb,
}

impl ColorSpace {
    fn texture_format(self) -> wgpu::TextureFormat {
        match self {
            Self::Linear => wgpu::TextureFormat::Rgba8Unorm,
            Self::Srgb => wgpu::TextureFormat::Rgba8UnormSrgb,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("failed to read image file: {0}")]
    Io(#[from] std::io::Error),

    #[error("image has zero size")]
    Empty,

    #[error("image is {width}x{height}, device limit is {max}x{max}")]
    TooLarge { width: u32, height: u32, max: u32 },

    #[error("renderer has no GPU device")]
    Unavailable,
}

/// Decoded RGBA8 pixels, rows top to bottom.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Decodes an encoded image (PNG, JPEG, ...) into tightly packed RGBA8.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, TextureError> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(TextureError::Empty);
    }
    Ok(DecodedImage {
        width,
        height,
        rgba: rgba.into_raw(),
    })
}

fn check_dimensions(width: u32, height: u32, max: u32) -> Result<(), TextureError> {
    if width == 0 || height == 0 {
        return Err(TextureError::Empty);
    }
    if width > max || height > max {
        return Err(TextureError::TooLarge { width, height, max });
    }
    Ok(())
}

/// A photo resident on the GPU.
///
/// Immutable once created; a new photo replaces it wholesale.
#[derive(Debug)]
pub struct PhotoTexture {
    width: u32,
    height: u32,
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl PhotoTexture {
    /// Uploads decoded pixels as a single-mip 2D texture.
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &DecodedImage,
        color_space: ColorSpace,
    ) -> Result<Self, TextureError> {
        let DecodedImage {
            width,
            height,
            rgba,
        } = image;
        let (width, height) = (*width, *height);
        check_dimensions(width, height, device.limits().max_texture_dimension_2d)?;

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("photo3d photo texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: color_space.texture_format(),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Ok(Self {
            width,
            height,
            _texture: texture,
            view,
        })
    }

    /// Decodes `bytes` and uploads the result.
    pub fn from_bytes(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bytes: &[u8],
        color_space: ColorSpace,
    ) -> Result<Self, TextureError> {
        let decoded = decode_image(bytes)?;
        Self::upload(device, queue, &decoded, color_space)
    }

    /// Reads, decodes and uploads the image at `path`.
    pub fn from_path(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
        color_space: ColorSpace,
    ) -> Result<Self, TextureError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(device, queue, &bytes, color_space)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel dimensions as floats, the unit gesture and mesh math work in.
    pub fn size_f32(&self) -> (f32, f32) {
        (self.width as f32, self.height as f32)
    }

    pub(crate) fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode_png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_fn(width, height, |x, y| {
            image::Rgba([x as u8 * 40, y as u8 * 40, 7, 255])
        });
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn decodes_png_to_packed_rgba_top_row_first() {
        let decoded = decode_image(&encode_png(3, 2)).unwrap();
        assert_eq!((decoded.width, decoded.height), (3, 2));
        assert_eq!(decoded.rgba.len(), 3 * 2 * 4);
        // pixel (2, 0)
        assert_eq!(&decoded.rgba[8..12], &[80, 0, 7, 255]);
        // pixel (0, 1)
        assert_eq!(&decoded.rgba[12..16], &[0, 40, 7, 255]);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = decode_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, TextureError::Decode(_)));
    }

    #[test]
    fn dimension_checks() {
        assert!(check_dimensions(100, 50, 8192).is_ok());
        assert!(matches!(check_dimensions(0, 50, 8192), Err(TextureError::Empty)));
        assert!(matches!(
            check_dimensions(9000, 50, 8192),
            Err(TextureError::TooLarge { width: 9000, height: 50, max: 8192 })
        ));
    }

    #[test]
    fn color_space_selects_format() {
        assert_eq!(ColorSpace::default().texture_format(), wgpu::TextureFormat::Rgba8Unorm);
        assert_eq!(ColorSpace::Srgb.texture_format(), wgpu::TextureFormat::Rgba8UnormSrgb);
    }
}
