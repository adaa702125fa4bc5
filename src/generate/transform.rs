//! Pixel operations used to derive assets from a source bitmap.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat};

#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("failed to read image '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("cannot {op} {from_width}x{from_height} image to {width}x{height}")]
    Geometry {
        op: &'static str,
        from_width: u32,
        from_height: u32,
        width: u32,
        height: u32,
    },

    #[error("failed to encode PNG: {0}")]
    Encode(image::ImageError),
}

/// Resize/crop/composite primitives.
///
/// Implementations must be deterministic: the same input and target size
/// always produce the same pixels.
pub trait ImageTransform: Send + Sync {
    /// Scale to cover `width × height` preserving aspect ratio, cropping the
    /// overflow around the centre. The result is exactly `width × height`.
    fn resize(&self, src: &DynamicImage, width: u32, height: u32)
    -> Result<DynamicImage, TransformError>;

    /// Centre-anchored crop to `width × height`.
    fn crop(&self, src: &DynamicImage, width: u32, height: u32)
    -> Result<DynamicImage, TransformError>;

    /// Draw `foreground` over `background`. The result has the foreground's
    /// dimensions; the background is resized to cover it.
    fn composite(
        &self,
        foreground: &DynamicImage,
        background: &DynamicImage,
    ) -> Result<DynamicImage, TransformError>;
}

/// [`ImageTransform`] backed by the `image` crate.
#[derive(Debug, Clone, Copy)]
pub struct Resampler {
    filter: FilterType,
}

impl Resampler {
    pub fn new(filter: FilterType) -> Self {
        Resampler { filter }
    }
}

impl Default for Resampler {
    fn default() -> Self {
        Self::new(FilterType::Lanczos3)
    }
}

impl ImageTransform for Resampler {
    fn resize(
        &self,
        src: &DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<DynamicImage, TransformError> {
        if width == 0 || height == 0 || src.width() == 0 || src.height() == 0 {
            return Err(geometry("resize", src, width, height));
        }
        if (src.width(), src.height()) == (width, height) {
            return Ok(src.clone());
        }
        Ok(src.resize_to_fill(width, height, self.filter))
    }

    fn crop(
        &self,
        src: &DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<DynamicImage, TransformError> {
        if width == 0 || height == 0 || width > src.width() || height > src.height() {
            return Err(geometry("crop", src, width, height));
        }
        let x = (src.width() - width) / 2;
        let y = (src.height() - height) / 2;
        Ok(src.crop_imm(x, y, width, height))
    }

    fn composite(
        &self,
        foreground: &DynamicImage,
        background: &DynamicImage,
    ) -> Result<DynamicImage, TransformError> {
        let mut canvas = self
            .resize(background, foreground.width(), foreground.height())?
            .to_rgba8();
        imageops::overlay(&mut canvas, &foreground.to_rgba8(), 0, 0);
        Ok(DynamicImage::ImageRgba8(canvas))
    }
}

fn geometry(op: &'static str, src: &DynamicImage, width: u32, height: u32) -> TransformError {
    TransformError::Geometry {
        op,
        from_width: src.width(),
        from_height: src.height(),
        width,
        height,
    }
}

/// Decode a source bitmap from disk.
pub fn load(path: &Path) -> Result<DynamicImage, TransformError> {
    image::open(path).map_err(|source| TransformError::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, TransformError> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .map_err(TransformError::Encode)?;
    Ok(buf.into_inner())
}
