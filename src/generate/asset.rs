use std::path::{Path, PathBuf};

use image::DynamicImage;
use tracing::debug;

use crate::catalog::AssetSpec;
use crate::generate::transform::{self, ImageTransform, Resampler, TransformError};
use crate::generate::GenerateError;
use crate::utils::file_ops::{WriteStatus, write_atomic};

/// Produces one output file per [`AssetSpec`].
///
/// The whole transform chain runs in memory and the result is written
/// atomically, so a failed crop never leaves a half-finished file behind.
#[derive(Debug, Clone)]
pub struct AssetGenerator<T = Resampler> {
    transform: T,
}

impl Default for AssetGenerator {
    fn default() -> Self {
        Self::new(Resampler::default())
    }
}

impl<T: ImageTransform> AssetGenerator<T> {
    pub fn new(transform: T) -> Self {
        AssetGenerator { transform }
    }

    pub fn transform(&self) -> &T {
        &self.transform
    }

    /// Where `asset` lands inside `output_dir`.
    pub fn destination(asset: &AssetSpec, output_dir: &Path) -> PathBuf {
        output_dir.join(&asset.file_name)
    }

    /// Load `source_path` and generate `asset` into `output_dir`.
    pub fn generate(
        &self,
        source_path: &Path,
        asset: &AssetSpec,
        output_dir: &Path,
    ) -> Result<WriteStatus, GenerateError> {
        let source = transform::load(source_path)?;
        self.generate_from(&source, asset, output_dir)
    }

    /// Generate `asset` from an already decoded source.
    pub fn generate_from(
        &self,
        source: &DynamicImage,
        asset: &AssetSpec,
        output_dir: &Path,
    ) -> Result<WriteStatus, GenerateError> {
        let image = self.render(source, asset)?;
        let bytes = transform::encode_png(&image)?;

        let path = Self::destination(asset, output_dir);
        let status = write_atomic(&path, &bytes)
            .map_err(|source| GenerateError::Filesystem { path: path.clone(), source })?;

        debug!(
            "{} {}x{} -> {} ({:?})",
            asset.file_name,
            image.width(),
            image.height(),
            path.display(),
            status
        );
        Ok(status)
    }

    /// Resize, then crop when the asset asks for it.
    pub fn render(&self, source: &DynamicImage, asset: &AssetSpec) -> Result<DynamicImage, TransformError> {
        let resized = self.transform.resize(source, asset.width, asset.height)?;
        match asset.crop_height {
            Some(crop_height) => self.transform.crop(&resized, asset.width, crop_height),
            None => Ok(resized),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::fs;
    use tempfile::tempdir;

    fn lanczos() -> AssetGenerator {
        AssetGenerator::new(Resampler::default())
    }

    /// Resizes normally but refuses every crop.
    struct NoCrop(Resampler);

    impl ImageTransform for NoCrop {
        fn resize(&self, src: &DynamicImage, w: u32, h: u32) -> Result<DynamicImage, TransformError> {
            self.0.resize(src, w, h)
        }

        fn crop(&self, src: &DynamicImage, w: u32, h: u32) -> Result<DynamicImage, TransformError> {
            Err(TransformError::Geometry {
                op: "crop",
                from_width: src.width(),
                from_height: src.height(),
                width: w,
                height: h,
            })
        }

        fn composite(&self, fg: &DynamicImage, bg: &DynamicImage) -> Result<DynamicImage, TransformError> {
            self.0.composite(fg, bg)
        }
    }

    /// Square source split into horizontal bands: blue top quarter, green
    /// middle half, red bottom quarter.
    fn banded_source(size: u32) -> DynamicImage {
        let mut img = RgbaImage::new(size, size);
        for (_, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = if y < size / 4 {
                Rgba([0, 0, 255, 255])
            } else if y < size * 3 / 4 {
                Rgba([0, 255, 0, 255])
            } else {
                Rgba([255, 0, 0, 255])
            };
        }
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn square_icon_has_declared_size() {
        let out = tempdir().unwrap();
        let source = banded_source(256);
        let asset = AssetSpec::square("drawable-mdpi/icon.png", 48);

        let status = lanczos()
            .generate_from(&source, &asset, out.path())
            .unwrap();

        assert_eq!(status, WriteStatus::Written);
        let written = image::open(out.path().join("drawable-mdpi/icon.png")).unwrap();
        assert_eq!((written.width(), written.height()), (48, 48));
    }

    #[test]
    fn wide_tile_is_resized_then_centre_cropped() {
        let out = tempdir().unwrap();
        let source_path = out.path().join("icon.png");
        banded_source(1024).save(&source_path).unwrap();
        let asset = AssetSpec::square("Wide310x150Logo.scale-100.png", 310).cropped_to(150);

        lanczos()
            .generate(&source_path, &asset, out.path())
            .unwrap();

        let written = image::open(out.path().join("Wide310x150Logo.scale-100.png"))
            .unwrap()
            .to_rgba8();
        assert_eq!(written.dimensions(), (310, 150));

        // A top-anchored crop would start inside the blue band.
        for y in [5, 75, 145] {
            let pixel = written.get_pixel(155, y);
            assert!(pixel[1] > 200 && pixel[0] < 50 && pixel[2] < 50, "row {} is {:?}", y, pixel);
        }
    }

    #[test]
    fn crop_failure_writes_nothing() {
        let out = tempdir().unwrap();
        let asset = AssetSpec::square("Wide310x150Logo.scale-100.png", 310).cropped_to(150);

        let result = AssetGenerator::new(NoCrop(Resampler::default()))
            .generate_from(&banded_source(64), &asset, out.path());

        assert!(matches!(result, Err(GenerateError::Transform(_))));
        assert!(!out.path().join("Wide310x150Logo.scale-100.png").exists());
        assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
    }

    #[test]
    fn unreadable_source_is_reported() {
        let out = tempdir().unwrap();
        let source_path = out.path().join("icon.png");
        fs::write(&source_path, b"corrupt").unwrap();

        let result = lanczos().generate(
            &source_path,
            &AssetSpec::square("icon-40.png", 40),
            out.path(),
        );

        assert!(matches!(result, Err(GenerateError::Transform(TransformError::Read { .. }))));
    }

    #[test]
    fn unwritable_destination_is_reported() {
        let out = tempdir().unwrap();
        fs::write(out.path().join("images"), b"a file, not a directory").unwrap();

        let result = lanczos().generate_from(
            &banded_source(32),
            &AssetSpec::square("StoreLogo.scale-100.png", 50),
            &out.path().join("images"),
        );

        assert!(matches!(result, Err(GenerateError::Filesystem { .. })));
    }

    #[test]
    fn regenerating_is_byte_identical() {
        let out = tempdir().unwrap();
        let source = banded_source(128);
        let asset = AssetSpec::new("screen.png", 40, 64);
        let generator = lanczos();

        generator.generate_from(&source, &asset, out.path()).unwrap();
        let first = fs::read(out.path().join("screen.png")).unwrap();

        let status = generator.generate_from(&source, &asset, out.path()).unwrap();
        let second = fs::read(out.path().join("screen.png")).unwrap();

        assert_eq!(status, WriteStatus::Unchanged);
        assert_eq!(first, second);
    }
}
