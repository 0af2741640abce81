//! Crop-to-output transform and PNG export.

use std::io::Cursor;
use std::path::Path;

use image::DynamicImage;
use image::imageops::FilterType;

use crate::error::CropError;
use crate::geometry::{self, CropRect, DisplaySize};

/// Filename offered in the save dialog.
pub const OUTPUT_FILENAME: &str = "cropped-image.png";

/// A finished export, handed to the save path and then dropped.
pub struct ExportArtifact {
    pub png: Vec<u8>,
    pub filename: &'static str,
}

/// Rasterize the crop selection.
///
/// The sampled region comes from the full-resolution source via the
/// natural/displayed scale factors (recomputed here, per export), while the
/// output raster keeps the size the user drew on screen — a single-pass
/// resample blit.
pub fn render(
    source: &DynamicImage,
    display: DisplaySize,
    crop: CropRect,
) -> Result<DynamicImage, CropError> {
    let natural = (source.width(), source.height());
    let region =
        geometry::map_to_source(natural, display, crop).ok_or(CropError::EmptySelection)?;
    let (out_w, out_h) = crop.output_size();

    let cropped = source.crop_imm(region.x, region.y, region.w, region.h);
    if (region.w, region.h) == (out_w, out_h) {
        return Ok(cropped);
    }
    Ok(cropped.resize_exact(out_w, out_h, FilterType::Lanczos3))
}

/// Encode a raster as PNG bytes.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, CropError> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, image::ImageFormat::Png)
        .map_err(CropError::Encode)?;
    Ok(buffer.into_inner())
}

/// Produce the downloadable artifact for the current selection.
pub fn export(
    source: &DynamicImage,
    display: DisplaySize,
    crop: CropRect,
) -> Result<ExportArtifact, CropError> {
    let raster = render(source, display, crop)?;
    let png = encode_png(&raster)?;
    Ok(ExportArtifact {
        png,
        filename: OUTPUT_FILENAME,
    })
}

/// Write the artifact where the user pointed the save dialog.
pub fn write_artifact(artifact: &ExportArtifact, path: &Path) -> Result<(), CropError> {
    std::fs::write(path, &artifact.png).map_err(|source| CropError::Write {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgba, RgbaImage};

    #[test]
    fn output_raster_has_the_drawn_size() {
        // 2000x1000 shown at 1000x500, selection 200x100 in displayed
        // coordinates: the export samples a 400x200 source region but the
        // raster is 200x100 — as large as what was drawn.
        let source = DynamicImage::new_rgb8(2000, 1000);
        let raster = render(
            &source,
            DisplaySize::new(1000.0, 500.0),
            CropRect::new(100.0, 100.0, 200.0, 100.0),
        )
        .expect("render");
        assert_eq!(raster.dimensions(), (200, 100));
    }

    #[test]
    fn sampled_pixels_come_from_the_mapped_region() {
        // Left half red, right half blue. A selection over the displayed
        // left quarter must come out uniformly red.
        let mut pixels = RgbaImage::new(100, 100);
        for (x, _, p) in pixels.enumerate_pixels_mut() {
            *p = if x < 50 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            };
        }
        let source = DynamicImage::ImageRgba8(pixels);

        let raster = render(
            &source,
            DisplaySize::new(50.0, 50.0),
            CropRect::new(0.0, 0.0, 25.0, 25.0),
        )
        .expect("render");

        assert_eq!(raster.dimensions(), (25, 25));
        for (_, _, p) in raster.to_rgba8().enumerate_pixels() {
            assert_eq!(*p, Rgba([255, 0, 0, 255]));
        }
    }

    #[test]
    fn identity_scale_crops_without_resampling_surprises() {
        let mut pixels = RgbaImage::new(40, 40);
        for (x, y, p) in pixels.enumerate_pixels_mut() {
            *p = Rgba([x as u8, y as u8, 0, 255]);
        }
        let source = DynamicImage::ImageRgba8(pixels);

        let raster = render(
            &source,
            DisplaySize::new(40.0, 40.0),
            CropRect::new(10.0, 5.0, 8.0, 8.0),
        )
        .expect("render");

        let out = raster.to_rgba8();
        assert_eq!(out.dimensions(), (8, 8));
        assert_eq!(*out.get_pixel(0, 0), Rgba([10, 5, 0, 255]));
        assert_eq!(*out.get_pixel(7, 7), Rgba([17, 12, 0, 255]));
    }

    #[test]
    fn empty_selection_aborts_the_export() {
        let source = DynamicImage::new_rgb8(100, 100);
        let result = render(
            &source,
            DisplaySize::new(100.0, 100.0),
            CropRect::new(10.0, 10.0, 0.2, 0.2),
        );
        assert!(matches!(result, Err(CropError::EmptySelection)));
    }

    #[test]
    fn artifact_is_a_png_of_the_expected_size() {
        let source = DynamicImage::new_rgb8(2000, 1000);
        let artifact = export(
            &source,
            DisplaySize::new(1000.0, 500.0),
            CropRect::new(100.0, 100.0, 200.0, 100.0),
        )
        .expect("export");

        assert_eq!(artifact.filename, "cropped-image.png");
        let decoded = image::load_from_memory(&artifact.png).expect("decode artifact");
        assert_eq!(decoded.dimensions(), (200, 100));
        assert_eq!(
            image::guess_format(&artifact.png).expect("format"),
            image::ImageFormat::Png
        );
    }
}
