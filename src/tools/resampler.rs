use super::ImageResampler;
use crate::features::aspect_fit::{ResizePlan, ResolvedFit};
use crate::features::error::ImageError;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageDecoder, ImageReader, Rgb, RgbImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Resamples with the `image` crate and encodes JPEG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageCrateResampler {
    pub jpeg_quality: u8,
    /// Fill for the bars added in `Scale` mode.
    pub pad_color: Rgb<u8>,
    pub thumbnail_max_size: (u32, u32),
}

impl Default for ImageCrateResampler {
    fn default() -> Self {
        Self {
            jpeg_quality: 92,
            pad_color: Rgb([0, 0, 0]),
            thumbnail_max_size: (160, 120),
        }
    }
}

impl ImageCrateResampler {
    pub fn with_quality(jpeg_quality: u8) -> Self {
        Self {
            jpeg_quality,
            ..Self::default()
        }
    }

    fn write_jpeg(&self, image: &RgbImage, path: &Path) -> Result<(), ImageError> {
        let writer = BufWriter::new(File::create(path)?);
        let mut encoder = JpegEncoder::new_with_quality(writer, self.jpeg_quality);
        encoder.encode_image(image)?;
        Ok(())
    }
}

/// Decodes an image upright: the Exif orientation is applied here, because every tag,
/// including the orientation, is replaced later.
pub fn open_oriented(path: &Path) -> Result<DynamicImage, ImageError> {
    let mut decoder = ImageReader::open(path)?
        .with_guessed_format()?
        .into_decoder()?;
    let orientation = decoder.orientation()?;
    let mut img = DynamicImage::from_decoder(decoder)?;
    img.apply_orientation(orientation);
    Ok(img)
}

/// Fits `img` inside the canvas and centers it on `pad_color`.
pub fn scale_and_pad(img: &DynamicImage, width: u32, height: u32, pad_color: Rgb<u8>) -> RgbImage {
    let fitted = img.resize(width, height, FilterType::Lanczos3).to_rgb8();
    let mut canvas = RgbImage::from_pixel(width, height, pad_color);
    let x = width.saturating_sub(fitted.width()) / 2;
    let y = height.saturating_sub(fitted.height()) / 2;
    imageops::overlay(&mut canvas, &fitted, i64::from(x), i64::from(y));
    canvas
}

/// Covers the canvas with `img` and cuts the overflow evenly from both sides.
pub fn fill_and_crop(img: &DynamicImage, width: u32, height: u32) -> RgbImage {
    img.resize_to_fill(width, height, FilterType::Lanczos3)
        .to_rgb8()
}

impl ImageResampler for ImageCrateResampler {
    fn resample(&self, source: &Path, output: &Path, plan: &ResizePlan) -> Result<(), ImageError> {
        let img = open_oriented(source)?;
        let canvas = match plan.mode {
            ResolvedFit::Scale => {
                scale_and_pad(&img, plan.target_width, plan.target_height, self.pad_color)
            }
            ResolvedFit::Crop => fill_and_crop(&img, plan.target_width, plan.target_height),
        };
        self.write_jpeg(&canvas, output)
    }

    fn render_thumbnail(&self, image: &Path, thumbnail: &Path) -> Result<(), ImageError> {
        let (max_width, max_height) = self.thumbnail_max_size;
        let thumb = image::open(image)?.thumbnail(max_width, max_height).to_rgb8();
        self.write_jpeg(&thumb, thumbnail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_path(name: &str, ext: &str) -> PathBuf {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!("exif_forge_{name}_{stamp}.{ext}"))
    }

    fn red_source(width: u32, height: u32) -> PathBuf {
        let path = unique_path("source", "png");
        RgbImage::from_pixel(width, height, Rgb([230, 20, 20]))
            .save(&path)
            .expect("should write source image");
        path
    }

    #[test]
    fn test_crop_produces_exact_canvas() {
        let source = red_source(300, 200);
        let output = unique_path("crop", "jpg");
        let plan = ResizePlan {
            target_width: 100,
            target_height: 100,
            mode: ResolvedFit::Crop,
        };

        ImageCrateResampler::default()
            .resample(&source, &output, &plan)
            .unwrap();
        assert_eq!(image::image_dimensions(&output).unwrap(), (100, 100));

        let _ = std::fs::remove_file(&source);
        let _ = std::fs::remove_file(&output);
    }

    #[test]
    fn test_scale_pads_to_exact_canvas() {
        let source = red_source(300, 200);
        let output = unique_path("scale", "jpg");
        let plan = ResizePlan {
            target_width: 120,
            target_height: 120,
            mode: ResolvedFit::Scale,
        };

        ImageCrateResampler::default()
            .resample(&source, &output, &plan)
            .unwrap();
        let result = image::open(&output).unwrap().to_rgb8();
        assert_eq!(result.dimensions(), (120, 120));

        // 300x200 fits as 120x80, leaving 20 px bars above and below.
        let top = result.get_pixel(60, 2);
        assert!(top.0.iter().all(|c| *c < 40), "top bar should be padding, got {top:?}");
        let center = result.get_pixel(60, 60);
        assert!(center.0[0] > 180 && center.0[1] < 80, "center should be the source, got {center:?}");

        let _ = std::fs::remove_file(&source);
        let _ = std::fs::remove_file(&output);
    }

    #[test]
    fn test_scale_and_pad_in_memory() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(100, 400, Rgb([0, 0, 255])));
        let canvas = scale_and_pad(&img, 200, 200, Rgb([255, 255, 255]));
        assert_eq!(canvas.dimensions(), (200, 200));
        // 50x200 centered horizontally.
        assert_eq!(canvas.get_pixel(10, 100), &Rgb([255, 255, 255]));
        let inside = canvas.get_pixel(100, 100);
        assert!(inside.0[2] > 200 && inside.0[0] < 50, "got {inside:?}");
    }

    #[test]
    fn test_fill_and_crop_in_memory() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(400, 100, Rgb([0, 255, 0])));
        let canvas = fill_and_crop(&img, 50, 50);
        assert_eq!(canvas.dimensions(), (50, 50));
        let corner = canvas.get_pixel(0, 0);
        assert!(corner.0[1] > 200 && corner.0[0] < 50, "no padding in crop mode, got {corner:?}");
    }

    #[test]
    fn test_render_thumbnail_fits_box() {
        let source = red_source(640, 480);
        let thumbnail = unique_path("thumb", "jpg");

        ImageCrateResampler::default()
            .render_thumbnail(&source, &thumbnail)
            .unwrap();
        let (w, h) = image::image_dimensions(&thumbnail).unwrap();
        assert!(w <= 160 && h <= 120);

        let _ = std::fs::remove_file(&source);
        let _ = std::fs::remove_file(&thumbnail);
    }

    #[test]
    fn test_non_image_fails() {
        let path = unique_path("text", "txt");
        std::fs::write(&path, b"not an image").unwrap();
        let output = unique_path("never", "jpg");
        let plan = ResizePlan {
            target_width: 10,
            target_height: 10,
            mode: ResolvedFit::Crop,
        };

        let result = ImageCrateResampler::default().resample(&path, &output, &plan);
        assert!(matches!(result, Err(ImageError::ImageProcessing(_))));

        let _ = std::fs::remove_file(&path);
    }
}
