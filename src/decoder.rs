use crate::{
    error::{ExtractError, Result},
    pixel_set::PixelSet,
    source::ImageSource,
};
use image::{math::Rect, GenericImageView, RgbImage};
use log::debug;
use std::time::Duration;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Turns an image reference into the pixels to be clustered.
///
/// Any `Fn(&ImageSource) -> Result<PixelSet>` is a decoder as well, which makes it easy to feed
/// synthetic pixel sets to [`crate::PaletteBuilder::extract`].
pub trait Decoder {
    fn decode(&self, source: &ImageSource) -> Result<PixelSet>;
}

impl<F> Decoder for F
where
    F: Fn(&ImageSource) -> Result<PixelSet>,
{
    fn decode(&self, source: &ImageSource) -> Result<PixelSet> {
        self(source)
    }
}

/// Decoder backed by the `image` crate.
#[derive(Debug, Clone)]
pub struct ImageDecoder {
    resize_area: u32,
    region: Option<Rect>,
    fetch_timeout: Duration,
}

impl Default for ImageDecoder {
    fn default() -> Self {
        Self {
            resize_area: crate::DEFAULT_RESIZE_IMAGE_AREA,
            region: None,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

impl ImageDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scale images down so that their area is at most `resize_area` pixels. Zero disables scaling.
    pub fn resize_image_area(self, resize_area: u32) -> Self {
        Self { resize_area, ..self }
    }

    /// Only decode the given rectangle of the image. The region is applied before any scaling.
    pub fn region(self, x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            region: Some(Rect { x, y, width, height }),
            ..self
        }
    }

    pub fn clear_region(self) -> Self {
        Self { region: None, ..self }
    }

    pub fn fetch_timeout(self, fetch_timeout: Duration) -> Self {
        Self { fetch_timeout, ..self }
    }

    /// Checks the settings that do not depend on the image, so bad input fails before any I/O.
    pub fn validate(&self) -> Result<()> {
        if let Some(region) = self.region {
            if region.width == 0 || region.height == 0 {
                return Err(ExtractError::invalid("region", format!("empty {}x{} region", region.width, region.height)));
            }
        }

        Ok(())
    }

    /// Crops and scales an already decoded image into a pixel set.
    pub fn pixels_from_image(&self, image: RgbImage) -> Result<PixelSet> {
        self.validate()?;

        let (width, height) = image.dimensions();

        let cropped = match self.region {
            Some(region) => {
                let fits = region.x.checked_add(region.width).map_or(false, |right| right <= width)
                    && region.y.checked_add(region.height).map_or(false, |bottom| bottom <= height);

                if !fits {
                    return Err(ExtractError::invalid(
                        "region",
                        format!(
                            "{}x{}+{}+{} outside {}x{} image",
                            region.width, region.height, region.x, region.y, width, height
                        ),
                    ));
                }

                image.view(region.x, region.y, region.width, region.height).to_image()
            }
            None => image,
        };

        PixelSet::from_rgb_image(&self.scale_image_down(cropped))
    }

    fn scale_image_down(&self, image: RgbImage) -> RgbImage {
        let (width, height) = image.dimensions();
        let area = width as u64 * height as u64;

        let scale_ratio = if self.resize_area > 0 && area > self.resize_area as u64 {
            (self.resize_area as f64 / area as f64).sqrt()
        } else {
            return image;
        };

        // floor keeps the result within the requested area; never collapse a side to zero
        let new_width = ((width as f64 * scale_ratio).floor() as u32).max(1);
        let new_height = ((height as f64 * scale_ratio).floor() as u32).max(1);

        // a side clamped up to one pixel leaves the whole area to the other side
        let (new_width, new_height) = if new_height == 1 {
            (new_width.min(self.resize_area), 1)
        } else if new_width == 1 {
            (1, new_height.min(self.resize_area))
        } else {
            (new_width, new_height)
        };

        debug!("scaling {}x{} image down to {}x{}", width, height, new_width, new_height);

        image::imageops::resize(&image, new_width, new_height, image::imageops::FilterType::Nearest)
    }
}

impl Decoder for ImageDecoder {
    fn decode(&self, source: &ImageSource) -> Result<PixelSet> {
        self.validate()?;

        let image = source.load(self.fetch_timeout)?.to_rgb8();
        let pixels = self.pixels_from_image(image)?;

        debug!("decoded {} into {}x{} pixels", source.describe(), pixels.width(), pixels.height());

        Ok(pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn quadrants() -> RgbImage {
        RgbImage::from_fn(4, 4, |x, y| match (x < 2, y < 2) {
            (true, true) => Rgb([255, 0, 0]),
            (false, true) => Rgb([0, 255, 0]),
            (true, false) => Rgb([0, 0, 255]),
            (false, false) => Rgb([255, 255, 255]),
        })
    }

    #[test]
    fn test_no_resize_by_default() {
        let pixels = ImageDecoder::new().pixels_from_image(quadrants()).unwrap();
        assert_eq!((pixels.width(), pixels.height()), (4, 4));
    }

    #[test]
    fn test_resize_respects_area() {
        let image = RgbImage::from_pixel(100, 100, Rgb([1, 2, 3]));
        let pixels = ImageDecoder::new().resize_image_area(2500).pixels_from_image(image).unwrap();

        assert!(pixels.len() <= 2500);
        assert_eq!((pixels.width(), pixels.height()), (50, 50));
        assert!(pixels.pixels().iter().all(|&p| p == (1, 2, 3)));
    }

    #[test]
    fn test_resize_thin_images_respects_area() {
        let wide = RgbImage::from_pixel(10000, 1, Rgb([1, 2, 3]));
        let pixels = ImageDecoder::new().resize_image_area(100).pixels_from_image(wide).unwrap();
        assert_eq!((pixels.width(), pixels.height()), (100, 1));

        let tall = RgbImage::from_pixel(3, 5000, Rgb([1, 2, 3]));
        let pixels = ImageDecoder::new().resize_image_area(50).pixels_from_image(tall).unwrap();
        assert_eq!((pixels.width(), pixels.height()), (1, 50));
    }

    #[test]
    fn test_small_images_are_not_upscaled() {
        let pixels = ImageDecoder::new().resize_image_area(1000).pixels_from_image(quadrants()).unwrap();
        assert_eq!(pixels.len(), 16);
    }

    #[test]
    fn test_region() {
        let pixels = ImageDecoder::new().region(2, 0, 2, 2).pixels_from_image(quadrants()).unwrap();
        assert_eq!(pixels.len(), 4);
        assert!(pixels.pixels().iter().all(|&p| p == (0, 255, 0)));
    }

    #[test]
    fn test_region_out_of_bounds() {
        let err = ImageDecoder::new().region(3, 3, 2, 2).pixels_from_image(quadrants()).unwrap_err();
        assert!(err.is_invalid_argument());

        let err = ImageDecoder::new()
            .region(u32::MAX, 0, 2, 2)
            .pixels_from_image(quadrants())
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_empty_region_is_invalid_argument() {
        let err = ImageDecoder::new().region(0, 0, 0, 4).pixels_from_image(quadrants()).unwrap_err();
        assert!(err.is_invalid_argument());

        let err = ImageDecoder::new().region(1, 1, 2, 0).validate().unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_empty_region_fails_before_loading() {
        // the file does not exist, so a decode error would mean the source was read first
        let err = ImageDecoder::new()
            .region(0, 0, 0, 4)
            .decode(&ImageSource::from("definitely/not/here.png"))
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_closure_decoder() {
        let decoder = |_: &ImageSource| PixelSet::new(1, 1, vec![(9, 9, 9)]);
        let pixels = decoder.decode(&ImageSource::from("ignored.png")).unwrap();
        assert_eq!(pixels.pixels(), &[(9, 9, 9)]);
    }
}
