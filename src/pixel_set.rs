use crate::error::{ExtractError, Result};
use image::{DynamicImage, RgbImage};
use std::collections::HashSet;

/// A single color as (red, green, blue). Alpha is never carried.
pub type Pixel = (u8, u8, u8);

/// The decoded pixels of one image in row-major order.
///
/// A `PixelSet` is never empty; every constructor rejects zero-pixel input with a decode error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelSet {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
}

impl PixelSet {
    pub fn new(width: u32, height: u32, pixels: Vec<Pixel>) -> Result<Self> {
        let expected = width as usize * height as usize;

        if pixels.len() != expected {
            return Err(ExtractError::decode_msg(format!(
                "{}x{} image should have {} pixels, got {}",
                width,
                height,
                expected,
                pixels.len()
            )));
        }

        if pixels.is_empty() {
            return Err(ExtractError::decode_msg(format!("{}x{} image has no pixels", width, height)));
        }

        Ok(Self { width, height, pixels })
    }

    pub fn from_rgb_image(image: &RgbImage) -> Result<Self> {
        let pixels = image.pixels().map(|p| (p.0[0], p.0[1], p.0[2])).collect();
        Self::new(image.width(), image.height(), pixels)
    }

    /// Converts any decoded image to RGB8, dropping the alpha channel if present.
    pub fn from_dynamic_image(image: &DynamicImage) -> Result<Self> {
        Self::from_rgb_image(&image.to_rgb8())
    }

    /// Builds a pixel set from a packed RGB8 buffer.
    pub fn from_rgb_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        Self::from_packed(width, height, bytes, 3)
    }

    /// Builds a pixel set from a packed RGBA8 buffer, such as canvas image data. Alpha is ignored.
    pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        Self::from_packed(width, height, bytes, 4)
    }

    fn from_packed(width: u32, height: u32, bytes: &[u8], stride: usize) -> Result<Self> {
        if bytes.len() % stride != 0 {
            return Err(ExtractError::decode_msg(format!(
                "buffer of {} bytes is not a whole number of {}-byte pixels",
                bytes.len(),
                stride
            )));
        }

        let pixels = bytes.chunks_exact(stride).map(|c| (c[0], c[1], c[2])).collect();
        Self::new(width, height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Always false; kept alongside `len` for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn distinct_colors(&self) -> usize {
        self.pixels.iter().collect::<HashSet<_>>().len()
    }
}
