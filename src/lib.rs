// Copyright 2022 Spanfile
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A library to extract the dominant colors of an image.
//!
//! The image is decoded into a flat list of RGB pixels which are then reduced to `k`
//! representative colors with Lloyd's k-means. Results are deterministic: centroids are seeded
//! from the first `k` pixels in scan order by default, and a fixed number of iterations runs.
//!
//! ```rust,no_run
//! let colors = dominance::extract_dominant_colors("jacket.jpg", 3)?;
//! println!("{}", colors.join(" "));
//! # Ok::<(), dominance::ExtractError>(())
//! ```
//!
//! The decoding step can be swapped out through the [`Decoder`] trait, and the clustering can be
//! tuned through [`PaletteBuilder`].

#[cfg(feature = "serde")]
pub mod config;
mod decoder;
mod error;
mod filter;
mod kmeans;
mod pixel_set;
mod seeding;
mod source;
mod swatch;

pub const DEFAULT_PALETTE_SIZE: usize = 3;
pub const DEFAULT_MAX_ITERATIONS: usize = 10;
pub const DEFAULT_RESIZE_IMAGE_AREA: u32 = 0;

pub use crate::{
    decoder::{Decoder, ImageDecoder, DEFAULT_FETCH_TIMEOUT},
    error::{ExtractError, Result},
    filter::{ExtremeLightnessFilter, Filter},
    pixel_set::{Pixel, PixelSet},
    seeding::{Seeding, DEFAULT_SEED},
    source::ImageSource,
    swatch::{to_hex, Swatch},
};
pub use image;
pub use palette;

use kmeans::KMeansQuantizer;
use log::debug;
use palette::IntoColor;

/// Extracts `k` dominant colors from an image as lowercase `#rrggbb` strings.
///
/// The image is decoded with the default [`ImageDecoder`] and clustered with the default
/// [`PaletteBuilder`] settings. Colors come back in cluster order and may repeat when the image
/// has fewer distinct colors than `k`.
///
/// # Errors
///
/// Returns [`ExtractError::InvalidArgument`] when `k` is zero, before the image is touched, and
/// [`ExtractError::Decode`] when the image cannot be read or has no pixels.
pub fn extract_dominant_colors(source: impl Into<ImageSource>, k: usize) -> Result<Vec<String>> {
    extract_dominant_colors_with(&ImageDecoder::default(), source, k)
}

/// Same as [`extract_dominant_colors`], decoding through the given decoder.
pub fn extract_dominant_colors_with<D>(decoder: &D, source: impl Into<ImageSource>, k: usize) -> Result<Vec<String>>
where
    D: Decoder + ?Sized,
{
    let palette = PaletteBuilder::new().palette_size(k).extract(decoder, source)?;
    Ok(palette.hex_colors())
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Palette {
    swatches: Vec<Swatch>,
    iterations: usize,
}

pub struct PaletteBuilder {
    palette_size: usize,
    max_iterations: usize,
    convergence_threshold: Option<f32>,
    seeding: Seeding,
    filters: Vec<Box<dyn Filter>>,
}

impl Palette {
    /// Swatches in cluster index order.
    pub fn swatches(&self) -> &[Swatch] {
        &self.swatches
    }

    pub fn hex_colors(&self) -> Vec<String> {
        self.swatches.iter().map(|swatch| swatch.hex()).collect()
    }

    pub fn colors(&self) -> Vec<Pixel> {
        self.swatches.iter().map(|swatch| swatch.rgb()).collect()
    }

    /// Number of k-means iterations that ran before the palette settled.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn len(&self) -> usize {
        self.swatches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.swatches.is_empty()
    }

    pub fn most_prominent_color(&self) -> Option<Pixel> {
        self.swatches
            .iter()
            .max_by_key(|swatch| swatch.population())
            .map(|swatch| swatch.rgb())
    }

    /// A copy of the palette with the most populated clusters first. Equal populations keep their
    /// cluster order.
    pub fn sorted_by_population(&self) -> Palette {
        let mut swatches = self.swatches.clone();
        swatches.sort_by(|a, b| b.population().cmp(&a.population()));

        Palette {
            swatches,
            iterations: self.iterations,
        }
    }
}

impl PaletteBuilder {
    pub fn new() -> Self {
        Self {
            palette_size: DEFAULT_PALETTE_SIZE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            convergence_threshold: None,
            seeding: Seeding::default(),
            filters: Vec::new(),
        }
    }

    /// Number of colors in the resulting palette.
    pub fn palette_size(self, palette_size: usize) -> Self {
        Self { palette_size, ..self }
    }

    /// Upper bound on the number of k-means iterations.
    pub fn max_iterations(self, max_iterations: usize) -> Self {
        Self { max_iterations, ..self }
    }

    /// Stop iterating once the centroids move less than `threshold` in total over one iteration.
    /// Without a threshold every one of the `max_iterations` iterations runs.
    pub fn convergence_threshold(self, threshold: f32) -> Self {
        Self {
            convergence_threshold: Some(threshold),
            ..self
        }
    }

    pub fn clear_convergence_threshold(self) -> Self {
        Self {
            convergence_threshold: None,
            ..self
        }
    }

    pub fn seeding(self, seeding: Seeding) -> Self {
        Self { seeding, ..self }
    }

    pub fn add_filter<F>(mut self, filter: F) -> Self
    where
        F: Filter + 'static,
    {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn clear_filters(self) -> Self {
        Self {
            filters: Vec::new(),
            ..self
        }
    }

    /// Checks the settings without touching any image.
    pub fn validate(&self) -> Result<()> {
        if self.palette_size < 1 {
            return Err(ExtractError::invalid("palette_size", self.palette_size));
        }

        if self.max_iterations < 1 {
            return Err(ExtractError::invalid("max_iterations", self.max_iterations));
        }

        if let Some(threshold) = self.convergence_threshold {
            if threshold.is_nan() || threshold < 0.0 {
                return Err(ExtractError::invalid("convergence_threshold", threshold));
            }
        }

        Ok(())
    }

    /// Decodes `source` with `decoder` and clusters its pixels. The settings are validated before
    /// the decoder is invoked.
    pub fn extract<D>(&self, decoder: &D, source: impl Into<ImageSource>) -> Result<Palette>
    where
        D: Decoder + ?Sized,
    {
        self.validate()?;

        let source = source.into();
        let pixels = decoder.decode(&source)?;

        self.generate(&pixels)
    }

    pub fn generate(&self, pixels: &PixelSet) -> Result<Palette> {
        self.validate()?;

        let filtered;
        let eligible = if self.filters.is_empty() {
            pixels.pixels()
        } else {
            filtered = pixels
                .pixels()
                .iter()
                .copied()
                .filter(|&rgb| !self.should_ignore_color(rgb))
                .collect::<Vec<_>>();

            if filtered.is_empty() {
                return Err(ExtractError::NoEligiblePixels { total: pixels.len() });
            }

            filtered.as_slice()
        };

        let quantizer = KMeansQuantizer::new(
            eligible,
            self.palette_size,
            self.max_iterations,
            self.convergence_threshold,
            self.seeding,
        );
        let (swatches, iterations) = quantizer.get_clustered_colors();

        debug!("clustered {} pixels into {} colors in {} iterations", eligible.len(), swatches.len(), iterations);

        Ok(Palette { swatches, iterations })
    }

    fn should_ignore_color(&self, rgb: Pixel) -> bool {
        let hsl = rgb_to_hsl(rgb);
        self.filters.iter().any(|filter| !filter.is_allowed(rgb, hsl))
    }
}

impl Default for PaletteBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn rgb_to_hsl(rgb: Pixel) -> (f32, f32, f32) {
    let raw = palette::Srgb::from_components(rgb);
    let raw_float: palette::Srgb<f32> = raw.into_format();
    let hsl: palette::Hsl = raw_float.into_color();
    let (h, s, l) = hsl.into_components();

    (h.to_positive_degrees(), s, l)
}
