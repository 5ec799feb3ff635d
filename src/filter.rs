use crate::pixel_set::Pixel;

pub const DEFAULT_BLACK_MAX_LIGHTNESS: f32 = 0.05;
pub const DEFAULT_WHITE_MIN_LIGHTNESS: f32 = 0.95;

/// A trait used to implement pixel filters for the clustering process.
///
/// Filters run once over the decoded pixels before clustering; rejected pixels neither seed
/// nor join any cluster. No filter is installed by default.
///
/// See [`crate::PaletteBuilder::add_filter`] on how to add filters.
pub trait Filter {
    /// Return whether a given color should be allowed or not. The same color is given in both sRGB
    /// and HSL for convenience.
    fn is_allowed(&self, rgb: Pixel, hsl: (f32, f32, f32)) -> bool;
}

/// Rejects colors very close to black and colors very close to white, judged by HSL lightness.
///
/// Useful for product photos where a plain background would otherwise claim a palette slot.
#[derive(Debug, Clone, Copy)]
pub struct ExtremeLightnessFilter {
    black_max_lightness: f32,
    white_min_lightness: f32,
}

impl ExtremeLightnessFilter {
    pub fn new(black_max_lightness: f32, white_min_lightness: f32) -> Self {
        Self {
            black_max_lightness,
            white_min_lightness,
        }
    }
}

impl Default for ExtremeLightnessFilter {
    fn default() -> Self {
        Self::new(DEFAULT_BLACK_MAX_LIGHTNESS, DEFAULT_WHITE_MIN_LIGHTNESS)
    }
}

impl Filter for ExtremeLightnessFilter {
    fn is_allowed(&self, _: Pixel, (_, _, l): (f32, f32, f32)) -> bool {
        l > self.black_max_lightness && l < self.white_min_lightness
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed(filter: &dyn Filter, rgb: Pixel) -> bool {
        filter.is_allowed(rgb, crate::rgb_to_hsl(rgb))
    }

    #[test]
    fn test_extreme_lightness_filter() {
        let filter = ExtremeLightnessFilter::default();

        assert!(!allowed(&filter, (0, 0, 0)));
        assert!(!allowed(&filter, (255, 255, 255)));
        assert!(!allowed(&filter, (5, 5, 5)));
        assert!(allowed(&filter, (255, 0, 0)));
        assert!(allowed(&filter, (128, 128, 128)));
    }

    #[test]
    fn test_custom_thresholds() {
        let filter = ExtremeLightnessFilter::new(0.6, 1.0);

        assert!(!allowed(&filter, (128, 128, 128)));
        assert!(allowed(&filter, (220, 220, 220)));
    }
}
