//! JSON configuration for palette extraction.
//!
//! Every field is optional in the file and falls back to the library default, so an empty
//! object `{}` describes the stock behaviour:
//!
//! ```json
//! {
//!   "palette_size": 5,
//!   "max_iterations": 20,
//!   "convergence_threshold": 0.5,
//!   "seeding": { "strategy": "k_means_plus_plus", "seed": 42 },
//!   "resize_area": 12544,
//!   "region": [0, 0, 64, 64],
//!   "filter_extremes": true,
//!   "fetch_timeout_secs": 10
//! }
//! ```

use crate::{
    error::{ExtractError, Result},
    ExtremeLightnessFilter, ImageDecoder, PaletteBuilder, Seeding, DEFAULT_FETCH_TIMEOUT, DEFAULT_MAX_ITERATIONS,
    DEFAULT_PALETTE_SIZE, DEFAULT_RESIZE_IMAGE_AREA,
};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Number of colors to extract
    pub palette_size: usize,

    /// Upper bound on k-means iterations
    pub max_iterations: usize,

    /// Stop early once total centroid movement drops to this value
    pub convergence_threshold: Option<f32>,

    /// Initial centroid selection
    pub seeding: Seeding,

    /// Scale images down to at most this many pixels (0 keeps the full image)
    pub resize_area: u32,

    /// Crop rectangle as (x, y, width, height)
    pub region: Option<(u32, u32, u32, u32)>,

    /// Drop near-black and near-white pixels before clustering
    pub filter_extremes: bool,

    /// Timeout for fetching remote images
    pub fetch_timeout_secs: u64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            palette_size: DEFAULT_PALETTE_SIZE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            convergence_threshold: None,
            seeding: Seeding::default(),
            resize_area: DEFAULT_RESIZE_IMAGE_AREA,
            region: None,
            filter_extremes: false,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT.as_secs(),
        }
    }
}

impl ExtractorConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ExtractError::config(format!("failed to read {}", path.display()), e))?;

        serde_json::from_str(&contents)
            .map_err(|e| ExtractError::config(format!("failed to parse {}", path.display()), e))
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ExtractError::config("failed to parse configuration", e))
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ExtractError::config("failed to serialize configuration", e))
    }

    pub fn palette_builder(&self) -> PaletteBuilder {
        let builder = PaletteBuilder::new()
            .palette_size(self.palette_size)
            .max_iterations(self.max_iterations)
            .seeding(self.seeding);

        let builder = match self.convergence_threshold {
            Some(threshold) => builder.convergence_threshold(threshold),
            None => builder,
        };

        if self.filter_extremes {
            builder.add_filter(ExtremeLightnessFilter::default())
        } else {
            builder
        }
    }

    pub fn decoder(&self) -> ImageDecoder {
        let decoder = ImageDecoder::new()
            .resize_image_area(self.resize_area)
            .fetch_timeout(Duration::from_secs(self.fetch_timeout_secs));

        match self.region {
            Some((x, y, width, height)) => decoder.region(x, y, width, height),
            None => decoder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(ExtractorConfig::from_json_str("{}").unwrap(), ExtractorConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let config = ExtractorConfig::from_json_str(
            r#"{ "palette_size": 5, "seeding": { "strategy": "k_means_plus_plus", "seed": 42 }, "region": [1, 2, 3, 4] }"#,
        )
        .unwrap();

        assert_eq!(config.palette_size, 5);
        assert_eq!(config.seeding, Seeding::KMeansPlusPlus { seed: 42 });
        assert_eq!(config.region, Some((1, 2, 3, 4)));
        assert_eq!(config.max_iterations, DEFAULT_MAX_ITERATIONS);
    }

    #[test]
    fn test_json_round_trip() {
        let config = ExtractorConfig {
            convergence_threshold: Some(0.5),
            seeding: Seeding::RandomSample { seed: 3 },
            filter_extremes: true,
            ..ExtractorConfig::default()
        };

        let json = config.to_json_string().unwrap();
        assert_eq!(ExtractorConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_json() {
        let err = ExtractorConfig::from_json_str("{ \"palette_size\": -1 }").unwrap_err();
        assert!(matches!(err, ExtractError::Config { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = ExtractorConfig::from_json_file(Path::new("no/such/config.json")).unwrap_err();
        assert!(matches!(err, ExtractError::Config { .. }));
    }

    #[test]
    fn test_builder_carries_settings() {
        let config = ExtractorConfig {
            palette_size: 0,
            ..ExtractorConfig::default()
        };

        assert!(config.palette_builder().validate().unwrap_err().is_invalid_argument());
        assert!(ExtractorConfig::default().palette_builder().validate().is_ok());
    }
}
