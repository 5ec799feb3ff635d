//! Error types for the dominance library

use thiserror::Error;

/// Result type alias for dominance operations
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors raised while decoding an image or extracting its palette
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Image could not be read, fetched or decoded, or it decoded to zero pixels
    #[error("Failed to decode image: {message}")]
    Decode {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Invalid input parameters, reported before any decoding work starts
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidArgument { parameter: String, value: String },

    /// The configured filters rejected every pixel of the image
    #[error("No pixels left to cluster after filtering {total} pixels")]
    NoEligiblePixels { total: usize },

    /// Configuration file could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ExtractError {
    /// Create a decode error with the underlying cause attached
    pub fn decode<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Decode {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a decode error that has no underlying cause
    pub fn decode_msg(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
            source: None,
        }
    }

    pub fn invalid(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidArgument {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    #[cfg(feature = "serde")]
    pub(crate) fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether the error stems from the image itself rather than from caller input
    pub fn is_decode(&self) -> bool {
        matches!(self, ExtractError::Decode { .. })
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, ExtractError::InvalidArgument { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_invalid_argument_message() {
        let err = ExtractError::invalid("palette_size", 0);

        assert!(err.is_invalid_argument());
        assert_eq!(err.to_string(), "Invalid parameter: palette_size = 0");
    }

    #[test]
    fn test_decode_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.png");
        let err = ExtractError::decode("could not open missing.png", io);

        assert!(err.is_decode());
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "Failed to decode image: could not open missing.png");
    }

    #[test]
    fn test_decode_msg_has_no_source() {
        let err = ExtractError::decode_msg("image has no pixels");

        assert!(err.is_decode());
        assert!(err.source().is_none());
    }
}
