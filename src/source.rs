use crate::error::{ExtractError, Result};
use base64::Engine;
use image::DynamicImage;
use log::debug;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A reference to an image that can be turned into pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// An image file on disk.
    Path(PathBuf),
    /// An encoded image held in memory (PNG, JPEG, ...).
    Bytes(Vec<u8>),
    /// A `file://`, `data:` or `http(s)://` URL.
    Url(String),
}

const URL_PREFIXES: [&str; 4] = ["http://", "https://", "file://", "data:"];

impl ImageSource {
    /// Reads and decodes the image. `timeout` bounds network fetches only.
    pub fn load(&self, timeout: Duration) -> Result<DynamicImage> {
        match self {
            ImageSource::Path(path) => load_path(path),
            ImageSource::Bytes(bytes) => load_bytes(bytes),
            ImageSource::Url(url) => load_url(url, timeout),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ImageSource::Path(path) => path.display().to_string(),
            ImageSource::Bytes(bytes) => format!("<{} bytes>", bytes.len()),
            ImageSource::Url(url) if url.starts_with("data:") => "<data url>".to_string(),
            ImageSource::Url(url) => url.clone(),
        }
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        ImageSource::Path(path)
    }
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        ImageSource::Path(path.to_path_buf())
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        ImageSource::Bytes(bytes)
    }
}

impl From<&[u8]> for ImageSource {
    fn from(bytes: &[u8]) -> Self {
        ImageSource::Bytes(bytes.to_vec())
    }
}

impl From<String> for ImageSource {
    fn from(reference: String) -> Self {
        let lower = reference.to_ascii_lowercase();
        if URL_PREFIXES.iter().any(|prefix| lower.starts_with(prefix)) {
            ImageSource::Url(reference)
        } else {
            ImageSource::Path(PathBuf::from(reference))
        }
    }
}

impl From<&str> for ImageSource {
    fn from(reference: &str) -> Self {
        ImageSource::from(reference.to_string())
    }
}

fn load_path(path: &Path) -> Result<DynamicImage> {
    debug!("decoding image file {}", path.display());

    let reader = image::io::Reader::open(path)
        .map_err(|e| ExtractError::decode(format!("failed to open image file: {}", path.display()), e))?
        .with_guessed_format()
        .map_err(|e| ExtractError::decode(format!("failed to read image file: {}", path.display()), e))?;

    reader
        .decode()
        .map_err(|e| ExtractError::decode(format!("failed to decode image: {}", path.display()), e))
}

fn load_bytes(bytes: &[u8]) -> Result<DynamicImage> {
    debug!("decoding {} bytes of image data", bytes.len());

    image::load_from_memory(bytes).map_err(|e| ExtractError::decode("failed to decode image data", e))
}

fn load_url(url: &str, timeout: Duration) -> Result<DynamicImage> {
    let lower = url.to_ascii_lowercase();

    if lower.starts_with("file://") {
        load_path(Path::new(&url["file://".len()..]))
    } else if lower.starts_with("data:") {
        load_bytes(&decode_data_url(url)?)
    } else if lower.starts_with("http://") || lower.starts_with("https://") {
        load_bytes(&fetch(url, timeout)?)
    } else {
        Err(ExtractError::decode_msg(format!("unsupported url scheme: {}", url)))
    }
}

fn decode_data_url(url: &str) -> Result<Vec<u8>> {
    // data:[<mediatype>][;base64],<payload>
    let (header, payload) = url["data:".len()..]
        .split_once(',')
        .ok_or_else(|| ExtractError::decode_msg("data url has no payload"))?;

    if !header.to_ascii_lowercase().ends_with(";base64") {
        return Err(ExtractError::decode_msg("only base64 encoded data urls are supported"));
    }

    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| ExtractError::decode("data url payload is not valid base64", e))
}

#[cfg(feature = "url")]
fn fetch(url: &str, timeout: Duration) -> Result<Vec<u8>> {
    debug!("fetching image from {} (timeout {:?})", url, timeout);

    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ExtractError::decode("could not build HTTP client", e))?;

    let response = client
        .get(url)
        .send()
        .map_err(|e| ExtractError::decode(format!("could not fetch {}", url), e))?
        .error_for_status()
        .map_err(|e| ExtractError::decode(format!("could not fetch {}", url), e))?;

    let bytes = response
        .bytes()
        .map_err(|e| ExtractError::decode(format!("could not read response body from {}", url), e))?;

    Ok(bytes.to_vec())
}

#[cfg(not(feature = "url"))]
fn fetch(url: &str, _timeout: Duration) -> Result<Vec<u8>> {
    Err(ExtractError::decode_msg(format!("fetching {} requires the `url` feature", url)))
}
