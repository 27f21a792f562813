use crate::error::EditorError;
use base64::Engine;
use image::RgbaImage;
use std::fmt;
use std::path::PathBuf;

/// Where an image comes from. All variants decode the same way.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    File(PathBuf),
    Url(String),
    DataUri(String),
}

impl ImageSource {
    /// Classifies a catalog reference or user-supplied string.
    pub fn parse(reference: &str) -> Self {
        let trimmed = reference.trim();
        if trimmed.starts_with("data:") {
            ImageSource::DataUri(trimmed.to_string())
        } else if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            ImageSource::Url(trimmed.to_string())
        } else {
            let path = trimmed.strip_prefix("file://").unwrap_or(trimmed);
            ImageSource::File(PathBuf::from(path))
        }
    }

    /// Fetches the bytes and decodes them into an RGBA raster.
    pub fn decode(&self) -> Result<RgbaImage, EditorError> {
        let bytes = self.read_bytes()?;
        let image = image::load_from_memory(&bytes).map_err(|error| EditorError::ImageDecode {
            origin: self.to_string(),
            error,
        })?;
        Ok(image.to_rgba8())
    }

    fn read_bytes(&self) -> Result<Vec<u8>, EditorError> {
        match self {
            ImageSource::File(path) => std::fs::read(path).map_err(|error| EditorError::Io {
                path: path.clone(),
                error,
            }),
            ImageSource::Url(url) => fetch(url),
            ImageSource::DataUri(uri) => decode_data_uri(uri),
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::File(path) => write!(f, "{}", path.display()),
            ImageSource::Url(url) => f.write_str(url),
            // Payloads can be megabytes long
            ImageSource::DataUri(uri) => {
                let header = uri.split(',').next().unwrap_or("data:");
                write!(f, "{header},…")
            }
        }
    }
}

fn fetch(url: &str) -> Result<Vec<u8>, EditorError> {
    let to_err = |error: reqwest::Error| EditorError::Fetch {
        url: url.to_string(),
        error,
    };
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(to_err)?;
    let bytes = response.bytes().map_err(to_err)?;
    Ok(bytes.to_vec())
}

/// Decodes `data:[<mediatype>];base64,<payload>`. Plain percent-encoded
/// payloads are not raster images and are rejected.
fn decode_data_uri(uri: &str) -> Result<Vec<u8>, EditorError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| EditorError::DataUri("missing data: prefix".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| EditorError::DataUri("missing ',' separator".to_string()))?;
    if !header.split(';').any(|part| part.eq_ignore_ascii_case("base64")) {
        return Err(EditorError::DataUri(format!(
            "payload of '{header}' is not base64 encoded"
        )));
    }
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| EditorError::DataUri(e.to_string()))
}
