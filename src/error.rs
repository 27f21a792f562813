use std::path::PathBuf;

/// Failures surfaced by the editor core. None of these are fatal: every one
/// degrades to "no visual change" plus, for loads, a failure notice.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("failed to decode image from {origin}: {error}")]
    ImageDecode {
        origin: String,
        #[source]
        error: image::ImageError,
    },
    #[error("failed to read {path}: {error}")]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },
    #[error("failed to fetch {url}: {error}")]
    Fetch {
        url: String,
        #[source]
        error: reqwest::Error,
    },
    #[error("malformed data URI: {0}")]
    DataUri(String),
    #[error("failed to write {path}: {error}")]
    Export {
        path: PathBuf,
        #[source]
        error: image::ImageError,
    },
}
