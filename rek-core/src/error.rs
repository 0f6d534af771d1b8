//! Error types for rek-core

use std::path::PathBuf;

use thiserror::Error;

// Wrapped errors are rendered into the message rather than exposed as
// `source()`, so `{:#}` chains print each cause once.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(std::io::Error),

    #[error("Cannot create directory {path:?}: {reason}")]
    CreateDir {
        path: PathBuf,
        reason: std::io::Error,
    },

    #[error("XML parse error: {0}")]
    Xml(roxmltree::Error),

    #[error("Invalid export document: {0}")]
    Document(String),

    #[error("Cannot read {path:?} as {container}: {reason}")]
    AudioProbe {
        path: PathBuf,
        container: &'static str,
        reason: String,
    },

    #[error("Binary format error: {0}")]
    BinRw(String),

    #[error("Encoder error: {0}")]
    Encoder(String),

    #[error("Encoder not available: {0}")]
    EncoderMissing(String),

    #[error("Playlist not found: {0}")]
    PlaylistNotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<roxmltree::Error> for Error {
    fn from(e: roxmltree::Error) -> Self {
        Error::Xml(e)
    }
}

impl From<binrw::Error> for Error {
    fn from(e: binrw::Error) -> Self {
        Error::BinRw(e.to_string())
    }
}
