//! Export configuration
//!
//! One immutable value per run, handed to the exporter instead of
//! process-wide argument state.

use std::path::PathBuf;

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ExportConfig {
    /// Root directory; each playlist gets a subdirectory named after it
    pub output_root: PathBuf,
    /// Replaces the drive of foreign (Windows) source paths
    pub prefix: Option<PathBuf>,
    /// Convert FLAC sources to WAV
    pub flac_to_wav: bool,
    /// Re-encode files above 48 kHz or at 24 bit and deeper
    pub reencode: bool,
}

impl ExportConfig {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
            prefix: None,
            flac_to_wav: true,
            reencode: true,
        }
    }

    /// An empty prefix means "no substitution".
    pub fn with_prefix(mut self, prefix: impl Into<PathBuf>) -> Self {
        let prefix = prefix.into();
        self.prefix = if prefix.as_os_str().is_empty() {
            None
        } else {
            Some(prefix)
        };
        self
    }

    pub fn with_flac_to_wav(mut self, enabled: bool) -> Self {
        self.flac_to_wav = enabled;
        self
    }

    pub fn with_reencode(mut self, enabled: bool) -> Self {
        self.reencode = enabled;
        self
    }

    /// Whether any export under this configuration can reach the encoder.
    pub fn needs_encoder(&self) -> bool {
        self.flac_to_wav || self.reencode
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self::new(".")
    }
}
