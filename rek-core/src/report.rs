//! Per-playlist export results

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// What happened to one playlist entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrackOutcome {
    /// A file with the same base name was already present
    AlreadyExists { existing: PathBuf },
    /// Plain copy; WAV copies report whether the header was patched
    Copied { header_fixed: bool },
    /// Written by the encoder, once or twice (FLAC that needed a re-encode)
    Converted { passes: u8 },
    /// The key has no collection entry
    Unresolved,
    Failed { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackReport {
    /// Zero-based position in the playlist, also the filename prefix
    pub index: usize,
    pub key: String,
    pub source: Option<PathBuf>,
    pub target: Option<PathBuf>,
    pub outcome: TrackOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub playlist: String,
    pub directory: PathBuf,
    pub tracks: Vec<TrackReport>,
}

impl ExportReport {
    pub fn summary(&self) -> ExportSummary {
        let mut summary = ExportSummary {
            total: self.tracks.len(),
            ..Default::default()
        };

        for track in &self.tracks {
            match track.outcome {
                TrackOutcome::AlreadyExists { .. } => summary.skipped += 1,
                TrackOutcome::Copied { header_fixed } => {
                    summary.copied += 1;
                    if header_fixed {
                        summary.headers_fixed += 1;
                    }
                }
                TrackOutcome::Converted { .. } => summary.converted += 1,
                TrackOutcome::Unresolved => summary.unresolved += 1,
                TrackOutcome::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    pub total: usize,
    pub skipped: usize,
    pub copied: usize,
    pub converted: usize,
    pub headers_fixed: usize,
    pub unresolved: usize,
    pub failed: usize,
}

impl fmt::Display for ExportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tracks: {} copied ({} headers fixed), {} converted, {} already existed, {} unresolved, {} failed",
            self.total,
            self.copied,
            self.headers_fixed,
            self.converted,
            self.skipped,
            self.unresolved,
            self.failed
        )
    }
}
