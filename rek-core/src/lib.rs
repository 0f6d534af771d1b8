//! rek-core: export Rekordbox playlists to plain directories
//!
//! This crate turns a Rekordbox XML export into per-playlist folders of
//! audio files that Pioneer players accept:
//! - playlist and collection lookup in the XML export
//! - translation of the exporting machine's paths to local ones
//! - WAV/AIFF header inspection (sample rate, bit depth)
//! - in-place fix of the WAV extensible format tag
//! - conversion through an external encoder (ffmpeg)

pub mod collection;
pub mod config;
pub mod document;
pub mod encoder;
pub mod error;
pub mod exporter;
pub mod header;
pub mod inspect;
pub mod path;
pub mod report;

pub use config::ExportConfig;
pub use document::{ExportDocument, Playlist, TrackKey};
pub use encoder::{Encoder, Ffmpeg};
pub use error::{Error, Result};
pub use exporter::PlaylistExporter;
pub use inspect::ReencodeParams;
pub use report::{ExportReport, ExportSummary, TrackOutcome};
