//! Playlist export
//!
//! Writes one directory per playlist under the output root:
//! - `<root>/<playlist>/00_<filename>`
//! - `<root>/<playlist>/01_<filename>`
//!
//! Per track, in export order:
//! 1. Skip if `<index>_<stem>.*` already exists (export is resumable)
//! 2. FLAC: convert to WAV, convert again if the WAV is out of range
//! 3. WAV: re-encode if out of range, else copy and fix the header
//! 4. AIFF: re-encode if out of range, else copy
//! 5. Anything else: copy
//!
//! The format is chosen by extension only; content is never sniffed.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};
use walkdir::WalkDir;

use crate::collection;
use crate::config::ExportConfig;
use crate::document::{ExportDocument, Playlist, TrackKey};
use crate::encoder::{convert_to_wav, Encoder};
use crate::error::{Error, Result};
use crate::header::fix_wav_header;
use crate::inspect::{self, Container, ReencodeParams};
use crate::path::local_source;
use crate::report::{ExportReport, TrackOutcome, TrackReport};

/// Source handling class, by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Flac,
    Wav,
    Aiff,
    Other,
}

impl SourceKind {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "flac" => SourceKind::Flac,
            "wav" => SourceKind::Wav,
            "aif" | "aiff" => SourceKind::Aiff,
            _ => SourceKind::Other,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(SourceKind::Other)
    }
}

/// Exports playlists of one document under one configuration
pub struct PlaylistExporter<'a> {
    doc: &'a ExportDocument,
    config: &'a ExportConfig,
    encoder: &'a dyn Encoder,
}

impl<'a> PlaylistExporter<'a> {
    pub fn new(doc: &'a ExportDocument, config: &'a ExportConfig, encoder: &'a dyn Encoder) -> Self {
        Self {
            doc,
            config,
            encoder,
        }
    }

    /// Output directory of a playlist.
    ///
    /// Path separators and the names `""`, `.` and `..` are replaced so
    /// every playlist maps to exactly one directory below the root.
    pub fn playlist_dir(&self, playlist: &Playlist) -> PathBuf {
        self.config.output_root.join(dir_name(&playlist.name))
    }

    /// Export every entry of `playlist`.
    ///
    /// Per-track failures are logged and reported; only a failure to create
    /// the playlist directory aborts.
    pub fn export(&self, playlist: &Playlist) -> Result<ExportReport> {
        info!("Searching: {}", playlist.name);
        let directory = self.playlist_dir(playlist);
        info!("Playlist DIR: {:?}", directory);

        let mut dir_ready = false;
        let mut tracks = Vec::with_capacity(playlist.entries.len());

        for (index, key) in playlist.entries.iter().enumerate() {
            tracks.push(self.export_track(index, key, &directory, &mut dir_ready)?);
        }

        let report = ExportReport {
            playlist: playlist.name.clone(),
            directory,
            tracks,
        };
        info!("{}: {}", playlist.name, report.summary());
        Ok(report)
    }

    /// Export several playlists; one that cannot be exported is logged and
    /// left out of the result.
    pub fn export_all(&self, playlists: &[&Playlist]) -> Vec<ExportReport> {
        playlists
            .iter()
            .filter_map(|p| match self.export(p) {
                Ok(report) => Some(report),
                Err(e) => {
                    error!("Cannot export playlist {}: {}", p.name, e);
                    None
                }
            })
            .collect()
    }

    fn export_track(
        &self,
        index: usize,
        key: &TrackKey,
        directory: &Path,
        dir_ready: &mut bool,
    ) -> Result<TrackReport> {
        let mut report = TrackReport {
            index,
            key: key.to_string(),
            source: None,
            target: None,
            outcome: TrackOutcome::Unresolved,
        };

        let Some(track) = collection::resolve(self.doc, key) else {
            warn!("{} not found in collection, skipping entry {:02}", key, index);
            return Ok(report);
        };

        let source = local_source(&track, self.config.prefix.as_deref());
        let target = directory.join(format!("{:02}_{}", index, track.filename));
        report.source = Some(source.clone());
        report.target = Some(target.clone());

        match find_existing(directory, &target) {
            Ok(Some(existing)) => {
                info!("{:?} already exists", target);
                report.outcome = TrackOutcome::AlreadyExists { existing };
                return Ok(report);
            }
            Ok(None) => {}
            Err(e) => {
                error!("Cannot scan {:?}: {}", directory, e);
                report.outcome = TrackOutcome::Failed {
                    reason: e.to_string(),
                };
                return Ok(report);
            }
        }

        if !*dir_ready {
            fs::create_dir_all(directory).map_err(|reason| Error::CreateDir {
                path: directory.to_path_buf(),
                reason,
            })?;
            *dir_ready = true;
        }

        report.outcome = match self.write_track(&source, &target) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Failed to export {:?}: {}", source, e);
                TrackOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };
        if let TrackOutcome::Converted { .. } = report.outcome {
            report.target = Some(target.with_extension("wav"));
        }

        Ok(report)
    }

    fn write_track(&self, source: &Path, target: &Path) -> Result<TrackOutcome> {
        match SourceKind::from_path(source) {
            SourceKind::Flac if self.config.flac_to_wav => {
                let wav = convert_to_wav(self.encoder, source, target, &ReencodeParams::new())?;
                let params = self.reencode_params(&wav, Container::Wav)?;
                if params.is_empty() {
                    return Ok(TrackOutcome::Converted { passes: 1 });
                }
                convert_to_wav(self.encoder, source, target, &params)?;
                Ok(TrackOutcome::Converted { passes: 2 })
            }
            SourceKind::Wav => {
                let params = self.reencode_params(source, Container::Wav)?;
                if !params.is_empty() {
                    convert_to_wav(self.encoder, source, target, &params)?;
                    return Ok(TrackOutcome::Converted { passes: 1 });
                }
                copy_file(source, target)?;
                let header_fixed = fix_wav_header(target)?;
                Ok(TrackOutcome::Copied { header_fixed })
            }
            SourceKind::Aiff => {
                let params = self.reencode_params(source, Container::Aiff)?;
                if !params.is_empty() {
                    convert_to_wav(self.encoder, source, target, &params)?;
                    return Ok(TrackOutcome::Converted { passes: 1 });
                }
                copy_file(source, target)?;
                Ok(TrackOutcome::Copied {
                    header_fixed: false,
                })
            }
            SourceKind::Flac | SourceKind::Other => {
                copy_file(source, target)?;
                Ok(TrackOutcome::Copied {
                    header_fixed: false,
                })
            }
        }
    }

    fn reencode_params(&self, path: &Path, container: Container) -> Result<ReencodeParams> {
        if !self.config.reencode {
            return Ok(ReencodeParams::new());
        }
        inspect::inspect(path, container)
    }
}

fn dir_name(playlist_name: &str) -> String {
    let name = playlist_name.replace(|c: char| c == '/' || c == '\\', "_");
    match name.as_str() {
        "" => "_".to_string(),
        "." | ".." => name.replace('.', "_"),
        _ => name,
    }
}

fn copy_file(source: &Path, target: &Path) -> Result<()> {
    fs::copy(source, target).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("copy {:?} -> {:?}: {}", source, target, e),
        ))
    })?;
    Ok(())
}

/// First file in `directory` named `<stem of target>.<anything>`
pub fn find_existing(directory: &Path, target: &Path) -> Result<Option<PathBuf>> {
    if !directory.is_dir() {
        return Ok(None);
    }
    let Some(stem) = target.file_stem() else {
        return Ok(None);
    };
    let pattern = format!("{}.", stem.to_string_lossy());

    for entry in WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_name().to_string_lossy().starts_with(&pattern) {
            return Ok(Some(entry.into_path()));
        }
    }
    Ok(None)
}
