//! Container inspection for WAV and AIFF/AIFC sources
//!
//! Only the container header is read through Symphonia's format readers;
//! no decoder is built and no audio is decoded.
//!
//! Pioneer players top out at 48 kHz, and some models reject anything
//! that is not plain 16/24-bit little-endian PCM WAV. Files outside that
//! envelope get a parameter set for the encoder.

use std::fs::File;
use std::path::Path;

use serde::Serialize;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::default::formats::{AiffReader, WavReader};
use tracing::{info, warn};

use crate::error::{Error, Result};

/// Highest sample rate passed through unchanged
pub const MAX_SAMPLE_RATE: u32 = 48_000;
/// Bit depth from which the codec is forced to `pcm_s24le`
pub const FORCE_PCM_BIT_DEPTH: u32 = 24;
const DEFAULT_BIT_DEPTH: u32 = 16;

/// Containers the inspector can read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Wav,
    Aiff,
}

impl Container {
    pub fn name(self) -> &'static str {
        match self {
            Container::Wav => "WAV",
            Container::Aiff => "AIFF",
        }
    }
}

/// Header facts relevant to playback compatibility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    pub sample_rate: u32,
    pub bits_per_sample: u32,
}

impl AudioFormat {
    /// Encoder flags bringing this format into range, empty if none are needed.
    ///
    /// The rules are independent: `-ar 48000` first, then `-c:a pcm_s24le`.
    pub fn reencode_params(&self) -> ReencodeParams {
        let mut params = ReencodeParams::default();
        if self.sample_rate > MAX_SAMPLE_RATE {
            params.push("-ar", MAX_SAMPLE_RATE.to_string());
        }
        if self.bits_per_sample >= FORCE_PCM_BIT_DEPTH {
            params.push("-c:a", "pcm_s24le");
        }
        params
    }
}

/// Ordered encoder override flags. Empty means "no re-encode needed".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReencodeParams(Vec<String>);

impl ReencodeParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, flag: impl Into<String>, value: impl Into<String>) {
        self.0.push(flag.into());
        self.0.push(value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_args(&self) -> &[String] {
        &self.0
    }
}

impl std::fmt::Display for ReencodeParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.0.join(" "))
    }
}

/// Read sample rate and bit depth from the container header.
///
/// The file must parse as the given container; a `.wav` holding anything
/// else is an error rather than a guess.
pub fn read_format(path: &Path, container: Container) -> Result<AudioFormat> {
    let probe_error = |reason: String| Error::AudioProbe {
        path: path.to_path_buf(),
        container: container.name(),
        reason,
    };

    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());
    let options = FormatOptions::default();

    let reader: Box<dyn FormatReader> = match container {
        Container::Wav => Box::new(
            WavReader::try_new(mss, &options).map_err(|e| probe_error(e.to_string()))?,
        ),
        Container::Aiff => Box::new(
            AiffReader::try_new(mss, &options).map_err(|e| probe_error(e.to_string()))?,
        ),
    };

    let track = reader
        .default_track()
        .ok_or_else(|| probe_error("no audio track".into()))?;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| probe_error("unknown sample rate".into()))?;
    let bits_per_sample = track.codec_params.bits_per_sample.unwrap_or(DEFAULT_BIT_DEPTH);

    Ok(AudioFormat {
        sample_rate,
        bits_per_sample,
    })
}

/// Inspect a source and derive its re-encode parameters
pub fn inspect(path: &Path, container: Container) -> Result<ReencodeParams> {
    let format = read_format(path, container)?;

    if format.sample_rate > MAX_SAMPLE_RATE {
        warn!(
            "Unsupported {} format (sample rate is {}): {:?}",
            container.name(),
            format.sample_rate,
            path
        );
    }
    if format.bits_per_sample >= FORCE_PCM_BIT_DEPTH {
        info!("Bit depth of {} detected: {:?}", format.bits_per_sample, path);
    }

    Ok(format.reencode_params())
}

pub fn inspect_wav(path: &Path) -> Result<ReencodeParams> {
    inspect(path, Container::Wav)
}

pub fn inspect_aiff(path: &Path) -> Result<ReencodeParams> {
    inspect(path, Container::Aiff)
}
