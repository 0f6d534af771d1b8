//! WAV format tag patch
//!
//! Some WAVs (bandcamp downloads, ffmpeg output above 16 bit) declare
//! `WAVE_FORMAT_EXTENSIBLE` in the fmt chunk, which older Pioneer players
//! refuse. Rewriting the tag to plain PCM makes them playable.
//!
//! Canonical header layout:
//! - Bytes 0-3: "RIFF"
//! - Bytes 8-11: "WAVE"
//! - Bytes 12-15: "fmt "
//! - Bytes 20-21: format tag (u16 LE)

use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom};
use std::path::Path;

use binrw::{BinReaderExt, BinWriterExt};
use tracing::info;

use crate::error::Result;

pub const FORMAT_TAG_OFFSET: u64 = 20;
pub const WAVE_FORMAT_PCM: u16 = 0x0001;
pub const WAVE_FORMAT_EXTENSIBLE: u16 = 0xFFFE;

/// Read the format tag, `None` if the file is too short to carry one
pub fn read_format_tag<P: AsRef<Path>>(path: P) -> Result<Option<u16>> {
    let mut file = File::open(path)?;
    read_tag(&mut file)
}

/// Patch `WAVE_FORMAT_EXTENSIBLE` to `WAVE_FORMAT_PCM` in place.
///
/// Only the two tag bytes are touched. Returns whether a patch happened.
pub fn fix_wav_header<P: AsRef<Path>>(path: P) -> Result<bool> {
    let path = path.as_ref();
    let mut file = OpenOptions::new().read(true).write(true).open(path)?;

    if read_tag(&mut file)? != Some(WAVE_FORMAT_EXTENSIBLE) {
        return Ok(false);
    }

    info!("Found incompatible wav-header, fixing wav-header: {:?}", path);
    file.seek(SeekFrom::Start(FORMAT_TAG_OFFSET))?;
    file.write_le(&WAVE_FORMAT_PCM)?;
    Ok(true)
}

fn read_tag(file: &mut File) -> Result<Option<u16>> {
    if file.metadata()?.len() < FORMAT_TAG_OFFSET + 2 {
        return Ok(None);
    }
    file.seek(SeekFrom::Start(FORMAT_TAG_OFFSET))?;
    Ok(Some(file.read_le()?))
}
