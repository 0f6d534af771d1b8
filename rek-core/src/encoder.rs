//! External encoder invocation
//!
//! Conversion shells out to ffmpeg and blocks until it exits:
//! `ffmpeg -y -i <input> [overrides...] <output>`

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::header::fix_wav_header;
use crate::inspect::ReencodeParams;

pub const DEFAULT_ENCODER: &str = "ffmpeg";

/// Something that turns `input` into a WAV at `output`, replacing any
/// file already there.
pub trait Encoder {
    fn encode(&self, input: &Path, output: &Path, params: &ReencodeParams) -> Result<()>;
}

/// ffmpeg on the execution path (or at an explicit location)
#[derive(Debug, Clone)]
pub struct Ffmpeg {
    program: PathBuf,
}

impl Ffmpeg {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Run `<program> -version` once, before any file work
    pub fn check_available(&self) -> Result<()> {
        let status = Command::new(&self.program)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| Error::EncoderMissing(format!("{:?}: {}", self.program, e)))?;

        if !status.success() {
            return Err(Error::EncoderMissing(format!(
                "{:?} -version exited with {}",
                self.program, status
            )));
        }
        Ok(())
    }

    /// Full argument list for one conversion
    pub fn command_args(input: &Path, output: &Path, params: &ReencodeParams) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-y".into(), "-i".into(), input.into()];
        args.extend(params.as_args().iter().map(OsString::from));
        args.push(output.into());
        args
    }
}

impl Default for Ffmpeg {
    fn default() -> Self {
        Self::new(DEFAULT_ENCODER)
    }
}

impl Encoder for Ffmpeg {
    fn encode(&self, input: &Path, output: &Path, params: &ReencodeParams) -> Result<()> {
        let args = Self::command_args(input, output, params);
        debug!("Running {:?} {:?}", self.program, args);

        let status = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .status()
            .map_err(|e| Error::Encoder(format!("cannot run {:?}: {}", self.program, e)))?;

        if !status.success() {
            return Err(Error::Encoder(format!(
                "{:?} failed on {:?} ({})",
                self.program, input, status
            )));
        }
        Ok(())
    }
}

/// Convert `input` to a WAV next to `target`, then fix its header.
///
/// The output is `target` with its extension forced to `.wav`.
pub fn convert_to_wav(
    encoder: &dyn Encoder,
    input: &Path,
    target: &Path,
    params: &ReencodeParams,
) -> Result<PathBuf> {
    let output = target.with_extension("wav");

    if params.is_empty() {
        info!("Converting {:?} -> {:?}", input, output);
    } else {
        info!("Reencoding with parameters {}: {:?}", params, input);
    }

    encoder.encode(input, &output, params)?;
    fix_wav_header(&output)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::TempDir;

    use crate::header::{read_format_tag, WAVE_FORMAT_EXTENSIBLE, WAVE_FORMAT_PCM};

    /// Writes a 44-byte header with the extensible tag, like ffmpeg does for 24 bit
    struct StubEncoder {
        calls: RefCell<Vec<(PathBuf, PathBuf)>>,
    }

    impl Encoder for StubEncoder {
        fn encode(&self, input: &Path, output: &Path, _params: &ReencodeParams) -> Result<()> {
            self.calls
                .borrow_mut()
                .push((input.to_path_buf(), output.to_path_buf()));
            let mut header = vec![0u8; 44];
            header[..4].copy_from_slice(b"RIFF");
            header[20..22].copy_from_slice(&WAVE_FORMAT_EXTENSIBLE.to_le_bytes());
            std::fs::write(output, header)?;
            Ok(())
        }
    }

    #[test]
    fn test_command_args_bare() {
        let args = Ffmpeg::command_args(
            Path::new("/music/a.flac"),
            Path::new("/out/00_a.wav"),
            &ReencodeParams::new(),
        );
        assert_eq!(args, vec!["-y", "-i", "/music/a.flac", "/out/00_a.wav"]);
    }

    #[test]
    fn test_command_args_with_overrides() {
        let mut params = ReencodeParams::new();
        params.push("-ar", "48000");
        params.push("-c:a", "pcm_s24le");

        let args = Ffmpeg::command_args(
            Path::new("in.aiff"),
            Path::new("out.wav"),
            &params,
        );
        assert_eq!(
            args,
            vec!["-y", "-i", "in.aiff", "-ar", "48000", "-c:a", "pcm_s24le", "out.wav"]
        );
    }

    #[test]
    fn test_convert_forces_wav_and_fixes_header() {
        let tmp = TempDir::new().unwrap();
        let encoder = StubEncoder {
            calls: RefCell::new(Vec::new()),
        };
        let target = tmp.path().join("03_track.flac");

        let output = convert_to_wav(
            &encoder,
            Path::new("/music/track.flac"),
            &target,
            &ReencodeParams::new(),
        )
        .unwrap();

        assert_eq!(output, tmp.path().join("03_track.wav"));
        assert_eq!(encoder.calls.borrow()[0].1, output);
        assert_eq!(read_format_tag(&output).unwrap(), Some(WAVE_FORMAT_PCM));
    }

    #[test]
    fn test_missing_program() {
        let ffmpeg = Ffmpeg::new("/nonexistent/bin/ffmpeg");
        assert!(matches!(
            ffmpeg.check_available(),
            Err(Error::EncoderMissing(_))
        ));

        let err = ffmpeg
            .encode(Path::new("a.flac"), Path::new("a.wav"), &ReencodeParams::new())
            .unwrap_err();
        assert!(matches!(err, Error::Encoder(_)));
    }
}
