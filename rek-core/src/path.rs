//! Foreign path translation
//!
//! Collection locations carry the exporting machine's path convention.
//! Windows exports look like `C:/Music/a.mp3`, macOS exports like
//! `Users/dj/a.mp3` once the URI prefix has eaten the leading slash.

use std::path::{Path, PathBuf};

use crate::collection::ResolvedTrack;

/// A path as written by the exporting OS
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignPath {
    /// Drive designator such as `C:`, if any
    pub drive: Option<String>,
    pub segments: Vec<String>,
}

impl ForeignPath {
    /// Split on both `/` and `\`, dropping empty segments
    pub fn parse(path: &str) -> Self {
        let mut segments: Vec<String> = path
            .split(|c: char| c == '/' || c == '\\')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        let drive = if segments.first().is_some_and(|s| is_drive(s)) {
            Some(segments.remove(0))
        } else {
            None
        };

        Self { drive, segments }
    }

    /// Map onto the local filesystem.
    ///
    /// With a drive and a prefix the drive is replaced by the prefix.
    /// With a drive and no prefix the path is kept as parsed. Without a
    /// drive the path was absolute on the exporting machine.
    pub fn to_local(&self, prefix: Option<&Path>) -> PathBuf {
        let mut local = match (&self.drive, prefix) {
            (Some(_), Some(prefix)) => prefix.to_path_buf(),
            (Some(drive), None) => PathBuf::from(format!("{}/", drive)),
            (None, _) => PathBuf::from("/"),
        };
        local.extend(&self.segments);
        local
    }
}

fn is_drive(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Local source path of a resolved track
pub fn local_source(track: &ResolvedTrack, prefix: Option<&Path>) -> PathBuf {
    ForeignPath::parse(&track.directory)
        .to_local(prefix)
        .join(&track.filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(directory: &str, filename: &str) -> ResolvedTrack {
        ResolvedTrack {
            filename: filename.into(),
            directory: directory.into(),
        }
    }

    #[test]
    fn test_parse_drive() {
        let path = ForeignPath::parse("C:/Music/Techno");
        assert_eq!(path.drive.as_deref(), Some("C:"));
        assert_eq!(path.segments, vec!["Music", "Techno"]);

        let path = ForeignPath::parse(r"d:\Sets\2024");
        assert_eq!(path.drive.as_deref(), Some("d:"));
        assert_eq!(path.segments, vec!["Sets", "2024"]);
    }

    #[test]
    fn test_parse_without_drive() {
        let path = ForeignPath::parse("Users/dj/Music");
        assert!(path.drive.is_none());
        assert_eq!(path.segments, vec!["Users", "dj", "Music"]);

        // Not a drive: more than one letter before the colon
        assert!(ForeignPath::parse("CD:/x").drive.is_none());
    }

    #[test]
    fn test_prefix_replaces_drive() {
        let local = local_source(
            &track("C:/Music/Techno", "a.mp3"),
            Some(Path::new("/mnt/windows")),
        );
        assert_eq!(local, PathBuf::from("/mnt/windows/Music/Techno/a.mp3"));
    }

    #[test]
    fn test_drive_kept_without_prefix() {
        let local = local_source(&track("C:/Music", "a.mp3"), None);
        assert_eq!(local, PathBuf::from("C:/Music/a.mp3"));
    }

    #[test]
    fn test_prefix_ignored_without_drive() {
        let local = local_source(
            &track("Users/dj/Music", "a.aiff"),
            Some(Path::new("/mnt/windows")),
        );
        assert_eq!(local, PathBuf::from("/Users/dj/Music/a.aiff"));
    }
}
