//! Track lookup in the export's COLLECTION
//!
//! Locations are URIs of the form `file://localhost/<url-encoded path>`.
//! The path is split into directory and filename before decoding, so an
//! encoded `%2F` inside a name never acts as a separator.

use percent_encoding::percent_decode_str;
use tracing::info;

use crate::document::{ExportDocument, TrackKey};

pub const LOCATION_PREFIX: &str = "file://localhost/";

/// A collection entry split into its decoded parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTrack {
    pub filename: String,
    /// Directory as written by the exporting OS, e.g. `C:/Music/Techno`
    pub directory: String,
}

/// Resolve a playlist entry against the collection.
///
/// Returns `None` when a `TrackID` has no collection entry.
pub fn resolve(doc: &ExportDocument, key: &TrackKey) -> Option<ResolvedTrack> {
    let location = match key {
        TrackKey::Id(id) => doc.collection_entry(id)?.location.as_str(),
        TrackKey::Location(location) => location.as_str(),
    };
    Some(split_location(location))
}

/// Strip the URI prefix and split on the last `/`
pub fn split_location(location: &str) -> ResolvedTrack {
    let raw = location.strip_prefix(LOCATION_PREFIX).unwrap_or(location);
    info!("Track path raw: {}", raw);

    let (directory, filename) = match raw.rfind('/') {
        Some(mark) => (&raw[..mark], &raw[mark + 1..]),
        None => ("", raw),
    };

    ResolvedTrack {
        filename: decode(filename),
        directory: decode(directory),
    }
}

fn decode(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}
