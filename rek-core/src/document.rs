//! Rekordbox XML export model
//!
//! The export (`File > Export Collection in xml format`) looks like:
//!
//! ```xml
//! <DJ_PLAYLISTS Version="1.0.0">
//!   <COLLECTION Entries="2">
//!     <TRACK TrackID="1" Location="file://localhost/C:/Music/a.mp3"/>
//!   </COLLECTION>
//!   <PLAYLISTS>
//!     <NODE Type="0" Name="ROOT" Count="1">
//!       <NODE Type="1" Name="Techno" KeyType="0" Entries="1">
//!         <TRACK Key="1"/>
//!       </NODE>
//!     </NODE>
//!   </PLAYLISTS>
//! </DJ_PLAYLISTS>
//! ```
//!
//! The tree is parsed once and reduced to an owned, read-only model.

use std::collections::HashMap;
use std::path::Path;

use roxmltree::Node;
use tracing::debug;

use crate::error::{Error, Result};

const ROOT_ELEMENT: &str = "DJ_PLAYLISTS";
const NODE_ELEMENT: &str = "NODE";
const NODE_TYPE_PLAYLIST: &str = "1";
const KEY_TYPE_LOCATION: &str = "1";

/// Reference from a playlist entry into the collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackKey {
    /// `KeyType="0"`: the entry's `Key` is a `TrackID`
    Id(String),
    /// `KeyType="1"`: the entry's `Key` is the track's `Location` URI
    Location(String),
}

impl std::fmt::Display for TrackKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackKey::Id(id) => write!(f, "TrackID {}", id),
            TrackKey::Location(location) => write!(f, "Location {}", location),
        }
    }
}

/// A playlist node, entries in export order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub name: String,
    /// Names of the enclosing folders, outermost first (ROOT excluded)
    pub folder: Vec<String>,
    pub entries: Vec<TrackKey>,
}

impl Playlist {
    /// `Folder/Sub/Name`, for listings
    pub fn display_path(&self) -> String {
        if self.folder.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.folder.join("/"), self.name)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionEntry {
    pub track_id: String,
    /// Raw `Location` attribute, still URL encoded
    pub location: String,
}

/// Parsed export document
#[derive(Debug, Clone, Default)]
pub struct ExportDocument {
    playlists: Vec<Playlist>,
    collection: HashMap<String, CollectionEntry>,
}

impl ExportDocument {
    /// Read and parse an export file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let xml = std::fs::read_to_string(path)?;
        Self::parse(&xml)
    }

    pub fn parse(xml: &str) -> Result<Self> {
        let doc = roxmltree::Document::parse(xml)?;
        let root = doc.root_element();

        if !root.has_tag_name(ROOT_ELEMENT) {
            return Err(Error::Document(format!(
                "root element must be <{}>, found <{}>",
                ROOT_ELEMENT,
                root.tag_name().name()
            )));
        }

        let collection_node = root
            .children()
            .find(|n| n.has_tag_name("COLLECTION"))
            .ok_or_else(|| Error::Document("missing <COLLECTION>".into()))?;

        let mut collection = HashMap::new();
        for track in collection_node.children().filter(|n| n.has_tag_name("TRACK")) {
            let (Some(track_id), Some(location)) =
                (track.attribute("TrackID"), track.attribute("Location"))
            else {
                debug!("Ignoring TRACK without TrackID/Location at byte {}", track.range().start);
                continue;
            };

            // First occurrence wins
            collection
                .entry(track_id.to_string())
                .or_insert_with(|| CollectionEntry {
                    track_id: track_id.to_string(),
                    location: location.to_string(),
                });
        }

        // Playlists are listed parent by parent: every NODE in document
        // order contributes its direct playlist children.
        let mut playlists = Vec::new();
        for parent in root.descendants().filter(|n| n.has_tag_name(NODE_ELEMENT)) {
            for node in parent.children().filter(is_playlist_node) {
                playlists.push(read_playlist(node));
            }
        }

        debug!(
            "Parsed export: {} collection entries, {} playlists",
            collection.len(),
            playlists.len()
        );

        Ok(Self {
            playlists,
            collection,
        })
    }

    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    pub fn collection_entry(&self, track_id: &str) -> Option<&CollectionEntry> {
        self.collection.get(track_id)
    }

    pub fn collection_len(&self) -> usize {
        self.collection.len()
    }

    /// Pick a playlist by zero-based index or by exact name.
    ///
    /// An in-range index wins over a playlist that happens to be named
    /// like a number; duplicate names resolve to the first match.
    pub fn select(&self, selection: &str) -> Result<&Playlist> {
        let selection = selection.trim();

        if let Some(playlist) = selection
            .parse::<usize>()
            .ok()
            .and_then(|index| self.playlists.get(index))
        {
            return Ok(playlist);
        }

        self.playlists
            .iter()
            .find(|p| p.name == selection)
            .ok_or_else(|| Error::PlaylistNotFound(selection.to_string()))
    }
}

fn is_playlist_node(node: &Node) -> bool {
    node.has_tag_name(NODE_ELEMENT) && node.attribute("Type") == Some(NODE_TYPE_PLAYLIST)
}

fn read_playlist(node: Node) -> Playlist {
    let by_location = node.attribute("KeyType") == Some(KEY_TYPE_LOCATION);

    let entries = node
        .children()
        .filter(|n| n.is_element())
        .filter_map(|n| n.attribute("Key"))
        .map(|key| {
            if by_location {
                TrackKey::Location(key.to_string())
            } else {
                TrackKey::Id(key.to_string())
            }
        })
        .collect();

    // Folders are NODEs nested in another NODE; the outermost one is ROOT.
    let mut folder: Vec<String> = node
        .ancestors()
        .skip(1)
        .filter(|n| n.has_tag_name(NODE_ELEMENT))
        .filter(|n| n.parent_element().is_some_and(|p| p.has_tag_name(NODE_ELEMENT)))
        .filter_map(|n| n.attribute("Name"))
        .map(str::to_string)
        .collect();
    folder.reverse();

    Playlist {
        name: node.attribute("Name").unwrap_or_default().to_string(),
        folder,
        entries,
    }
}
