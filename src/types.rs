//! Manifest data model shared by the reconciler, the store and the orchestrator.
//!
//! Field order in these structs is the field order written to disk, so it
//! must not be rearranged:
//!
//! ```text
//! album.json  { id, name, image_url, playlist_url, songs: [{ id, name, url }] }
//! index.json  { albums: [{ id, name, image_url, playlist_url }] }
//! ```
//!
//! All structs deserialize leniently: missing fields take their zero value and
//! `null` arrays are read as empty, so partial or hand-trimmed manifests still
//! load.

use serde::{Deserialize, Deserializer, Serialize};

/// Top-level index. Rebuilt from scratch on every run, never loaded.
///
/// Invariant: `albums[i].id == i`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Market {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub albums: Vec<Cover>,
}

/// Identity and display metadata of an album, as listed in the index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cover {
    pub id: usize,
    /// Folder name the album was built from.
    pub name: String,
    /// Public URL of the cover image, empty when none was ever found.
    pub image_url: String,
    /// Public URL of the album's own manifest.
    pub playlist_url: String,
}

/// A cover plus its songs. Song order is append-only across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    #[serde(flatten)]
    pub cover: Cover,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub songs: Vec<Song>,
}

/// One audio file. Never rewritten once recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Song {
    /// Position in the album at the time the song was first seen.
    pub id: usize,
    /// File name inside the album folder; also the dedup key.
    pub name: String,
    pub url: String,
}

impl Album {
    /// A fresh album with no songs and no URLs, named after its folder.
    pub fn empty(name: &str) -> Self {
        Self {
            cover: Cover {
                name: name.to_string(),
                ..Cover::default()
            },
            songs: Vec::new(),
        }
    }

    /// Whether a song with exactly this file name is already recorded.
    pub fn has_song(&self, name: &str) -> bool {
        self.songs.iter().any(|s| s.name == name)
    }

    /// Append a song, giving it the next positional id.
    pub fn push_song(&mut self, name: &str, url: String) -> &Song {
        let id = self.songs.len();
        self.songs.push(Song {
            id,
            name: name.to_string(),
            url,
        });
        &self.songs[id]
    }
}

/// Older writers emitted `null` for empty lists.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
