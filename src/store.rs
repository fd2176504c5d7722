//! Reading and writing manifest files.
//!
//! Manifests are written as tab-indented JSON in schema field order, with no
//! trailing newline, and always replace the whole file. Loading is strict
//! here; the caller decides what a failed load means (the orchestrator
//! treats it as "start a fresh album").

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::types::{Album, Market};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Load an album manifest.
pub fn load_album(path: &Path) -> Result<Album, StoreError> {
    let content = fs::read(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&content).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn save_album(album: &Album, path: &Path) -> Result<(), StoreError> {
    write_json(album, path)
}

pub fn save_market(market: &Market, path: &Path) -> Result<(), StoreError> {
    write_json(market, path)
}

/// Tab-indented JSON bytes for any manifest value.
fn to_json(value: &impl Serialize) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"\t"));
    value.serialize(&mut ser)?;
    Ok(buf)
}

fn write_json(value: &impl Serialize, path: &Path) -> Result<(), StoreError> {
    let json = to_json(value).map_err(|e| StoreError::Write {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    fs::write(path, json).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cover;
    use tempfile::TempDir;

    fn sample_album() -> Album {
        let mut album = Album::empty("Jazz");
        album.cover.id = 2;
        album.cover.image_url = "https://cdn.test/Jazz/cover.png".into();
        album.cover.playlist_url = "https://cdn.test/Jazz/album.json".into();
        album.push_song("a.mp3", "https://cdn.test/Jazz/a.mp3".into());
        album
    }

    #[test]
    fn save_and_load_album() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("album.json");
        let album = sample_album();

        save_album(&album, &path).unwrap();
        assert_eq!(load_album(&path).unwrap(), album);
    }

    #[test]
    fn album_is_tab_indented_in_schema_order() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("album.json");
        save_album(&sample_album(), &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let expected = "{\n\
\t\"id\": 2,\n\
\t\"name\": \"Jazz\",\n\
\t\"image_url\": \"https://cdn.test/Jazz/cover.png\",\n\
\t\"playlist_url\": \"https://cdn.test/Jazz/album.json\",\n\
\t\"songs\": [\n\
\t\t{\n\
\t\t\t\"id\": 0,\n\
\t\t\t\"name\": \"a.mp3\",\n\
\t\t\t\"url\": \"https://cdn.test/Jazz/a.mp3\"\n\
\t\t}\n\
\t]\n\
}";
        assert_eq!(text, expected);
    }

    #[test]
    fn save_replaces_previous_content() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("album.json");
        fs::write(&path, "x".repeat(4096)).unwrap();

        save_album(&Album::empty("A"), &path).unwrap();
        assert_eq!(load_album(&path).unwrap(), Album::empty("A"));
    }

    #[test]
    fn market_has_single_albums_array() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("index.json");
        let market = Market {
            albums: vec![Cover {
                id: 0,
                name: "A".into(),
                ..Cover::default()
            }],
        };
        save_market(&market, &path).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 1);
        let covers = object["albums"].as_array().unwrap();
        assert_eq!(covers[0]["name"], "A");
        assert!(covers[0].get("songs").is_none());
    }

    #[test]
    fn load_missing_is_read_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_album(&tmp.path().join("album.json"));
        assert!(matches!(result, Err(StoreError::Read { .. })));
    }

    #[test]
    fn load_corrupt_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("album.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_album(&path), Err(StoreError::Parse { .. })));
    }

    #[test]
    fn load_wrong_shape_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("album.json");
        fs::write(&path, r#"{"songs": "nope"}"#).unwrap();
        assert!(matches!(load_album(&path), Err(StoreError::Parse { .. })));
    }

    #[test]
    fn write_into_missing_dir_is_write_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nope").join("album.json");
        let result = save_album(&Album::empty("A"), &path);
        assert!(matches!(result, Err(StoreError::Write { .. })));
    }
}
