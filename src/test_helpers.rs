//! Shared test utilities: minimal file signatures and album folder builders.
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! make_folder(tmp.path(), "Rock", &[("01.mp3", MP3_ID3), ("cover.png", PNG)]);
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::config::BuilderConfig;
use crate::types::Album;

// =========================================================================
// File signatures
// =========================================================================

pub const MP3_ID3: &[u8] = b"ID3\x04\x00\x00\x00\x00\x00\x00";
pub const FLAC: &[u8] = b"fLaC\x00\x00\x00\x22";
pub const WAV: &[u8] = b"RIFF\x24\x00\x00\x00WAVEfmt ";
pub const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0dIHDR";
pub const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
pub const TEXT: &[u8] = b"liner notes";

// =========================================================================
// Folder setup
// =========================================================================

/// Create `root/name` holding the given files. Returns the folder path.
pub fn make_folder(root: &Path, name: &str, files: &[(&str, &[u8])]) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    for (file, data) in files {
        fs::write(dir.join(file), data).unwrap();
    }
    dir
}

/// Config pointing at a recognizable test CDN.
pub fn test_config() -> BuilderConfig {
    BuilderConfig {
        cdn_base: "https://cdn.test/content".to_string(),
        ..BuilderConfig::default()
    }
}

// =========================================================================
// Album lookups
// =========================================================================

/// All song names in album order.
pub fn song_names(album: &Album) -> Vec<&str> {
    album.songs.iter().map(|s| s.name.as_str()).collect()
}

/// All song ids in album order.
pub fn song_ids(album: &Album) -> Vec<usize> {
    album.songs.iter().map(|s| s.id).collect()
}

// =========================================================================
// Log capture
// =========================================================================

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` under a plain-text fmt subscriber with the given filter and
/// return everything it logged.
pub fn capture_logs(filter: &str, f: impl FnOnce()) -> String {
    let buf = SharedBuf::default();
    let writer = buf.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    let bytes = buf.0.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}
