//! Merging a scanned album folder into its previously recorded manifest.
//!
//! Reconciliation is additive only. This is the contract, not an oversight:
//!
//! - Recorded songs are kept verbatim: same position, id, name and URL, even
//!   if the file has since been deleted or the folder renamed.
//! - Audio files whose name is not yet recorded are appended, in lexical
//!   file-name order, with ids continuing from the current song count.
//! - An image found in this scan replaces `image_url` (the last one in
//!   lexical order wins). No image found leaves the previous value alone.
//! - `playlist_url` is always recomputed from the folder name.
//!
//! Only direct entries of the folder are looked at; subdirectories are
//! skipped, as is the album's own manifest file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::classify::{FileKind, classify};
use crate::config::BuilderConfig;
use crate::paths::{local_path, public_url};
use crate::store::{self, StoreError};
use crate::types::Album;

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("cannot list album folder {folder}: {source}")]
    List {
        folder: PathBuf,
        source: std::io::Error,
    },
}

/// Load the recorded album for `folder`, or start a fresh one.
///
/// Any load failure is downgraded to an empty album named after the folder.
/// A missing manifest is a first run and only logged at debug level; an
/// unreadable or unparsable one drops the recorded songs and is warned about.
pub fn load_previous(root: &Path, folder: &str, config: &BuilderConfig) -> Album {
    let path = local_path(root, &config.album_manifest, folder);
    match store::load_album(&path) {
        Ok(mut album) => {
            if album.cover.name.is_empty() {
                album.cover.name = folder.to_string();
            }
            album
        }
        Err(StoreError::Read { source, .. }) if source.kind() == ErrorKind::NotFound => {
            debug!(folder, "no album manifest yet, starting fresh album");
            Album::empty(folder)
        }
        Err(e) => {
            warn!(folder, error = %e, "discarding unusable album manifest");
            Album::empty(folder)
        }
    }
}

/// Fold the current contents of `root/folder` into `previous`.
pub fn reconcile(
    root: &Path,
    folder: &str,
    previous: Album,
    config: &BuilderConfig,
) -> Result<Album, ReconcileError> {
    let dir = root.join(folder);
    let mut album = previous;

    for name in list_files(&dir)? {
        if name == config.album_manifest || album.has_song(&name) {
            continue;
        }
        match classify(&local_path(root, &name, folder)) {
            FileKind::Audio => {
                let url = public_url(&config.cdn_base, &name, folder);
                let song = album.push_song(&name, url);
                debug!(folder, song = %song.name, id = song.id, "new song");
            }
            FileKind::Image => {
                album.cover.image_url = public_url(&config.cdn_base, &name, folder);
            }
            FileKind::Unknown => {}
        }
    }

    album.cover.playlist_url = public_url(&config.cdn_base, &config.album_manifest, folder);
    Ok(album)
}

/// Names of the non-directory entries of `dir`, sorted lexically.
///
/// Entries that fail to stat or whose names are not valid UTF-8 are
/// logged and skipped.
fn list_files(dir: &Path) -> Result<Vec<String>, ReconcileError> {
    let list_err = |source| ReconcileError::List {
        folder: dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(list_err)? {
        let entry = entry.map_err(list_err)?;
        let is_dir = match entry.file_type() {
            Ok(t) => t.is_dir() || (t.is_symlink() && entry.path().is_dir()),
            Err(e) => {
                warn!(file = %entry.path().display(), error = %e, "cannot stat entry");
                continue;
            }
        };
        if is_dir {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => warn!(file = ?raw, "skipping non UTF-8 file name"),
        }
    }
    names.sort();
    Ok(names)
}
