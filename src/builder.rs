//! The build: every album folder in, one manifest per album and one index out.
//!
//! Folders are the non-hidden directories directly under the working
//! directory, processed one at a time in lexical order. Each folder goes
//! through load → reconcile → save; the resulting covers are folded into the
//! [`Market`] with ids taken from the number of covers admitted so far.
//!
//! ```text
//! A/  ok      → id 0
//! B/  fails   → logged, no cover, no id consumed
//! C/  ok      → id 1
//! ```
//!
//! Album ids are therefore positional within one run and can shift between
//! runs when folders are added, removed or fail.
//!
//! Only two failures are fatal: the working directory cannot be listed, or
//! the index cannot be written. Everything per-folder is logged and skipped.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{self, BuilderConfig};
use crate::paths::local_path;
use crate::reconcile::{self, ReconcileError};
use crate::store::{self, StoreError};
use crate::types::{Album, Market};

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("cannot list working directory {path}: {source}")]
    ListRoot {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot write index: {0}")]
    WriteIndex(#[source] StoreError),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Reconcile everything but write no manifest.
    pub dry_run: bool,
}

/// Per-album result of a build, for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumReport {
    pub id: usize,
    pub folder: String,
    pub songs: usize,
    /// Songs appended by this run.
    pub added: usize,
    pub image_url: String,
    pub playlist_url: String,
}

/// A folder left out of the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderFailure {
    pub folder: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct BuildSummary {
    pub market: Market,
    pub albums: Vec<AlbumReport>,
    pub failures: Vec<FolderFailure>,
}

/// What reconciling one folder produced.
#[derive(Debug)]
pub struct FolderOutcome {
    pub folder: String,
    /// Number of songs recorded before this run.
    pub recorded: usize,
    pub result: Result<Album, ReconcileError>,
}

/// Load `market.toml` from `root` and build.
pub fn run(root: &Path, options: BuildOptions) -> Result<BuildSummary, BuildError> {
    let config = config::load_config(root)?;
    build(root, &config, options)
}

pub fn build(
    root: &Path,
    config: &BuilderConfig,
    options: BuildOptions,
) -> Result<BuildSummary, BuildError> {
    let folders = album_folders(root)?;
    info!(root = %root.display(), folders = folders.len(), "building market");

    let outcomes = folders
        .into_iter()
        .map(|folder| process_folder(root, folder, config));

    let summary = assemble(outcomes, |folder, album| {
        if options.dry_run {
            return;
        }
        let path = local_path(root, &config.album_manifest, folder);
        if let Err(e) = store::save_album(album, &path) {
            warn!(folder, error = %e, "cannot save album manifest");
        }
    });

    if !options.dry_run {
        let index = root.join(&config.index_manifest);
        store::save_market(&summary.market, &index).map_err(BuildError::WriteIndex)?;
        info!(
            index = %index.display(),
            albums = summary.market.albums.len(),
            "index written"
        );
    }
    Ok(summary)
}

/// Reconcile a single folder against its recorded manifest.
pub fn process_folder(root: &Path, folder: String, config: &BuilderConfig) -> FolderOutcome {
    let previous = reconcile::load_previous(root, &folder, config);
    let recorded = previous.songs.len();
    let result = reconcile::reconcile(root, &folder, previous, config);
    FolderOutcome {
        folder,
        recorded,
        result,
    }
}

/// Fold folder outcomes into the market, in order.
///
/// Each successful album gets `id = covers admitted so far`, is handed to
/// `persist`, and contributes its cover. Failed folders are recorded in the
/// summary and consume no id.
pub fn assemble<I, F>(outcomes: I, mut persist: F) -> BuildSummary
where
    I: IntoIterator<Item = FolderOutcome>,
    F: FnMut(&str, &Album),
{
    outcomes
        .into_iter()
        .fold(BuildSummary::default(), |mut acc, outcome| {
            match outcome.result {
                Ok(mut album) => {
                    album.cover.id = acc.market.albums.len();
                    persist(&outcome.folder, &album);

                    let added = album.songs.len().saturating_sub(outcome.recorded);
                    info!(
                        folder = %outcome.folder,
                        id = album.cover.id,
                        songs = album.songs.len(),
                        added,
                        "album reconciled"
                    );
                    acc.albums.push(AlbumReport {
                        id: album.cover.id,
                        folder: outcome.folder,
                        songs: album.songs.len(),
                        added,
                        image_url: album.cover.image_url.clone(),
                        playlist_url: album.cover.playlist_url.clone(),
                    });
                    acc.market.albums.push(album.cover);
                }
                Err(e) => {
                    warn!(folder = %outcome.folder, error = %e, "skipping album folder");
                    acc.failures.push(FolderFailure {
                        folder: outcome.folder,
                        reason: e.to_string(),
                    });
                }
            }
            acc
        })
}

/// Non-hidden directories directly under `root`, sorted lexically.
pub fn album_folders(root: &Path) -> Result<Vec<String>, BuildError> {
    let list_err = |source| BuildError::ListRoot {
        path: root.to_path_buf(),
        source,
    };

    let mut folders = Vec::new();
    for entry in fs::read_dir(root).map_err(list_err)? {
        let entry = entry.map_err(list_err)?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) if name.starts_with('.') => {}
            Ok(name) => folders.push(name),
            Err(raw) => warn!(folder = ?raw, "skipping non UTF-8 folder name"),
        }
    }
    folders.sort();
    Ok(folders)
}
