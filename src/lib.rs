//! # Album Market
//!
//! Builds the static JSON manifests of a media distribution site from a
//! directory of album folders. The directory tree is the data source: every
//! non-hidden folder is an album, every audio file in it a song, and an image
//! in it the album cover.
//!
//! # Pipeline
//!
//! ```text
//! for each album folder, in lexical order:
//!     album.json ──load──▶ previous Album ──reconcile(folder scan)──▶ Album ──save──▶ album.json
//!                                                                        │
//!                                                                        ▼
//!                                                        cover (id = position) ──▶ index.json
//! ```
//!
//! Reconciliation is additive: recorded songs keep their position, id and
//! URL forever; new audio files are appended. See [`reconcile`] for the full
//! contract.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`builder`] | Enumerates album folders, folds them into the index, owns the fatal errors |
//! | [`reconcile`] | Merges one folder's current files into its recorded album |
//! | [`classify`] | Audio / image / unknown by file signature |
//! | [`paths`] | Local paths and percent-encoded public CDN URLs |
//! | [`store`] | Tab-indented JSON manifest load and save |
//! | [`types`] | `Market`, `Cover`, `Album`, `Song` |
//! | [`config`] | Optional `market.toml` loading and validation |
//! | [`output`] | CLI summary formatting |
//!
//! # Identity
//!
//! Ids are positional. A song's id is the song count when it was first seen
//! and never changes afterwards. An album's id is its position among the
//! folders that built successfully in this run, so it can move between runs.
//! Nothing is content-hashed.

pub mod builder;
pub mod classify;
pub mod config;
pub mod output;
pub mod paths;
pub mod reconcile;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
