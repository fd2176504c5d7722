//! CLI output formatting for build and check runs.
//!
//! Output is an album inventory: each album leads with its index id, folder
//! name and song counts, followed by indented context lines. Folders that
//! were skipped are listed at the end with their reason.
//!
//! ```text
//! Albums
//! 000 Jazz (12 songs, +2 new)
//!     Image: https://cdn.example/content/Jazz/cover.jpg
//!     Playlist: https://cdn.example/content/Jazz/album.json
//! 001 Rock (3 songs)
//!     Playlist: https://cdn.example/content/Rock/album.json
//!
//! Failed
//!     Broken: cannot list album folder ./Broken: permission denied
//!
//! 2 albums, 15 songs, 2 new
//! ```
//!
//! [`format_build_output`] is pure and returns lines; [`print_build_output`]
//! writes them to stdout.

use crate::builder::{AlbumReport, BuildSummary};

/// Format an album id as 3-digit zero-padded.
fn format_index(id: usize) -> String {
    format!("{:0>3}", id)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `"song"` for one, `"songs"` otherwise.
fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        noun.to_string()
    } else {
        format!("{noun}s")
    }
}

/// `NNN name (S songs)` or `NNN name (S songs, +A new)`.
fn album_header(album: &AlbumReport) -> String {
    let noun = plural(album.songs, "song");
    if album.added > 0 {
        format!(
            "{} {} ({} {}, +{} new)",
            format_index(album.id),
            album.folder,
            album.songs,
            noun,
            album.added
        )
    } else {
        format!(
            "{} {} ({} {})",
            format_index(album.id),
            album.folder,
            album.songs,
            noun
        )
    }
}

pub fn format_build_output(summary: &BuildSummary) -> Vec<String> {
    let mut lines = vec!["Albums".to_string()];

    for album in &summary.albums {
        lines.push(album_header(album));
        if !album.image_url.is_empty() {
            lines.push(format!("{}Image: {}", indent(1), album.image_url));
        }
        lines.push(format!("{}Playlist: {}", indent(1), album.playlist_url));
    }

    if !summary.failures.is_empty() {
        lines.push(String::new());
        lines.push("Failed".to_string());
        for failure in &summary.failures {
            lines.push(format!("{}{}: {}", indent(1), failure.folder, failure.reason));
        }
    }

    let songs: usize = summary.albums.iter().map(|a| a.songs).sum();
    let added: usize = summary.albums.iter().map(|a| a.added).sum();
    lines.push(String::new());
    lines.push(format!(
        "{} {}, {} {}, {} new",
        summary.albums.len(),
        plural(summary.albums.len(), "album"),
        songs,
        plural(songs, "song"),
        added
    ));
    lines
}

pub fn print_build_output(summary: &BuildSummary) {
    for line in format_build_output(summary) {
        println!("{}", line);
    }
}
