//! Local paths and public CDN URLs for files inside album folders.
//!
//! Both builders take the same `(name, parent)` pair. The local form is a
//! plain join used only for filesystem access. The public form escapes each
//! component on its own before joining, so a `/`, `#`, `?` or space inside a
//! folder or file name can never introduce or hide a path segment:
//!
//! ```text
//! public_url(base, "01 Intro?.mp3", "Live #2")
//!   → https://cdn.example/content/Live%20%232/01%20Intro%3F.mp3
//! ```

use std::path::{Path, PathBuf};

/// `root/parent/name` on the local filesystem. No escaping.
pub fn local_path(root: &Path, name: &str, parent: &str) -> PathBuf {
    root.join(parent).join(name)
}

/// `base/<escaped parent>/<escaped name>`.
///
/// `base` is expected without a trailing slash (enforced by config validation).
pub fn public_url(base: &str, name: &str, parent: &str) -> String {
    format!(
        "{}/{}/{}",
        base,
        urlencoding::encode(parent),
        urlencoding::encode(name)
    )
}
