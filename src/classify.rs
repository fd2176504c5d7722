//! Content-based file classification.
//!
//! A file is classified by its leading bytes only. Extensions are never
//! consulted, so `cover.mp3` holding PNG data is an image and `track.txt`
//! holding FLAC data is a song.
//!
//! Both audio and image signatures are matched against fixed tables. Audio
//! is checked first: a header that matches both is a song.
//!
//! Audio:
//!
//! | Format | Signature |
//! |--------|-----------|
//! | MP3    | `ID3`, or frame sync `FF FB` / `FF F3` / `FF F2` |
//! | M4A    | `ftypM4A` at offset 4, or `M4A ` |
//! | OGG    | `OggS` |
//! | FLAC   | `fLaC` |
//! | WAV    | `RIFF....WAVE` |
//! | AIFF   | `FORM....AIFF` |
//! | AMR    | `#!AMR\n` |
//! | AAC    | ADTS sync `FF F1` / `FF F9` |
//! | MIDI   | `MThd` |
//! | DSF    | `DSD ` |
//!
//! Images:
//!
//! | Format | Signature |
//! |--------|-----------|
//! | JPEG   | `FF D8 FF` |
//! | JPEG 2000 | `00 00 00 0C 6A 50 20 20 0D 0A 87 0A` |
//! | PNG    | `89 50 4E 47` |
//! | GIF    | `GIF` |
//! | WebP   | `RIFF....WEBP` |
//! | TIFF / CR2 | `II*\0` or `MM\0*` |
//! | BMP    | `BM` |
//! | JXR    | `II BC` |
//! | PSD    | `8BPS` |
//! | ICO    | `00 00 01 00` |
//! | HEIF / AVIF | `ftyp` at offset 4, brand `heic` `heix` `hevc` `hevx` `mif1` `msf1` `avif` `avis` |
//!
//! Anything else, text included, is unknown.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Longest signature window any supported format needs.
pub const HEADER_LEN: u64 = 261;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Audio,
    Image,
    Unknown,
}

/// Classify the file at `path` by its first [`HEADER_LEN`] bytes.
///
/// Unreadable files are [`FileKind::Unknown`]; the failure is logged and
/// never propagated.
pub fn classify(path: &Path) -> FileKind {
    let header = match read_header(path) {
        Ok(header) => header,
        Err(e) => {
            warn!(file = %path.display(), error = %e, "cannot read file header");
            return FileKind::Unknown;
        }
    };
    let kind = classify_header(&header);
    debug!(file = %path.display(), ?kind, "classified");
    kind
}

/// Classify an in-memory header. Short buffers are fine.
pub fn classify_header(header: &[u8]) -> FileKind {
    if is_audio(header) {
        FileKind::Audio
    } else if is_image(header) {
        FileKind::Image
    } else {
        FileKind::Unknown
    }
}

fn read_header(path: &Path) -> std::io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut header = Vec::with_capacity(HEADER_LEN as usize);
    file.take(HEADER_LEN).read_to_end(&mut header)?;
    Ok(header)
}

fn is_audio(h: &[u8]) -> bool {
    let at = |offset: usize, sig: &[u8]| h.get(offset..offset + sig.len()) == Some(sig);

    at(0, b"ID3")
        || at(0, &[0xFF, 0xFB])
        || at(0, &[0xFF, 0xF3])
        || at(0, &[0xFF, 0xF2])
        || at(4, b"ftypM4A")
        || at(0, b"M4A ")
        || at(0, b"OggS")
        || at(0, b"fLaC")
        || (at(0, b"RIFF") && at(8, b"WAVE"))
        || (at(0, b"FORM") && at(8, b"AIFF"))
        || at(0, b"#!AMR\n")
        || at(0, &[0xFF, 0xF1])
        || at(0, &[0xFF, 0xF9])
        || at(0, b"MThd")
        || at(0, b"DSD ")
}

const IMAGE_BRANDS: [&[u8]; 8] = [
    b"heic", b"heix", b"hevc", b"hevx", b"mif1", b"msf1", b"avif", b"avis",
];

fn is_image(h: &[u8]) -> bool {
    let at = |offset: usize, sig: &[u8]| h.get(offset..offset + sig.len()) == Some(sig);

    at(0, &[0xFF, 0xD8, 0xFF])
        || at(0, &[0x00, 0x00, 0x00, 0x0C, 0x6A, 0x50, 0x20, 0x20, 0x0D, 0x0A, 0x87, 0x0A])
        || at(0, &[0x89, 0x50, 0x4E, 0x47])
        || at(0, b"GIF")
        || (at(0, b"RIFF") && at(8, b"WEBP"))
        || at(0, b"II*\0")
        || at(0, b"MM\0*")
        || at(0, b"BM")
        || at(0, &[0x49, 0x49, 0xBC])
        || at(0, b"8BPS")
        || at(0, &[0x00, 0x00, 0x01, 0x00])
        || (at(4, b"ftyp") && IMAGE_BRANDS.iter().any(|brand| at(8, *brand)))
}
