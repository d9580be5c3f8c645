//! Detects the iNES header on NES ROM images and writes unheadered copies.

use std::path::{Path, PathBuf};

use log::{debug, log_enabled, Level};

mod error;
mod header;
mod strip;

pub use error::{Error, Result};
pub use header::{is_headered, magic, INesHeader, TvSystem};
pub use strip::{has_header, read_header, strip_header, unheadered_path};

/// `"NES"` followed by the MS-DOS end-of-file byte.
pub const MAGIC: &[u8; 4] = b"NES\x1a";
/// The header is always this long when present.
pub const HEADER_LEN: usize = 0x10;
pub const UNHEADERED_EXTENSION: &str = "unh";
/// Read size used while copying. Any size gives the same output.
pub const CHUNK_SIZE: usize = 0x4000;

/// What [`process_file`] did with a single ROM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The unheadered copy was written to this path.
    Created(PathBuf),
    /// No signature, nothing written.
    AlreadyUnheadered,
    /// A copy was already at this path and was skipped.
    CopyExists(PathBuf),
}

/// Best-effort decode for logging. Never fails the file it describes.
fn header_summary(path: &Path) -> Option<INesHeader> {
    match read_header(path) {
        Ok(hdr) => hdr,
        Err(e) => {
            debug!("{}: header not decoded: {}", path.display(), e);
            None
        },
    }
}

/// Writes `<stem>.unh` next to `path` if `path` carries the header.
///
/// Creates at most one file. An existing copy is reported as
/// [`Outcome::CopyExists`] instead of an error.
pub fn process_file(path: impl AsRef<Path>) -> Result<Outcome> {
    let path = path.as_ref();
    if !has_header(path)? {
        return Ok(Outcome::AlreadyUnheadered);
    }

    if log_enabled!(Level::Debug) {
        if let Some(hdr) = header_summary(path) {
            debug!("{}: {}", path.display(), hdr);
        }
    }

    let output = unheadered_path(path);
    match strip_header(path, &output) {
        Ok(written) => {
            debug!("{}: wrote {} bytes to {}", path.display(), written, output.display());
            Ok(Outcome::Created(output))
        },
        Err(Error::TargetExists { path }) => Ok(Outcome::CopyExists(path)),
        Err(e) => Err(e),
    }
}
