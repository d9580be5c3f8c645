use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use log::{trace, warn};

use crate::error::{Error, Result};
use crate::header::{is_headered, INesHeader};
use crate::{CHUNK_SIZE, HEADER_LEN, MAGIC, UNHEADERED_EXTENSION};

fn read_prefix(path: &Path, len: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(len);
    File::open(path)
        .and_then(|f| f.take(len as u64).read_to_end(&mut buf))
        .map_err(|e| Error::io(path, e))?;
    Ok(buf)
}

/// Checks the first four bytes of `path` for the iNES signature.
///
/// Files shorter than the signature, empty ones included, count as
/// unheadered rather than as an error.
pub fn has_header(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    let sig = read_prefix(path, MAGIC.len())?;
    let headered = is_headered(&sig);
    trace!("{}: signature {:02x?}, headered: {}", path.display(), sig, headered);
    Ok(headered)
}

/// Decodes the header of `path`, or `None` if it doesn't carry a complete one.
pub fn read_header(path: impl AsRef<Path>) -> Result<Option<INesHeader>> {
    let path = path.as_ref();
    let raw = read_prefix(path, HEADER_LEN)?;
    Ok(INesHeader::parse(&raw).ok().map(|(_, hdr)| hdr))
}

/// `rom.nes` -> `rom.unh`
pub fn unheadered_path(path: impl AsRef<Path>) -> PathBuf {
    path.as_ref().with_extension(UNHEADERED_EXTENSION)
}

/// Copies everything after the header of `input` into a freshly created
/// `output`, returning the number of bytes written.
///
/// `output` is opened with `create_new`, so an existing file yields
/// [`Error::TargetExists`] and is left untouched. A copy that fails half way
/// removes what it wrote.
pub fn strip_header(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<u64> {
    let (input, output) = (input.as_ref(), output.as_ref());

    let mut src = File::open(input).map_err(|e| Error::io(input, e))?;
    src.seek(SeekFrom::Start(HEADER_LEN as u64))
        .map_err(|e| Error::io(input, e))?;

    let mut dst = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(output)
        .map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => Error::TargetExists { path: output.to_path_buf() },
            _ => Error::io(output, e),
        })?;

    match copy_chunks(&mut src, input, &mut dst, output) {
        Ok(written) => Ok(written),
        Err(e) => {
            drop(dst);
            if let Err(rm) = fs::remove_file(output) {
                warn!("could not remove partial copy {}: {}", output.display(), rm);
            }
            Err(e)
        },
    }
}

fn copy_chunks(src: &mut File, input: &Path, dst: &mut File, output: &Path) -> Result<u64> {
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut written = 0u64;
    loop {
        let n = match src.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::io(input, e)),
        };
        dst.write_all(&buf[..n]).map_err(|e| Error::io(output, e))?;
        written += n as u64;
    }
    dst.flush().map_err(|e| Error::io(output, e))?;
    Ok(written)
}
