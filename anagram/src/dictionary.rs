use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::{AnagramError, AnagramResult};

/// A dictionary file mapped read-only into memory.
///
/// The search pipeline borrows [`Dictionary::as_bytes`] for its whole run, so
/// the mapping must outlive every session that reads it. Zero-length files are
/// not mapped at all and read as an empty buffer.
#[derive(Debug)]
pub struct Dictionary {
    path: PathBuf,
    map: Option<Mmap>,
}

impl Dictionary {
    /// Opens and maps `path`
    pub fn open(path: impl AsRef<Path>) -> AnagramResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| AnagramError::from_io(path, e))?;
        let len = file
            .metadata()
            .map_err(|e| AnagramError::from_io(path, e))?
            .len();

        let map = if len == 0 {
            None
        } else {
            // SAFETY: the mapping is read-only; concurrent truncation of the file
            // by another process is outside what this tool defends against.
            Some(unsafe { Mmap::map(&file) }.map_err(AnagramError::IoError)?)
        };

        debug!("Mapped dictionary {} ({} bytes)", path.display(), len);
        Ok(Self {
            path: path.to_path_buf(),
            map,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The raw dictionary contents
    pub fn as_bytes(&self) -> &[u8] {
        self.map.as_deref().unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}
