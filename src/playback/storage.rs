//! Storage collaborator and the raw frame loader.
//!
//! Frame files carry no header: exactly `width * height * bytes_per_pixel`
//! bytes of row-major pixels in the configured format.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};

use super::FrameLoadError;

/// Byte-addressable storage that frames are read from.
pub trait Storage {
    /// Open file. Closed when dropped.
    type Reader: Read;

    /// Open `path`, a POSIX-like device path such as `/sdcard/video/group0/out001.bin`.
    fn open(&self, path: &str) -> io::Result<Self::Reader>;
}

/// Read exactly one frame from `path` into `buf`.
///
/// Fails if the file is missing, unreadable, shorter or longer than `buf`.
/// On failure `buf` may hold a partial frame and must not be presented.
pub fn load_frame<S: Storage + ?Sized>(
    storage: &S,
    path: &str,
    buf: &mut [u8],
) -> Result<(), FrameLoadError> {
    let mut reader = storage.open(path).map_err(|source| FrameLoadError::Open {
        path: path.to_string(),
        source,
    })?;

    let read_error = |source| FrameLoadError::Read {
        path: path.to_string(),
        source,
    };

    let expected = buf.len();
    let mut filled = 0;
    while filled < expected {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(read_error(e)),
        }
    }
    if filled < expected {
        return Err(FrameLoadError::Truncated {
            path: path.to_string(),
            expected,
            actual: filled,
        });
    }

    // A trailing byte means the file does not match the configured format.
    let mut probe = [0u8; 1];
    loop {
        match reader.read(&mut probe) {
            Ok(0) => return Ok(()),
            Ok(_) => {
                return Err(FrameLoadError::Oversized {
                    path: path.to_string(),
                    expected,
                });
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(read_error(e)),
        }
    }
}

/// Storage backed by a host directory standing in for the card's mount point.
///
/// `/sdcard/video/group0/out001.bin` opens `<root>/sdcard/video/group0/out001.bin`.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Host path for a device path.
    pub fn host_path(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

impl Storage for FsStorage {
    type Reader = File;

    fn open(&self, path: &str) -> io::Result<File> {
        File::open(self.host_path(path))
    }
}

/// In-memory storage keyed by device path.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, data: Vec<u8>) {
        self.files.insert(path.into(), data);
    }

    pub fn remove(&mut self, path: &str) -> Option<Vec<u8>> {
        self.files.remove(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl Storage for MemoryStorage {
    type Reader = Cursor<Vec<u8>>;

    fn open(&self, path: &str) -> io::Result<Self::Reader> {
        self.files
            .get(path)
            .map(|data| Cursor::new(data.clone()))
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{path} not found")))
    }
}
