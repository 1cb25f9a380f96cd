//! Where a property resource comes from.

use std::io;
use std::path::{Path, PathBuf};

/// Backing storage for a property resource.
///
/// `read` returns `Ok(None)` when the resource does not exist; any other
/// failure to produce its bytes is an error.
pub trait PropertySource: Send + Sync {
    /// Human-readable location, used in errors and logs.
    fn location(&self) -> String;

    /// Read the raw resource bytes.
    fn read(&self) -> io::Result<Option<Vec<u8>>>;
}

/// A property resource on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSource { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PropertySource for FileSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn read(&self) -> io::Result<Option<Vec<u8>>> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// An in-memory property resource.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    contents: Option<Vec<u8>>,
}

impl MemorySource {
    /// A resource with the given contents.
    pub fn new(contents: impl Into<Vec<u8>>) -> Self {
        MemorySource {
            contents: Some(contents.into()),
        }
    }

    /// A resource that does not exist.
    pub fn missing() -> Self {
        MemorySource { contents: None }
    }
}

impl PropertySource for MemorySource {
    fn location(&self) -> String {
        "<memory>".to_string()
    }

    fn read(&self) -> io::Result<Option<Vec<u8>>> {
        Ok(self.contents.clone())
    }
}
