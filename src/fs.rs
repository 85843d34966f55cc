//! File system seam
//!
//! The artifact emitter writes through this trait so it can be exercised
//! against an in-memory double in tests. [`LocalFs`] is the production
//! implementation.
//!
//! `write` does not create parent directories: directory creation is an
//! explicit, ordered step of the emitter (`create_dir_all` completes before
//! the corresponding write).

use std::io::Write;
use std::path::Path;
#[cfg(test)]
use std::path::PathBuf;

use crate::error::{CompileError, CompileResult};

/// Abstract file system interface
pub trait FileSystem {
    /// Read file content
    fn read_to_string(&self, path: &Path) -> CompileResult<String>;

    /// Write file content; the parent directory must already exist
    fn write(&self, path: &Path, content: &str) -> CompileResult<()>;

    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Create directory and parents; an already-existing directory is not
    /// an error
    fn create_dir_all(&self, path: &Path) -> CompileResult<()>;
}

/// Local disk implementation with atomic writes (tempfile + rename).
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for LocalFs {
    fn read_to_string(&self, path: &Path) -> CompileResult<String> {
        std::fs::read_to_string(path).map_err(|source| CompileError::ReadSource {
            file: path.to_path_buf(),
            source,
        })
    }

    fn write(&self, path: &Path, content: &str) -> CompileResult<()> {
        let wrap = |source: std::io::Error| CompileError::WriteArtifact {
            file: path.to_path_buf(),
            source,
        };

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(wrap)?;
        tmp.write_all(content.as_bytes()).map_err(wrap)?;
        tmp.persist(path).map_err(|e| wrap(e.error))?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> CompileResult<()> {
        std::fs::create_dir_all(path).map_err(|source| CompileError::WriteArtifact {
            file: path.to_path_buf(),
            source,
        })
    }
}

/// In-memory file system for tests
///
/// Uses `Arc<Mutex<>>` internally so it can be cloned and shared.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MemoryFs {
    state: std::sync::Arc<std::sync::Mutex<MemoryFsState>>,
}

#[cfg(test)]
#[derive(Default)]
struct MemoryFsState {
    files: std::collections::BTreeMap<PathBuf, String>,
    dirs: std::collections::BTreeSet<PathBuf>,
}

#[cfg(test)]
impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(&self, path: &Path) -> Option<String> {
        self.state.lock().unwrap().files.get(path).cloned()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().files.keys().cloned().collect()
    }

    pub fn has_dir(&self, path: &Path) -> bool {
        self.state.lock().unwrap().dirs.contains(path)
    }
}

#[cfg(test)]
impl FileSystem for MemoryFs {
    fn read_to_string(&self, path: &Path) -> CompileResult<String> {
        self.file(path).ok_or_else(|| CompileError::ReadSource {
            file: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        })
    }

    fn write(&self, path: &Path, content: &str) -> CompileResult<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !state.dirs.contains(parent) {
                return Err(CompileError::WriteArtifact {
                    file: path.to_path_buf(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "parent directory missing",
                    ),
                });
            }
        }
        state.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let state = self.state.lock().unwrap();
        state.files.contains_key(path) || state.dirs.contains(path)
    }

    fn create_dir_all(&self, path: &Path) -> CompileResult<()> {
        let mut state = self.state.lock().unwrap();
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            state.dirs.insert(current.clone());
        }
        Ok(())
    }
}
