pub mod lines;

pub use lines::{DocumentLines, LineEnding};

use relative_path::{RelativePath, RelativePathBuf};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to replace {path}: {source}")]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid notes directory: {0}")]
    InvalidNotesDir(String),
}

/// Whole-document storage addressed by paths relative to a notes root.
///
/// Every call is a full snapshot in or out; nothing is held open between calls.
pub trait DocumentStore {
    fn read(&self, id: &RelativePath) -> Result<String, IoError>;

    /// Replace the document's full content, creating it if needed
    fn write(&self, id: &RelativePath, content: &str) -> Result<(), IoError>;

    /// Remove the document, returning whether it existed
    fn delete(&self, id: &RelativePath) -> Result<bool, IoError>;

    fn exists(&self, id: &RelativePath) -> bool;
}

/// Documents stored as files under a notes directory
#[derive(Debug, Clone)]
pub struct FsStore {
    notes_root: PathBuf,
}

impl FsStore {
    pub fn new(notes_root: impl Into<PathBuf>) -> Self {
        Self {
            notes_root: notes_root.into(),
        }
    }

    pub fn notes_root(&self) -> &Path {
        &self.notes_root
    }
}

impl DocumentStore for FsStore {
    fn read(&self, id: &RelativePath) -> Result<String, IoError> {
        read_file(id, &self.notes_root)
    }

    fn write(&self, id: &RelativePath, content: &str) -> Result<(), IoError> {
        write_file(id, &self.notes_root, content)
    }

    fn delete(&self, id: &RelativePath) -> Result<bool, IoError> {
        delete_file(id, &self.notes_root)
    }

    fn exists(&self, id: &RelativePath) -> bool {
        id.to_path(&self.notes_root).is_file()
    }
}

/// Documents held in memory, for tests and embedding hosts
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<BTreeMap<RelativePathBuf, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with documents
    pub fn with_documents<I, P, C>(documents: I) -> Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<RelativePathBuf>,
        C: Into<String>,
    {
        let documents = documents
            .into_iter()
            .map(|(id, content)| (id.into(), content.into()))
            .collect();
        Self {
            documents: Mutex::new(documents),
        }
    }

    fn documents(&self) -> std::sync::MutexGuard<'_, BTreeMap<RelativePathBuf, String>> {
        // every mutation is a single insert or remove, so a poisoned map is still whole
        self.documents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DocumentStore for MemoryStore {
    fn read(&self, id: &RelativePath) -> Result<String, IoError> {
        self.documents()
            .get(id)
            .cloned()
            .ok_or_else(|| IoError::NotFound(id.to_path("")))
    }

    fn write(&self, id: &RelativePath, content: &str) -> Result<(), IoError> {
        self.documents()
            .insert(id.to_relative_path_buf(), content.to_string());
        Ok(())
    }

    fn delete(&self, id: &RelativePath) -> Result<bool, IoError> {
        Ok(self.documents().remove(id).is_some())
    }

    fn exists(&self, id: &RelativePath) -> bool {
        self.documents().contains_key(id)
    }
}

/// Read a document file and return its content
pub fn read_file(relative_path: &RelativePath, notes_root: &Path) -> Result<String, IoError> {
    let absolute_path = relative_path.to_path(notes_root);
    if !absolute_path.is_file() {
        return Err(IoError::NotFound(absolute_path));
    }
    fs::read_to_string(&absolute_path).map_err(IoError::Io)
}

/// Replace a document file in one step.
///
/// Content goes to a temporary file in the same directory which is then
/// renamed over the target, so readers never observe a half-written document.
pub fn write_file(
    relative_path: &RelativePath,
    notes_root: &Path,
    content: &str,
) -> Result<(), IoError> {
    let absolute_path = relative_path.to_path(notes_root);

    // Create parent directories if they don't exist
    let parent = match absolute_path.parent() {
        Some(parent) => parent.to_path_buf(),
        None => notes_root.to_path_buf(),
    };
    fs::create_dir_all(&parent).map_err(IoError::Io)?;

    let mut temp = tempfile::NamedTempFile::new_in(&parent)?;
    temp.write_all(content.as_bytes())?;
    temp.as_file().sync_all()?;
    temp.persist(&absolute_path).map_err(|e| IoError::Persist {
        path: absolute_path.clone(),
        source: e.error,
    })?;

    Ok(())
}

/// Delete a document file, returning whether it existed
pub fn delete_file(relative_path: &RelativePath, notes_root: &Path) -> Result<bool, IoError> {
    let absolute_path = relative_path.to_path(notes_root);
    match fs::remove_file(&absolute_path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(IoError::Io(e)),
    }
}

pub fn validate_notes_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidNotesDir(
            "Directory does not exist".to_string(),
        ));
    }

    Ok(())
}
