//! Where save text lives.

use crate::core::constants::{SAVE_DIR_NAME, SAVE_FILE_NAME};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save file i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("invalid save, ignored: {0}")]
    Parse(String),
    #[error("could not encode save: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A slot that holds one serialized save.
pub trait SaveStore {
    /// The stored text, or `None` if nothing has been saved yet.
    fn load(&self) -> Result<Option<String>, SaveError>;

    fn save(&mut self, contents: &str) -> Result<(), SaveError>;

    fn clear(&mut self) -> Result<(), SaveError>;
}

/// Get the ~/.idle-miner/ directory path, creating it if needed.
pub fn game_dir() -> io::Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "Could not determine home directory",
        )
    })?;
    let dir = home_dir.join(SAVE_DIR_NAME);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// JSON save file on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// The default save at ~/.idle-miner/save.json.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            path: game_dir()?.join(SAVE_FILE_NAME),
        })
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SaveStore for FileStore {
    fn load(&self) -> Result<Option<String>, SaveError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, contents: &str) -> Result<(), SaveError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        // The old save stays in place until the new one is fully written.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SaveError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory slot for tests and the simulator.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    contents: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Some(contents.into()),
        }
    }
}

impl SaveStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, SaveError> {
        Ok(self.contents.clone())
    }

    fn save(&mut self, contents: &str) -> Result<(), SaveError> {
        self.contents = Some(contents.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SaveError> {
        self.contents = None;
        Ok(())
    }
}
