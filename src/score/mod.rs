//! High-score persistence
//!
//! The engine only reads a high score once and reports new ones; storing
//! them is this module's job.

use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Loads and saves the all-time high score
pub trait ScoreStore {
    /// Called once at start-up
    fn load(&self) -> Result<u32>;

    /// Persist a new high score
    fn save(&mut self, value: u32) -> Result<()>;
}

/// High score kept in a text file holding a single integer
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for FileScoreStore {
    /// A missing file or unreadable number counts as 0
    fn load(&self) -> Result<u32> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(0),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read high score from {:?}", self.path))
            }
        };

        match contents.trim().parse::<u32>() {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!(path = ?self.path, %err, "ignoring malformed high score file");
                Ok(0)
            }
        }
    }

    fn save(&mut self, value: u32) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        std::fs::write(&self.path, value.to_string())
            .with_context(|| format!("Failed to write high score to {:?}", self.path))
    }
}

/// In-memory store for headless runs and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    value: u32,
    saves: usize,
}

impl MemoryScoreStore {
    pub fn new(value: u32) -> Self {
        Self { value, saves: 0 }
    }

    /// Number of times `save` was called
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self) -> Result<u32> {
        Ok(self.value)
    }

    fn save(&mut self, value: u32) -> Result<()> {
        self.value = value;
        self.saves += 1;
        Ok(())
    }
}

/// Load the high score, falling back to 0 when the store is unavailable
pub fn load_or_default(store: &dyn ScoreStore) -> u32 {
    match store.load() {
        Ok(value) => value,
        Err(err) => {
            warn!(error = %format!("{err:#}"), "high score unavailable, starting from 0");
            0
        }
    }
}

/// Save a new high score; failures are logged and otherwise ignored
pub fn save_or_warn(store: &mut dyn ScoreStore, value: u32) {
    if let Err(err) = store.save(value) {
        warn!(value, error = %format!("{err:#}"), "failed to persist high score");
    }
}
