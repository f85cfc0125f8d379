//! Storage locations for one notes installation.
//!
//! # Responsibility
//! - Resolve the data directory and the paths derived from it.
//! - Create those directories on demand.
//!
//! # Invariants
//! - Resolution order: explicit path, then `NOTES_DATA_DIR`, then the
//!   platform data directory.
//! - Every derived path lives under `data_dir`.

use directories::ProjectDirs;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};

/// Environment variable overriding the platform data directory.
pub const DATA_DIR_ENV: &str = "NOTES_DATA_DIR";

const DB_FILE_NAME: &str = "notes.sqlite3";
const IMAGES_DIR_NAME: &str = "images";
const LOGS_DIR_NAME: &str = "logs";

#[derive(Debug)]
pub enum ConfigError {
    /// No explicit path, no env override and no platform data directory.
    NoDataDir,
    CreateDir { path: PathBuf, source: io::Error },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoDataDir => write!(f, "could not determine notes data directory"),
            Self::CreateDir { path, source } => {
                write!(f, "failed to create directory `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoDataDir => None,
            Self::CreateDir { source, .. } => Some(source),
        }
    }
}

/// Paths used by the store, the image manager and file logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesConfig {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub images_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl NotesConfig {
    /// Derives all paths from one data directory.
    pub fn from_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            db_path: data_dir.join(DB_FILE_NAME),
            images_dir: data_dir.join(IMAGES_DIR_NAME),
            log_dir: data_dir.join(LOGS_DIR_NAME),
            data_dir,
        }
    }

    /// Resolves the data directory from `explicit`, the environment or the
    /// platform default.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(dir) = explicit {
            return Ok(Self::from_data_dir(dir));
        }
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|value| !value.is_empty()) {
            return Ok(Self::from_data_dir(PathBuf::from(dir)));
        }
        let dirs = ProjectDirs::from("com", "example", "notes").ok_or(ConfigError::NoDataDir)?;
        Ok(Self::from_data_dir(dirs.data_local_dir()))
    }

    /// Creates the data, image and log directories.
    pub fn ensure_dirs(&self) -> Result<(), ConfigError> {
        for dir in [&self.data_dir, &self.images_dir, &self.log_dir] {
            std::fs::create_dir_all(dir).map_err(|source| ConfigError::CreateDir {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(())
    }
}
