//! Reads the character dataset: a JSON array with one object per character.

use std::path::{Path, PathBuf};

use crate::character::CharacterSeed;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read dataset {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse dataset {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl LoadError {
    pub fn is_missing_file(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Parse dataset JSON. Missing keys default to `None`.
pub fn parse_seeds(json: &str) -> Result<Vec<CharacterSeed>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Read and parse the dataset file at `path`.
pub async fn load_seeds(path: &Path) -> Result<Vec<CharacterSeed>, LoadError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let seeds = parse_seeds(&raw).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), count = seeds.len(), "Loaded character dataset");
    Ok(seeds)
}
