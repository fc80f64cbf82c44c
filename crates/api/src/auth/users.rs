//! Directory of accounts allowed to log in.
//!
//! Accounts come from a JSON file (`USERS_FILE`) of the form
//! `[{"username": "...", "password_hash": "$argon2id$...", "role": "admin"}]`.
//! An entry without a `role` is a regular user.
//! Hashes can be produced with the `westeros-hash-password` binary.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use westeros_core::roles::ROLE_USER;

use crate::auth::password::verify_password;

/// One account entry.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRecord {
    pub username: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Defaults to the regular user role when omitted.
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    ROLE_USER.to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum UserDirectoryError {
    #[error("Failed to read users file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse users file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// In-memory lookup of accounts by username.
#[derive(Debug, Default)]
pub struct UserDirectory {
    users: HashMap<String, UserRecord>,
}

impl UserDirectory {
    pub fn new(records: impl IntoIterator<Item = UserRecord>) -> Self {
        let users = records
            .into_iter()
            .map(|record| (record.username.clone(), record))
            .collect();
        Self { users }
    }

    /// Load the directory from `path`. A missing file yields an empty
    /// directory, so every login attempt fails until accounts are configured.
    pub async fn load(path: &Path) -> Result<Self, UserDirectoryError> {
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "Users file not found, logins are disabled");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(UserDirectoryError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let records: Vec<UserRecord> =
            serde_json::from_str(&raw).map_err(|source| UserDirectoryError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::info!(path = %path.display(), count = records.len(), "Loaded user directory");
        Ok(Self::new(records))
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Check a username/password pair.
    ///
    /// Returns the account on success and `None` for an unknown user or a
    /// wrong password. A stored hash that cannot be parsed is an error.
    pub fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<&UserRecord>, argon2::password_hash::Error> {
        let Some(record) = self.users.get(username) else {
            return Ok(None);
        };
        let valid = verify_password(password, &record.password_hash)?;
        Ok(valid.then_some(record))
    }
}
