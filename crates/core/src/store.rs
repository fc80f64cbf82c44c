//! The record store contract shared by the in-memory and PostgreSQL backings.

use async_trait::async_trait;
use serde::Serialize;

use crate::character::{Character, CharacterSeed, NewCharacter, UpdateCharacter};
use crate::error::CoreError;
use crate::types::DbId;

/// Outcome of a bulk import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub inserted: usize,
    pub skipped: usize,
}

/// Owner of the canonical character set.
///
/// Name comparisons are case-insensitive and exact. Implementations must make
/// the duplicate-name check and the write it guards atomic with respect to
/// other writers.
#[async_trait]
pub trait CharacterStore: Send + Sync {
    /// Short backing name reported by the health endpoint.
    fn backend(&self) -> &'static str;

    async fn get_by_id(&self, id: DbId) -> Result<Option<Character>, CoreError>;

    async fn get_by_name(&self, name: &str) -> Result<Option<Character>, CoreError>;

    /// Insert a new record under a fresh id.
    ///
    /// Fails with [`CoreError::Duplicate`] without mutating anything when the
    /// name is already taken.
    async fn insert(&self, input: NewCharacter) -> Result<Character, CoreError>;

    /// Apply a partial update. Returns `None` if no record has `id`.
    async fn update_fields(
        &self,
        id: DbId,
        input: UpdateCharacter,
    ) -> Result<Option<Character>, CoreError>;

    /// Remove a record permanently. Returns `true` if one was removed.
    async fn delete(&self, id: DbId) -> Result<bool, CoreError>;

    /// Snapshot of every record, ordered by id.
    async fn list_all(&self) -> Result<Vec<Character>, CoreError>;

    /// Insert every seed whose name is not taken yet. Seeds without a name or
    /// role are skipped; seed ids are ignored.
    async fn import(&self, seeds: Vec<CharacterSeed>) -> Result<ImportReport, CoreError>;
}

/// The error returned when a name collides with an existing record.
pub fn duplicate_name(name: &str) -> CoreError {
    CoreError::Duplicate(format!("Character with name '{name}' already exists"))
}

/// Case-insensitive name equality used for duplicate detection.
pub fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
