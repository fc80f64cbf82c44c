//! In-memory [`CharacterStore`] used when no database is configured.

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::character::{Character, CharacterSeed, NewCharacter, UpdateCharacter};
use crate::error::CoreError;
use crate::store::{duplicate_name, same_name, CharacterStore, ImportReport};
use crate::types::DbId;

#[derive(Debug)]
struct MemoryState {
    records: Vec<Character>,
    /// Next id to hand out. Only ever grows, so ids are never reused.
    next_id: DbId,
}

impl MemoryState {
    fn name_taken(&self, name: &str, except: Option<DbId>) -> bool {
        self.records
            .iter()
            .any(|c| Some(c.id) != except && same_name(&c.name, name))
    }

    fn position(&self, id: DbId) -> Option<usize> {
        self.records.iter().position(|c| c.id == id)
    }

    fn push(&mut self, input: NewCharacter) -> Result<Character, CoreError> {
        let after = self
            .next_id
            .checked_add(1)
            .ok_or_else(|| CoreError::Internal("Character id space exhausted".into()))?;
        let character = Character::from_new(self.next_id, input);
        self.next_id = after;
        self.records.push(character.clone());
        Ok(character)
    }
}

/// Process-wide character store guarded by a single writer lock.
#[derive(Debug)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState {
                records: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Build a store from dataset entries, keeping their ids where possible.
    ///
    /// Entries without an id get one after the highest id in the file.
    /// Entries with a repeated or out-of-range id, a repeated name, or no
    /// name or role are dropped. `DbId::MAX` is out of range because the
    /// counter must always be able to move past the highest id.
    pub fn from_seeds(seeds: Vec<CharacterSeed>) -> Self {
        let mut accepted: Vec<(Option<DbId>, NewCharacter)> = Vec::with_capacity(seeds.len());
        let mut seen_ids = HashSet::new();
        let mut seen_names = HashSet::new();

        for seed in seeds {
            let Some(input) = seed.to_new_character() else {
                tracing::warn!(id = ?seed.id, "Dropping dataset entry without name or role");
                continue;
            };
            let id = seed.id.filter(|id| *id > 0);
            if id == Some(DbId::MAX) {
                tracing::warn!(id = ?id, name = %input.name, "Dropping dataset entry with out-of-range id");
                continue;
            }
            if id.is_some_and(|id| seen_ids.contains(&id)) {
                tracing::warn!(id = ?id, name = %input.name, "Dropping dataset entry with repeated id");
                continue;
            }
            let key = input.name.to_lowercase();
            if seen_names.contains(&key) {
                tracing::warn!(name = %input.name, "Dropping dataset entry with repeated name");
                continue;
            }
            seen_ids.extend(id);
            seen_names.insert(key);
            accepted.push((id, input));
        }

        // Every kept id is below `DbId::MAX`, so this cannot overflow.
        let mut next_id = seen_ids.iter().copied().max().unwrap_or(0) + 1;
        let mut records: Vec<Character> = Vec::with_capacity(accepted.len());
        for (id, input) in accepted {
            let id = match id {
                Some(id) => id,
                None => {
                    let Some(after) = next_id.checked_add(1) else {
                        tracing::warn!(name = %input.name, "Dropping dataset entry, no ids left");
                        continue;
                    };
                    std::mem::replace(&mut next_id, after)
                }
            };
            records.push(Character::from_new(id, input));
        }
        records.sort_by_key(|c| c.id);

        Self {
            state: RwLock::new(MemoryState { records, next_id }),
        }
    }
}

#[async_trait]
impl CharacterStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn get_by_id(&self, id: DbId) -> Result<Option<Character>, CoreError> {
        let state = self.state.read().await;
        Ok(state.records.iter().find(|c| c.id == id).cloned())
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Character>, CoreError> {
        let state = self.state.read().await;
        Ok(state
            .records
            .iter()
            .find(|c| same_name(&c.name, name))
            .cloned())
    }

    async fn insert(&self, input: NewCharacter) -> Result<Character, CoreError> {
        let mut state = self.state.write().await;
        if state.name_taken(&input.name, None) {
            return Err(duplicate_name(&input.name));
        }
        state.push(input)
    }

    async fn update_fields(
        &self,
        id: DbId,
        input: UpdateCharacter,
    ) -> Result<Option<Character>, CoreError> {
        let mut state = self.state.write().await;
        let Some(index) = state.position(id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            if state.name_taken(name, Some(id)) {
                return Err(duplicate_name(name));
            }
        }
        let character = &mut state.records[index];
        input.apply_to(character);
        Ok(Some(character.clone()))
    }

    async fn delete(&self, id: DbId) -> Result<bool, CoreError> {
        let mut state = self.state.write().await;
        match state.position(id) {
            Some(index) => {
                state.records.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_all(&self) -> Result<Vec<Character>, CoreError> {
        Ok(self.state.read().await.records.clone())
    }

    async fn import(&self, seeds: Vec<CharacterSeed>) -> Result<ImportReport, CoreError> {
        let mut state = self.state.write().await;
        let mut report = ImportReport::default();
        for seed in seeds {
            match seed.to_new_character() {
                Some(input) if !state.name_taken(&input.name, None) => {
                    state.push(input)?;
                    report.inserted += 1;
                }
                _ => report.skipped += 1,
            }
        }
        Ok(report)
    }
}
