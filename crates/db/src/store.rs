//! [`CharacterStore`] backed by PostgreSQL.

use async_trait::async_trait;
use westeros_core::character::{Character, CharacterSeed, NewCharacter, UpdateCharacter};
use westeros_core::error::CoreError;
use westeros_core::store::{duplicate_name, CharacterStore, ImportReport};
use westeros_core::types::DbId;

use crate::repositories::{CharacterRepo, NAME_UNIQUE_INDEX};
use crate::DbPool;

/// PostgreSQL violation code for unique constraints.
const UNIQUE_VIOLATION: &str = "23505";

/// Character store persisting to the `characters` table.
#[derive(Debug, Clone)]
pub struct PgCharacterStore {
    pool: DbPool,
}

impl PgCharacterStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Whether `err` is a violation of the case-insensitive name index.
fn is_name_conflict(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
                && db_err.constraint() == Some(NAME_UNIQUE_INDEX)
        }
        _ => false,
    }
}

/// Convert an unexpected database failure into an internal error.
fn internal(err: sqlx::Error) -> CoreError {
    CoreError::Internal(format!("Database error: {err}"))
}

#[async_trait]
impl CharacterStore for PgCharacterStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn get_by_id(&self, id: DbId) -> Result<Option<Character>, CoreError> {
        let row = CharacterRepo::find_by_id(&self.pool, id)
            .await
            .map_err(internal)?;
        Ok(row.map(Character::from))
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Character>, CoreError> {
        let row = CharacterRepo::find_by_name(&self.pool, name)
            .await
            .map_err(internal)?;
        Ok(row.map(Character::from))
    }

    async fn insert(&self, input: NewCharacter) -> Result<Character, CoreError> {
        match CharacterRepo::create(&self.pool, &input).await {
            Ok(row) => Ok(row.into()),
            Err(err) if is_name_conflict(&err) => Err(duplicate_name(&input.name)),
            Err(err) => Err(internal(err)),
        }
    }

    async fn update_fields(
        &self,
        id: DbId,
        input: UpdateCharacter,
    ) -> Result<Option<Character>, CoreError> {
        match CharacterRepo::update(&self.pool, id, &input).await {
            Ok(row) => Ok(row.map(Character::from)),
            Err(err) if is_name_conflict(&err) => {
                Err(duplicate_name(input.name.as_deref().unwrap_or_default()))
            }
            Err(err) => Err(internal(err)),
        }
    }

    async fn delete(&self, id: DbId) -> Result<bool, CoreError> {
        CharacterRepo::delete(&self.pool, id).await.map_err(internal)
    }

    async fn list_all(&self) -> Result<Vec<Character>, CoreError> {
        let rows = CharacterRepo::list_all(&self.pool).await.map_err(internal)?;
        Ok(rows.into_iter().map(Character::from).collect())
    }

    async fn import(&self, seeds: Vec<CharacterSeed>) -> Result<ImportReport, CoreError> {
        let mut tx = self.pool.begin().await.map_err(internal)?;
        let mut report = ImportReport::default();

        for seed in &seeds {
            let Some(input) = seed.to_new_character() else {
                report.skipped += 1;
                continue;
            };
            match CharacterRepo::create_if_absent(&mut tx, &input)
                .await
                .map_err(internal)?
            {
                Some(_) => report.inserted += 1,
                None => report.skipped += 1,
            }
        }

        tx.commit().await.map_err(internal)?;
        tracing::info!(
            inserted = report.inserted,
            skipped = report.skipped,
            "Imported characters into database"
        );
        Ok(report)
    }
}
