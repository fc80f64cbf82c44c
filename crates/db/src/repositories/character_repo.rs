//! Repository for the `characters` table.

use sqlx::{PgConnection, PgPool};
use westeros_core::character::{NewCharacter, UpdateCharacter};
use westeros_core::types::DbId;

use crate::models::character::CharacterRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, house, animal, symbol, nickname, role, age, death, strength";

/// Name of the case-insensitive unique index on `characters.name`.
pub const NAME_UNIQUE_INDEX: &str = "uq_characters_name_lower";

/// Provides CRUD operations for characters.
pub struct CharacterRepo;

impl CharacterRepo {
    /// Insert a new character, returning the created row.
    ///
    /// A name that differs only in case from an existing one violates
    /// [`NAME_UNIQUE_INDEX`].
    pub async fn create(pool: &PgPool, input: &NewCharacter) -> Result<CharacterRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO characters (name, house, animal, symbol, nickname, role, age, death, strength)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CharacterRow>(&query)
            .bind(&input.name)
            .bind(&input.house)
            .bind(&input.animal)
            .bind(&input.symbol)
            .bind(&input.nickname)
            .bind(&input.role)
            .bind(input.age)
            .bind(input.death)
            .bind(&input.strength)
            .fetch_one(pool)
            .await
    }

    /// Insert a character unless the name is already taken.
    ///
    /// Returns the new id, or `None` when the row was skipped. Takes a
    /// connection so callers can batch inserts in one transaction.
    pub async fn create_if_absent(
        conn: &mut PgConnection,
        input: &NewCharacter,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "INSERT INTO characters (name, house, animal, symbol, nickname, role, age, death, strength)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             ON CONFLICT DO NOTHING
             RETURNING id",
        )
        .bind(&input.name)
        .bind(&input.house)
        .bind(&input.animal)
        .bind(&input.symbol)
        .bind(&input.nickname)
        .bind(&input.role)
        .bind(input.age)
        .bind(input.death)
        .bind(&input.strength)
        .fetch_optional(conn)
        .await
    }

    /// Find a character by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CharacterRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM characters WHERE id = $1");
        sqlx::query_as::<_, CharacterRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a character whose name equals `name`, ignoring case.
    pub async fn find_by_name(
        pool: &PgPool,
        name: &str,
    ) -> Result<Option<CharacterRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM characters WHERE LOWER(name) = LOWER($1)");
        sqlx::query_as::<_, CharacterRow>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List every character ordered by id.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<CharacterRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM characters ORDER BY id ASC");
        sqlx::query_as::<_, CharacterRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Update a character. Only fields present in `input` are applied.
    ///
    /// Nullable columns take a presence flag so an explicit `null` clears
    /// them. Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCharacter,
    ) -> Result<Option<CharacterRow>, sqlx::Error> {
        let query = format!(
            "UPDATE characters SET
                name = COALESCE($2, name),
                house = COALESCE($3, house),
                role = COALESCE($4, role),
                animal = CASE WHEN $5 THEN $6 ELSE animal END,
                symbol = CASE WHEN $7 THEN $8 ELSE symbol END,
                nickname = CASE WHEN $9 THEN $10 ELSE nickname END,
                age = CASE WHEN $11 THEN $12 ELSE age END,
                death = CASE WHEN $13 THEN $14 ELSE death END,
                strength = CASE WHEN $15 THEN $16 ELSE strength END,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CharacterRow>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.house)
            .bind(&input.role)
            .bind(input.animal.is_some())
            .bind(input.animal.as_ref().and_then(|v| v.as_deref()))
            .bind(input.symbol.is_some())
            .bind(input.symbol.as_ref().and_then(|v| v.as_deref()))
            .bind(input.nickname.is_some())
            .bind(input.nickname.as_ref().and_then(|v| v.as_deref()))
            .bind(input.age.is_some())
            .bind(input.age.flatten())
            .bind(input.death.is_some())
            .bind(input.death.flatten())
            .bind(input.strength.is_some())
            .bind(input.strength.as_ref().and_then(|v| v.as_deref()))
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a character by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM characters WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
