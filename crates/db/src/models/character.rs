//! Row type for the `characters` table.

use sqlx::FromRow;
use westeros_core::character::Character;
use westeros_core::types::DbId;

/// A row from the `characters` table.
#[derive(Debug, Clone, FromRow)]
pub struct CharacterRow {
    pub id: DbId,
    pub name: String,
    pub house: String,
    pub animal: Option<String>,
    pub symbol: Option<String>,
    pub nickname: Option<String>,
    pub role: String,
    pub age: Option<i64>,
    pub death: Option<i64>,
    pub strength: Option<String>,
}

impl From<CharacterRow> for Character {
    fn from(row: CharacterRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            house: row.house,
            animal: row.animal,
            symbol: row.symbol,
            nickname: row.nickname,
            role: row.role,
            age: row.age,
            death: row.death,
            strength: row.strength,
        }
    }
}
