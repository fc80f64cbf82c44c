//! Character entity model and DTOs.

use std::borrow::Cow;

use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

use crate::types::DbId;

/// A character record as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: DbId,
    pub name: String,
    pub house: String,
    pub animal: Option<String>,
    pub symbol: Option<String>,
    pub nickname: Option<String>,
    pub role: String,
    pub age: Option<i64>,
    /// Death year (or era marker) when the character has died.
    pub death: Option<i64>,
    pub strength: Option<String>,
}

impl Character {
    /// Materialize a record from a create DTO and a store-assigned id.
    pub fn from_new(id: DbId, input: NewCharacter) -> Self {
        Self {
            id,
            name: input.name,
            house: input.house,
            animal: input.animal,
            symbol: input.symbol,
            nickname: input.nickname,
            role: input.role,
            age: input.age,
            death: input.death,
            strength: input.strength,
        }
    }
}

/// DTO for creating a new character.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewCharacter {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "house must not be empty"))]
    pub house: String,
    pub animal: Option<String>,
    pub symbol: Option<String>,
    pub nickname: Option<String>,
    #[validate(length(min = 1, message = "role must not be empty"))]
    pub role: String,
    #[validate(range(min = 0, message = "age must not be negative"))]
    pub age: Option<i64>,
    pub death: Option<i64>,
    pub strength: Option<String>,
}

impl NewCharacter {
    /// Trim surrounding whitespace from the required text fields so that
    /// blank values fail validation.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.house = self.house.trim().to_string();
        self.role = self.role.trim().to_string();
        self
    }
}

/// DTO for partially updating a character.
///
/// Required fields use `Option<String>`: absent (or `null`) leaves the value
/// untouched. Optional fields use `Option<Option<T>>`: absent leaves the
/// value untouched, `null` clears it, anything else sets it. Keys that are
/// not listed here are dropped during deserialization.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_update_numbers"))]
pub struct UpdateCharacter {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "house must not be empty"))]
    pub house: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub animal: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub symbol: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub nickname: Option<Option<String>>,
    #[validate(length(min = 1, message = "role must not be empty"))]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub age: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    pub death: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    pub strength: Option<Option<String>>,
}

impl UpdateCharacter {
    /// Trim the required text fields, mirroring [`NewCharacter::normalized`].
    pub fn normalized(mut self) -> Self {
        for field in [&mut self.name, &mut self.house, &mut self.role] {
            if let Some(value) = field.as_mut() {
                *value = value.trim().to_string();
            }
        }
        self
    }

    /// Apply the supplied fields to `target`, leaving everything else as is.
    pub fn apply_to(&self, target: &mut Character) {
        if let Some(name) = &self.name {
            target.name.clone_from(name);
        }
        if let Some(house) = &self.house {
            target.house.clone_from(house);
        }
        if let Some(role) = &self.role {
            target.role.clone_from(role);
        }
        if let Some(animal) = &self.animal {
            target.animal.clone_from(animal);
        }
        if let Some(symbol) = &self.symbol {
            target.symbol.clone_from(symbol);
        }
        if let Some(nickname) = &self.nickname {
            target.nickname.clone_from(nickname);
        }
        if let Some(age) = self.age {
            target.age = age;
        }
        if let Some(death) = self.death {
            target.death = death;
        }
        if let Some(strength) = &self.strength {
            target.strength.clone_from(strength);
        }
    }
}

/// Marks a field as present whenever its key appears, even with `null`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn validate_update_numbers(input: &UpdateCharacter) -> Result<(), ValidationError> {
    if matches!(input.age, Some(Some(age)) if age < 0) {
        return Err(ValidationError::new("range")
            .with_message(Cow::Borrowed("age must not be negative")));
    }
    Ok(())
}

/// One entry of the JSON dataset file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CharacterSeed {
    pub id: Option<DbId>,
    pub name: Option<String>,
    pub house: Option<String>,
    pub animal: Option<String>,
    pub symbol: Option<String>,
    pub nickname: Option<String>,
    pub role: Option<String>,
    pub age: Option<i64>,
    pub death: Option<i64>,
    pub strength: Option<String>,
}

impl CharacterSeed {
    /// Convert into a create DTO. Returns `None` when `name` or `role` is
    /// missing or blank; a missing `house` becomes an empty string.
    pub fn to_new_character(&self) -> Option<NewCharacter> {
        let name = non_blank(self.name.as_deref())?;
        let role = non_blank(self.role.as_deref())?;
        Some(NewCharacter {
            name,
            house: self.house.as_deref().unwrap_or_default().trim().to_string(),
            animal: self.animal.clone(),
            symbol: self.symbol.clone(),
            nickname: self.nickname.clone(),
            role,
            age: self.age,
            death: self.death,
            strength: self.strength.clone(),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
