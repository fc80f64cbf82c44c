//! Domain layer for the Westeros character API.
//!
//! Everything in here is storage-agnostic: the character model and DTOs,
//! the list query engine (filter, sort, paginate), the [`store::CharacterStore`]
//! trait with its in-memory implementation, and the dataset loader.

pub mod character;
pub mod error;
pub mod loader;
pub mod memory;
pub mod query;
pub mod roles;
pub mod store;
pub mod types;
