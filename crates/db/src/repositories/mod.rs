mod character_repo;

pub use character_repo::{CharacterRepo, NAME_UNIQUE_INDEX};
