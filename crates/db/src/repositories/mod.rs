//! Repositories over the key-value store.

pub mod character_repo;
pub mod settings_repo;

pub use character_repo::{CharacterExport, CharacterRepo, ImportSummary};
pub use settings_repo::SettingsRepo;
