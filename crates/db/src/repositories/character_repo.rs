//! Repository for the persisted character collection.
//!
//! The collection is one JSON array under [`CHARACTERS_KEY`]. Every
//! mutation loads the array, changes it, writes the whole array back and
//! then publishes a [`DomainEvent`].

use std::sync::Arc;

use chrono::Utc;
use dialogue_core::character::Character;
use dialogue_core::error::CoreError;
use dialogue_core::thumbnail::downscale_avatar;
use dialogue_events::bus::{CHARACTERS_IMPORTED, CHARACTER_DELETED, CHARACTER_SAVED};
use dialogue_events::{DomainEvent, EventBus};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::store::{KeyValueStore, CHARACTERS_KEY};
use crate::DbError;

/// Outcome of [`CharacterRepo::import_merge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Records appended to the collection.
    pub added: usize,
    /// Records that replaced an existing id.
    pub replaced: usize,
    /// Input entries dropped by validation.
    pub skipped: usize,
}

impl ImportSummary {
    pub fn imported(&self) -> usize {
        self.added + self.replaced
    }
}

/// A serialized collection ready for download.
#[derive(Debug, Clone)]
pub struct CharacterExport {
    /// `dialogue-characters-YYYY-MM-DD.json`.
    pub filename: String,
    /// Pretty-printed JSON array.
    pub json: String,
}

/// CRUD over characters, layered on a [`KeyValueStore`].
pub struct CharacterRepo {
    store: Arc<dyn KeyValueStore>,
    events: Arc<EventBus>,
    // Serializes read-modify-write cycles.
    write_lock: Mutex<()>,
}

impl CharacterRepo {
    pub fn new(store: Arc<dyn KeyValueStore>, events: Arc<EventBus>) -> Self {
        Self {
            store,
            events,
            write_lock: Mutex::new(()),
        }
    }

    /// All characters in stored order. Empty when nothing is stored.
    pub async fn list(&self) -> Result<Vec<Character>, DbError> {
        match self.store.get(CHARACTERS_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    pub async fn find(&self, id: &str) -> Result<Option<Character>, DbError> {
        Ok(self.list().await?.into_iter().find(|c| c.id == id))
    }

    /// Like [`find`](Self::find) but fails with `NotFound` when absent.
    pub async fn get(&self, id: &str) -> Result<Character, DbError> {
        self.find(id).await?.ok_or_else(|| {
            DbError::Core(CoreError::NotFound {
                entity: "character",
                id: id.to_string(),
            })
        })
    }

    /// Replace the record with the same id in place, or append.
    ///
    /// Oversized inline avatars are downscaled first; the returned record is
    /// what was written.
    pub async fn upsert(&self, mut character: Character) -> Result<Character, DbError> {
        if let Some(avatar) = character.avatar.take() {
            character.avatar = Some(downscale_avatar(avatar).await?);
        }

        let _guard = self.write_lock.lock().await;
        let mut all = self.list().await?;
        match all.iter_mut().find(|c| c.id == character.id) {
            Some(existing) => *existing = character.clone(),
            None => all.push(character.clone()),
        }
        self.write_all(&all).await?;

        tracing::info!(character_id = %character.id, name = %character.name, "Character saved");
        self.events.publish(
            DomainEvent::new(CHARACTER_SAVED)
                .with_source(character.id.clone())
                .with_payload(serde_json::json!({ "name": character.name })),
        );
        Ok(character)
    }

    /// Remove the record with `id`. Returns `false`, and writes nothing,
    /// when no such record exists.
    pub async fn delete(&self, id: &str) -> Result<bool, DbError> {
        let _guard = self.write_lock.lock().await;
        let mut all = self.list().await?;
        let before = all.len();
        all.retain(|c| c.id != id);
        if all.len() == before {
            tracing::debug!(character_id = %id, "Delete of unknown character ignored");
            return Ok(false);
        }
        self.write_all(&all).await?;

        tracing::info!(character_id = %id, "Character deleted");
        self.events
            .publish(DomainEvent::new(CHARACTER_DELETED).with_source(id.to_string()));
        Ok(true)
    }

    /// Merge an imported JSON array into the collection by id.
    ///
    /// Entries without a non-empty string `id` and `name` are dropped.
    /// Fails with `Validation`, leaving the store untouched, when `raw` is
    /// not an array or no entry survives.
    pub async fn import_merge(&self, raw: &serde_json::Value) -> Result<ImportSummary, DbError> {
        let entries = raw.as_array().ok_or_else(|| {
            CoreError::Validation("Import file must contain an array of characters".to_string())
        })?;

        let valid: Vec<Character> = entries
            .iter()
            .filter_map(Character::from_import_record)
            .collect();
        if valid.is_empty() {
            return Err(CoreError::Validation(
                "No valid characters found in import file".to_string(),
            )
            .into());
        }

        let mut summary = ImportSummary {
            added: 0,
            replaced: 0,
            skipped: entries.len() - valid.len(),
        };

        let _guard = self.write_lock.lock().await;
        let mut all = self.list().await?;
        for incoming in valid {
            match all.iter_mut().find(|c| c.id == incoming.id) {
                Some(existing) => {
                    *existing = incoming;
                    summary.replaced += 1;
                }
                None => {
                    all.push(incoming);
                    summary.added += 1;
                }
            }
        }
        self.write_all(&all).await?;

        tracing::info!(
            added = summary.added,
            replaced = summary.replaced,
            skipped = summary.skipped,
            "Characters imported"
        );
        self.events.publish(
            DomainEvent::new(CHARACTERS_IMPORTED).with_payload(serde_json::json!({
                "added": summary.added,
                "replaced": summary.replaced,
                "skipped": summary.skipped,
            })),
        );
        Ok(summary)
    }

    /// Serialize the collection for download. Fails with `Validation` when
    /// there is nothing to export.
    pub async fn export(&self) -> Result<CharacterExport, DbError> {
        let all = self.list().await?;
        if all.is_empty() {
            return Err(CoreError::Validation("No characters to export".to_string()).into());
        }
        Ok(CharacterExport {
            filename: format!("dialogue-characters-{}.json", Utc::now().format("%Y-%m-%d")),
            json: serde_json::to_string_pretty(&all)?,
        })
    }

    async fn write_all(&self, all: &[Character]) -> Result<(), DbError> {
        let raw = serde_json::to_string(all)?;
        self.store.set(CHARACTERS_KEY, &raw).await
    }
}
