//! Repository for the persisted API settings.

use std::sync::Arc;

use dialogue_core::settings::ApiSettings;
use dialogue_events::bus::SETTINGS_SAVED;
use dialogue_events::{DomainEvent, EventBus};

use crate::store::{KeyValueStore, SETTINGS_KEY};
use crate::DbError;

pub struct SettingsRepo {
    store: Arc<dyn KeyValueStore>,
    events: Arc<EventBus>,
}

impl SettingsRepo {
    pub fn new(store: Arc<dyn KeyValueStore>, events: Arc<EventBus>) -> Self {
        Self { store, events }
    }

    /// Stored settings, or defaults (test mode) when none were saved.
    pub async fn load(&self) -> Result<ApiSettings, DbError> {
        match self.store.get(SETTINGS_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(ApiSettings::default()),
        }
    }

    pub async fn save(&self, settings: &ApiSettings) -> Result<(), DbError> {
        let raw = serde_json::to_string(settings)?;
        self.store.set(SETTINGS_KEY, &raw).await?;

        // The key stays out of both the log and the event payload.
        tracing::info!(endpoint = %settings.endpoint, model = %settings.model, "API settings saved");
        self.events.publish(DomainEvent::new(SETTINGS_SAVED).with_payload(serde_json::json!({
            "endpoint": settings.endpoint,
            "model": settings.model,
        })));
        Ok(())
    }
}
