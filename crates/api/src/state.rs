use std::sync::Arc;
use std::time::Duration;

use dialogue_db::repositories::{CharacterRepo, SettingsRepo};
use dialogue_db::{DbPool, KeyValueStore, SqliteStore};
use dialogue_events::EventBus;
use dialogue_llm::{ChatCompletionClient, RemoteGenerationClient};
use dialogue_pipeline::GenerationOrchestrator;

use crate::config::ServerConfig;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheaply cloneable; every service is constructed once at startup.
#[derive(Clone)]
pub struct AppState {
    /// Pool behind the key-value store, kept for health checks.
    pub pool: DbPool,
    pub config: Arc<ServerConfig>,
    pub event_bus: Arc<EventBus>,
    pub characters: Arc<CharacterRepo>,
    pub settings: Arc<SettingsRepo>,
    pub orchestrator: Arc<GenerationOrchestrator>,
}

impl AppState {
    /// Wire the repositories, generation client and orchestrator over a
    /// migrated pool.
    pub fn new(pool: DbPool, config: ServerConfig, event_bus: Arc<EventBus>) -> Self {
        let store: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::new(pool.clone()));
        let characters = Arc::new(CharacterRepo::new(Arc::clone(&store), Arc::clone(&event_bus)));
        let settings = Arc::new(SettingsRepo::new(store, Arc::clone(&event_bus)));

        let generator = Arc::new(
            RemoteGenerationClient::new(ChatCompletionClient::new())
                .with_simulated_latency(Duration::from_millis(config.test_mode_latency_ms)),
        );
        let orchestrator = Arc::new(GenerationOrchestrator::new(
            Arc::clone(&characters),
            Arc::clone(&settings),
            generator,
        ));

        Self {
            pool,
            config: Arc::new(config),
            event_bus,
            characters,
            settings,
            orchestrator,
        }
    }
}
