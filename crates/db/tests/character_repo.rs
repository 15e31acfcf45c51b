//! Integration tests for the character repository against SQLite.

use std::io::Cursor;
use std::sync::Arc;

use assert_matches::assert_matches;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use dialogue_core::character::Character;
use dialogue_core::error::CoreError;
use dialogue_core::thumbnail::{AVATAR_SIZE_THRESHOLD, THUMBNAIL_MAX_DIMENSION};
use dialogue_db::repositories::CharacterRepo;
use dialogue_db::store::CHARACTERS_KEY;
use dialogue_db::{DbError, KeyValueStore, SqliteStore};
use dialogue_events::bus::{CHARACTERS_IMPORTED, CHARACTER_DELETED, CHARACTER_SAVED};
use dialogue_events::EventBus;
use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use tokio::sync::broadcast::error::TryRecvError;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn sqlite_store() -> Arc<SqliteStore> {
    let pool = dialogue_db::create_pool("sqlite::memory:").await.unwrap();
    dialogue_db::run_migrations(&pool).await.unwrap();
    Arc::new(SqliteStore::new(pool))
}

async fn repo() -> (CharacterRepo, Arc<SqliteStore>, Arc<EventBus>) {
    let store = sqlite_store().await;
    let bus = Arc::new(EventBus::default());
    let repo = CharacterRepo::new(store.clone(), Arc::clone(&bus));
    (repo, store, bus)
}

fn character(id: &str, name: &str) -> Character {
    Character {
        id: id.to_string(),
        name: name.to_string(),
        age: None,
        personality: None,
        background: None,
        relationship: None,
        texting_style: None,
        avatar: None,
    }
}

/// A PNG of random noise; it barely compresses, so a 400x300 image is well
/// over the thumbnail threshold once base64-encoded.
fn noisy_png_data_url(width: u32, height: u32) -> String {
    let mut rng = StdRng::seed_from_u64(11);
    let img = RgbImage::from_fn(width, height, |_, _| Rgb([rng.random(), rng.random(), rng.random()]));
    let mut png = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .unwrap();
    format!("data:image/png;base64,{}", STANDARD.encode(&png))
}

// ---------------------------------------------------------------------------
// list / upsert / delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_store_lists_nothing() {
    let (repo, _, _) = repo().await;
    assert!(repo.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn upsert_same_id_replaces_in_place() {
    let (repo, _, _) = repo().await;
    repo.upsert(character("a", "Alice")).await.unwrap();
    repo.upsert(character("b", "Bob")).await.unwrap();
    repo.upsert(character("a", "Alicia")).await.unwrap();

    let all = repo.list().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, "a");
    assert_eq!(all[0].name, "Alicia");
    assert_eq!(all[1].name, "Bob");
}

#[tokio::test]
async fn delete_unknown_id_leaves_collection_unchanged() {
    let (repo, _, _) = repo().await;
    repo.upsert(character("a", "Alice")).await.unwrap();

    assert!(!repo.delete("missing").await.unwrap());
    assert_eq!(repo.list().await.unwrap(), vec![character("a", "Alice")]);

    assert!(repo.delete("a").await.unwrap());
    assert!(repo.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn get_missing_character_is_not_found() {
    let (repo, _, _) = repo().await;
    let err = repo.get("nope").await.unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::NotFound { entity: "character", .. }));
}

#[tokio::test]
async fn upsert_publishes_after_write() {
    let (repo, store, bus) = repo().await;
    let mut rx = bus.subscribe();

    repo.upsert(character("a", "Alice")).await.unwrap();

    let event = rx.recv().await.unwrap();
    assert_eq!(event.event_type, CHARACTER_SAVED);
    assert_eq!(event.source_entity_id.as_deref(), Some("a"));
    assert!(store.get(CHARACTERS_KEY).await.unwrap().is_some());
}

#[tokio::test]
async fn delete_publishes_only_when_a_record_is_removed() {
    let (repo, _, bus) = repo().await;
    repo.upsert(character("a", "Alice")).await.unwrap();
    let mut rx = bus.subscribe();

    repo.delete("a").await.unwrap();
    let event = rx.try_recv().unwrap();
    assert_eq!(event.event_type, CHARACTER_DELETED);
    assert_eq!(event.source_entity_id.as_deref(), Some("a"));

    repo.delete("missing").await.unwrap();
    assert_matches!(rx.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test]
async fn oversized_image_avatar_is_stored_as_thumbnail() {
    let (repo, _, _) = repo().await;
    let original = noisy_png_data_url(400, 300);
    assert!(original.len() > AVATAR_SIZE_THRESHOLD);

    let mut c = character("a", "Alice");
    c.avatar = Some(original);
    repo.upsert(c).await.unwrap();

    let stored = repo.list().await.unwrap().remove(0).avatar.unwrap();
    assert!(stored.starts_with("data:image/jpeg;base64,"));
    assert!(stored.len() < AVATAR_SIZE_THRESHOLD);

    let (_, data) = stored.split_once(";base64,").unwrap();
    let thumb = image::load_from_memory(&STANDARD.decode(data).unwrap()).unwrap();
    let (width, height) = thumb.dimensions();
    assert!(width <= THUMBNAIL_MAX_DIMENSION && height <= THUMBNAIL_MAX_DIMENSION);
}

#[tokio::test]
async fn oversized_non_image_avatar_is_rejected_without_writing() {
    let (repo, store, _) = repo().await;
    let mut c = character("a", "Alice");
    c.avatar = Some(format!("https://example.com/{}", "x".repeat(100_001)));

    let err = repo.upsert(c).await.unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::Validation(_)));
    assert!(store.get(CHARACTERS_KEY).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// import / export
// ---------------------------------------------------------------------------

#[tokio::test]
async fn import_drops_malformed_entries() {
    let (repo, _, bus) = repo().await;
    let mut rx = bus.subscribe();

    let summary = repo
        .import_merge(&json!([{"id": "a", "name": "Alice"}, {"notAnId": true}]))
        .await
        .unwrap();

    assert_eq!(summary.imported(), 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(repo.list().await.unwrap(), vec![character("a", "Alice")]);
    assert_eq!(rx.recv().await.unwrap().event_type, CHARACTERS_IMPORTED);
}

#[tokio::test]
async fn import_merges_by_id() {
    let (repo, _, _) = repo().await;
    repo.upsert(character("a", "Alice")).await.unwrap();

    let summary = repo
        .import_merge(&json!([{"id": "a", "name": "Ann"}, {"id": "c", "name": "Cy"}]))
        .await
        .unwrap();

    assert_eq!((summary.added, summary.replaced), (1, 1));
    let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|c| c.name).collect();
    assert_eq!(names, ["Ann", "Cy"]);
}

#[tokio::test]
async fn import_with_no_valid_entries_fails_and_leaves_store_untouched() {
    let (repo, _, _) = repo().await;
    repo.upsert(character("a", "Alice")).await.unwrap();

    for input in [json!([]), json!([{"id": ""}, {"name": "x"}]), json!({"id": "a"})] {
        let err = repo.import_merge(&input).await.unwrap_err();
        assert_matches!(err, DbError::Core(CoreError::Validation(_)));
    }
    assert_eq!(repo.list().await.unwrap(), vec![character("a", "Alice")]);
}

#[tokio::test]
async fn export_requires_characters() {
    let (repo, _, _) = repo().await;
    assert_matches!(
        repo.export().await.unwrap_err(),
        DbError::Core(CoreError::Validation(_))
    );

    repo.upsert(character("a", "Alice")).await.unwrap();
    let export = repo.export().await.unwrap();
    assert!(export.filename.starts_with("dialogue-characters-"));
    assert!(export.filename.ends_with(".json"));

    let parsed: Vec<Character> = serde_json::from_str(&export.json).unwrap();
    assert_eq!(parsed, vec![character("a", "Alice")]);
}
