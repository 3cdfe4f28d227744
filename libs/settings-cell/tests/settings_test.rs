use std::sync::Arc;

use settings_cell::services::SettingsCache;
use shared_models::entities::{BranchConfigOverride, GlobalConfig};
use shared_store::{EntityStore, MemoryStore};

fn global_config() -> GlobalConfig {
    GlobalConfig {
        id: 0,
        booking_window_days: 30,
        min_booking_notice_hours: 2,
        default_queue_threshold_low: 5,
        default_queue_threshold_moderate: 12,
        default_slot_duration_mins: 15,
        allow_cancellation_hours: 4,
        maintenance_mode_enabled: false,
        last_updated: None,
    }
}

fn override_for(branch_id: i64) -> BranchConfigOverride {
    BranchConfigOverride {
        id: 0,
        branch_id,
        queue_threshold_low: Some(3),
        queue_threshold_moderate: None,
        slot_duration_mins: None,
        max_appointments_per_slot: Some(2),
        last_updated: None,
    }
}

async fn cache_with_global() -> (Arc<MemoryStore>, SettingsCache) {
    let store = Arc::new(MemoryStore::new());
    store
        .save_global_config(global_config())
        .await
        .expect("save global config");
    let cache = SettingsCache::load(store.clone() as Arc<dyn EntityStore>)
        .await
        .expect("load settings");
    (store, cache)
}

#[tokio::test]
async fn unconfigured_service_reports_no_global_config() {
    let store = Arc::new(MemoryStore::new());
    let cache = SettingsCache::load(store as Arc<dyn EntityStore>)
        .await
        .expect("load settings");

    assert!(cache.global().await.is_none());
    assert!(cache.effective_for_branch(1).await.is_none());
}

#[tokio::test]
async fn global_config_is_served_from_memory() {
    let (_store, cache) = cache_with_global().await;

    let config = cache.global().await.expect("configured");
    assert_eq!(config.booking_window_days, 30);
    assert_eq!(config.default_slot_duration_mins, 15);
}

#[tokio::test]
async fn update_global_writes_through_and_stamps_the_timestamp() {
    let (store, cache) = cache_with_global().await;

    let mut updated = cache.global().await.expect("configured");
    updated.booking_window_days = 45;
    let saved = cache.update_global(updated).await.expect("update global");

    assert_eq!(saved.booking_window_days, 45);
    assert!(saved.last_updated.is_some());

    let persisted = store
        .get_global_config()
        .await
        .expect("read store")
        .expect("record exists");
    assert_eq!(persisted.booking_window_days, 45);
    assert_eq!(persisted.id, saved.id, "the singleton was updated in place");
}

#[tokio::test]
async fn override_lookup_returns_none_without_a_record() {
    let (_store, cache) = cache_with_global().await;

    assert!(cache.override_for(9).await.is_none());
}

#[tokio::test]
async fn saving_an_override_twice_preserves_its_identity() {
    let (store, cache) = cache_with_global().await;

    let first = cache
        .save_override(override_for(5))
        .await
        .expect("save override");

    let mut second = override_for(5);
    second.queue_threshold_low = Some(8);
    let saved = cache.save_override(second).await.expect("save override");

    assert_eq!(saved.id, first.id);
    assert_eq!(saved.queue_threshold_low, Some(8));

    let persisted = store.list_branch_overrides().await.expect("read store");
    assert_eq!(persisted.len(), 1, "updated, not appended");

    assert_eq!(cache.all_overrides().await.len(), 1);
}

#[tokio::test]
async fn effective_settings_fall_back_to_global_values() {
    let (_store, cache) = cache_with_global().await;
    cache
        .save_override(override_for(5))
        .await
        .expect("save override");

    let effective = cache.effective_for_branch(5).await.expect("configured");

    // Overridden field.
    assert_eq!(effective.queue_threshold_low, 3);
    // Unset fields inherit the global values.
    assert_eq!(effective.queue_threshold_moderate, 12);
    assert_eq!(effective.slot_duration_mins, 15);
    assert_eq!(effective.booking_window_days, 30);
    assert_eq!(effective.max_appointments_per_slot, Some(2));
}

#[tokio::test]
async fn effective_settings_without_an_override_are_all_global() {
    let (_store, cache) = cache_with_global().await;

    let effective = cache.effective_for_branch(77).await.expect("configured");

    assert_eq!(effective.queue_threshold_low, 5);
    assert_eq!(effective.queue_threshold_moderate, 12);
    assert_eq!(effective.slot_duration_mins, 15);
    assert_eq!(effective.max_appointments_per_slot, None);
}

#[tokio::test]
async fn refresh_reloads_records_written_elsewhere() {
    let (store, cache) = cache_with_global().await;

    // The cache does not observe direct store writes...
    store
        .save_branch_override(override_for(3))
        .await
        .expect("save override");
    assert!(cache.override_for(3).await.is_none());

    // ...until an explicit refresh.
    cache.refresh().await.expect("refresh");
    assert!(cache.override_for(3).await.is_some());
}
