use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use shared_models::entities::{BranchConfigOverride, GlobalConfig};
use shared_store::EntityStore;

use crate::models::EffectiveBranchSettings;

#[derive(Default)]
struct SettingsState {
    global: Option<GlobalConfig>,
    overrides: Vec<BranchConfigOverride>,
}

/// In-memory overlay of the global configuration record and the per-branch
/// overrides. Every mutation writes through to the store; the cache only
/// observes outside writes via `refresh`.
pub struct SettingsCache {
    store: Arc<dyn EntityStore>,
    state: RwLock<SettingsState>,
}

impl SettingsCache {
    pub async fn load(store: Arc<dyn EntityStore>) -> Result<Self> {
        let state = Self::read_state(store.as_ref()).await?;
        if state.global.is_none() {
            // Not configured yet: a degraded feature, never a startup
            // failure.
            warn!("No global configuration record found");
        }
        Ok(Self {
            store,
            state: RwLock::new(state),
        })
    }

    async fn read_state(store: &dyn EntityStore) -> Result<SettingsState> {
        let global = store.get_global_config().await?;
        let overrides = store.list_branch_overrides().await?;
        debug!(
            "Settings loaded: global configured = {}, {} branch overrides",
            global.is_some(),
            overrides.len()
        );
        Ok(SettingsState { global, overrides })
    }

    pub async fn refresh(&self) -> Result<()> {
        let fresh = Self::read_state(self.store.as_ref()).await?;
        *self.state.write().await = fresh;
        Ok(())
    }

    /// None until a global configuration record has been written.
    pub async fn global(&self) -> Option<GlobalConfig> {
        self.state.read().await.global.clone()
    }

    pub async fn all_overrides(&self) -> Vec<BranchConfigOverride> {
        self.state.read().await.overrides.clone()
    }

    pub async fn override_for(&self, branch_id: i64) -> Option<BranchConfigOverride> {
        self.state
            .read()
            .await
            .overrides
            .iter()
            .find(|o| o.branch_id == branch_id)
            .cloned()
    }

    /// Replaces the global record in place and persists it.
    pub async fn update_global(&self, mut config: GlobalConfig) -> Result<GlobalConfig> {
        if config.id == 0 {
            if let Some(existing) = self.state.read().await.global.as_ref() {
                config.id = existing.id;
            }
        }
        config.last_updated = Some(Utc::now());

        let saved = self.store.save_global_config(config).await?;
        self.state.write().await.global = Some(saved.clone());
        Ok(saved)
    }

    /// Replace-if-branch-matches-else-append. An existing override keeps
    /// its record identity so the persisted write is an update, not an
    /// insert.
    pub async fn save_override(
        &self,
        mut record: BranchConfigOverride,
    ) -> Result<BranchConfigOverride> {
        {
            let state = self.state.read().await;
            if let Some(existing) = state
                .overrides
                .iter()
                .find(|o| o.branch_id == record.branch_id)
            {
                record.id = existing.id;
            }
        }
        record.last_updated = Some(Utc::now());

        let saved = self.store.save_branch_override(record).await?;

        let mut state = self.state.write().await;
        state.overrides.retain(|o| o.branch_id != saved.branch_id);
        state.overrides.push(saved.clone());
        Ok(saved)
    }

    /// Composes global defaults with any branch override. None while the
    /// service is unconfigured.
    pub async fn effective_for_branch(&self, branch_id: i64) -> Option<EffectiveBranchSettings> {
        let state = self.state.read().await;
        let global = state.global.as_ref()?;
        let record = state.overrides.iter().find(|o| o.branch_id == branch_id);

        Some(EffectiveBranchSettings {
            branch_id,
            booking_window_days: global.booking_window_days,
            min_booking_notice_hours: global.min_booking_notice_hours,
            queue_threshold_low: record
                .and_then(|o| o.queue_threshold_low)
                .unwrap_or(global.default_queue_threshold_low),
            queue_threshold_moderate: record
                .and_then(|o| o.queue_threshold_moderate)
                .unwrap_or(global.default_queue_threshold_moderate),
            slot_duration_mins: record
                .and_then(|o| o.slot_duration_mins)
                .unwrap_or(global.default_slot_duration_mins),
            allow_cancellation_hours: global.allow_cancellation_hours,
            max_appointments_per_slot: record.and_then(|o| o.max_appointments_per_slot),
            maintenance_mode_enabled: global.maintenance_mode_enabled,
        })
    }
}
