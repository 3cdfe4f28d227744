use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use shared_models::entities::{Branch, BranchService, District, Service};
use shared_store::EntityStore;

use crate::error::LookupError;
use crate::models::BranchServiceKey;

#[derive(Default)]
struct IndexMaps {
    province_by_district: HashMap<String, String>,
    branches: HashMap<i64, Branch>,
    services: HashMap<i64, Service>,
    id_by_key: HashMap<BranchServiceKey, i64>,
    key_by_id: HashMap<i64, BranchServiceKey>,
    service_ids_by_branch: HashMap<i64, Vec<i64>>,
}

/// In-memory derived indices over branches, services, districts and their
/// associations. Reads never touch the store; the maps only change through
/// the explicit mutation methods or a full `refresh`.
///
/// Invariant: `id_by_key` and `key_by_id` stay mutually consistent; every
/// association id present in one resolves through the other.
pub struct LookupIndex {
    store: Arc<dyn EntityStore>,
    maps: RwLock<IndexMaps>,
}

impl LookupIndex {
    /// Bulk-loads every catalog record and builds all derived maps.
    pub async fn load(store: Arc<dyn EntityStore>) -> Result<Self> {
        let maps = Self::build(store.as_ref()).await?;
        Ok(Self {
            store,
            maps: RwLock::new(maps),
        })
    }

    /// Rebuilds all maps from the store and swaps them in.
    pub async fn refresh(&self) -> Result<()> {
        let rebuilt = Self::build(self.store.as_ref()).await?;
        *self.maps.write().await = rebuilt;
        Ok(())
    }

    async fn build(store: &dyn EntityStore) -> Result<IndexMaps> {
        let districts = store.list_districts().await?;
        let branches = store.list_branches().await?;
        let services = store.list_services().await?;
        let associations = store.list_branch_services().await?;

        let mut maps = IndexMaps::default();

        for district in districts {
            maps.province_by_district
                .insert(district.name, district.province);
        }
        for branch in branches {
            maps.service_ids_by_branch.insert(branch.id, Vec::new());
            maps.branches.insert(branch.id, branch);
        }
        for service in services {
            maps.services.insert(service.id, service);
        }

        for association in &associations {
            // An association referencing a missing branch or service is
            // skipped, not fatal.
            if !maps.branches.contains_key(&association.branch_id)
                || !maps.services.contains_key(&association.service_id)
            {
                warn!(
                    "Skipping branch-service {}: unknown branch {} or service {}",
                    association.id, association.branch_id, association.service_id
                );
                continue;
            }
            let key = BranchServiceKey::new(association.branch_id, association.service_id);
            maps.id_by_key.insert(key, association.id);
            maps.key_by_id.insert(association.id, key);
            maps.service_ids_by_branch
                .entry(association.branch_id)
                .or_default()
                .push(association.service_id);
        }

        debug!(
            "Lookup index built: {} branches, {} services, {} districts, {} associations",
            maps.branches.len(),
            maps.services.len(),
            maps.province_by_district.len(),
            maps.key_by_id.len()
        );
        Ok(maps)
    }

    // Identity and attribute reads. Unknown ids yield None, never an error.

    pub async fn branch(&self, id: i64) -> Option<Branch> {
        self.maps.read().await.branches.get(&id).cloned()
    }

    pub async fn branch_name(&self, id: i64) -> Option<String> {
        self.maps
            .read()
            .await
            .branches
            .get(&id)
            .map(|b| b.name.clone())
    }

    pub async fn service(&self, id: i64) -> Option<Service> {
        self.maps.read().await.services.get(&id).cloned()
    }

    pub async fn service_name(&self, id: i64) -> Option<String> {
        self.maps
            .read()
            .await
            .services
            .get(&id)
            .map(|s| s.name.clone())
    }

    pub async fn district_of_branch(&self, branch_id: i64) -> Option<String> {
        self.maps
            .read()
            .await
            .branches
            .get(&branch_id)
            .map(|b| b.district.clone())
    }

    pub async fn province_of_district(&self, district: &str) -> Option<String> {
        self.maps
            .read()
            .await
            .province_by_district
            .get(district)
            .cloned()
    }

    pub async fn all_branches(&self) -> Vec<Branch> {
        let maps = self.maps.read().await;
        let mut branches: Vec<Branch> = maps.branches.values().cloned().collect();
        branches.sort_by_key(|b| b.id);
        branches
    }

    pub async fn all_services(&self) -> Vec<Service> {
        let maps = self.maps.read().await;
        let mut services: Vec<Service> = maps.services.values().cloned().collect();
        services.sort_by_key(|s| s.id);
        services
    }

    /// Case-insensitive exact match on the branch's district field.
    pub async fn branches_in_district(&self, district: &str) -> Vec<Branch> {
        let maps = self.maps.read().await;
        let mut branches: Vec<Branch> = maps
            .branches
            .values()
            .filter(|b| b.district.eq_ignore_ascii_case(district))
            .cloned()
            .collect();
        branches.sort_by_key(|b| b.id);
        branches
    }

    pub async fn all_district_names(&self) -> Vec<String> {
        let maps = self.maps.read().await;
        let mut names: Vec<String> = maps.province_by_district.keys().cloned().collect();
        names.sort();
        names
    }

    pub async fn districts_in_province(&self, province: &str) -> Vec<String> {
        let maps = self.maps.read().await;
        let mut names: Vec<String> = maps
            .province_by_district
            .iter()
            .filter(|(_, p)| p.as_str() == province)
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    pub async fn provinces(&self) -> Vec<String> {
        let maps = self.maps.read().await;
        let mut provinces: Vec<String> = maps.province_by_district.values().cloned().collect();
        provinces.sort();
        provinces.dedup();
        provinces
    }

    pub async fn services_at_branch(&self, branch_id: i64) -> Vec<Service> {
        let maps = self.maps.read().await;
        let Some(service_ids) = maps.service_ids_by_branch.get(&branch_id) else {
            return Vec::new();
        };
        service_ids
            .iter()
            .filter_map(|id| maps.services.get(id).cloned())
            .collect()
    }

    // Association-set queries. Each returns the association ids satisfying
    // the predicate; empty when nothing matches.

    pub async fn branch_service_ids_for_branch(&self, branch_id: i64) -> Vec<i64> {
        let maps = self.maps.read().await;
        Self::ids_for_branch_locked(&maps, branch_id)
    }

    pub async fn branch_service_ids_for_service(&self, service_id: i64) -> Vec<i64> {
        let maps = self.maps.read().await;
        let mut ids: Vec<i64> = maps
            .id_by_key
            .iter()
            .filter(|(key, _)| key.service_id == service_id)
            .map(|(_, id)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    pub async fn branch_service_ids_for_district(&self, district: &str) -> Vec<i64> {
        let maps = self.maps.read().await;
        let mut ids = Vec::new();
        for branch in maps
            .branches
            .values()
            .filter(|b| b.district.eq_ignore_ascii_case(district))
        {
            ids.extend(Self::ids_for_branch_locked(&maps, branch.id));
        }
        ids.sort_unstable();
        ids
    }

    pub async fn branch_service_ids_for_district_and_service(
        &self,
        district: &str,
        service_id: i64,
    ) -> Vec<i64> {
        let maps = self.maps.read().await;
        let mut ids = Vec::new();
        for branch in maps
            .branches
            .values()
            .filter(|b| b.district.eq_ignore_ascii_case(district))
        {
            let key = BranchServiceKey::new(branch.id, service_id);
            if let Some(id) = maps.id_by_key.get(&key) {
                ids.push(*id);
            }
        }
        ids.sort_unstable();
        ids
    }

    pub async fn branch_service_ids_for_branch_and_service(
        &self,
        branch_id: i64,
        service_id: i64,
    ) -> Vec<i64> {
        let maps = self.maps.read().await;
        let key = BranchServiceKey::new(branch_id, service_id);
        maps.id_by_key.get(&key).map(|id| vec![*id]).unwrap_or_default()
    }

    pub async fn resolve_branch_service(&self, branch_service_id: i64) -> Option<BranchServiceKey> {
        self.maps.read().await.key_by_id.get(&branch_service_id).copied()
    }

    /// Narrows a {branch, service, district} filter to a candidate
    /// association set, trying the most specific combination first:
    /// branch+service, district+service, branch, service, district. A step
    /// that matches nothing falls through to the next. Returns `None` when
    /// no dimension was supplied at all; `Some(empty)` means every supplied
    /// combination came up dry.
    pub async fn branch_service_ids_matching(
        &self,
        branch_id: Option<i64>,
        service_id: Option<i64>,
        district: Option<&str>,
    ) -> Option<Vec<i64>> {
        if branch_id.is_none() && service_id.is_none() && district.is_none() {
            return None;
        }

        let mut ids = Vec::new();

        if let (Some(branch), Some(service)) = (branch_id, service_id) {
            ids = self
                .branch_service_ids_for_branch_and_service(branch, service)
                .await;
        }
        if ids.is_empty() {
            if let (Some(district), Some(service)) = (district, service_id) {
                ids = self
                    .branch_service_ids_for_district_and_service(district, service)
                    .await;
            }
        }
        if ids.is_empty() {
            if let Some(branch) = branch_id {
                ids = self.branch_service_ids_for_branch(branch).await;
            }
        }
        if ids.is_empty() {
            if let Some(service) = service_id {
                ids = self.branch_service_ids_for_service(service).await;
            }
        }
        if ids.is_empty() {
            if let Some(district) = district {
                ids = self.branch_service_ids_for_district(district).await;
            }
        }

        Some(ids)
    }

    // Mutations. Each patches only the affected entries; the full rebuild
    // path is `refresh`.

    pub async fn upsert_branch(&self, branch: Branch) {
        let mut maps = self.maps.write().await;
        maps.service_ids_by_branch.entry(branch.id).or_default();
        maps.branches.insert(branch.id, branch);
    }

    pub async fn remove_branch(&self, id: i64) {
        self.maps.write().await.branches.remove(&id);
    }

    pub async fn upsert_service(&self, service: Service) {
        self.maps.write().await.services.insert(service.id, service);
    }

    pub async fn remove_service(&self, id: i64) {
        self.maps.write().await.services.remove(&id);
    }

    pub async fn upsert_district(&self, district: District) {
        self.maps
            .write()
            .await
            .province_by_district
            .insert(district.name, district.province);
    }

    /// Registers an association in both directions. Rejects a
    /// (branch, service) pair already registered under a different
    /// association id; re-registering the same association is idempotent.
    pub async fn upsert_branch_service(
        &self,
        association: &BranchService,
    ) -> Result<(), LookupError> {
        let key = BranchServiceKey::new(association.branch_id, association.service_id);
        let mut maps = self.maps.write().await;

        if let Some(&existing) = maps.id_by_key.get(&key) {
            if existing != association.id {
                return Err(LookupError::AssociationExists {
                    branch_id: association.branch_id,
                    service_id: association.service_id,
                    branch_service_id: existing,
                });
            }
        }

        // Re-pointing an existing association id: drop its stale pair entry
        // so the forward and inverse maps stay consistent.
        if let Some(old_key) = maps.key_by_id.insert(association.id, key) {
            if old_key != key {
                maps.id_by_key.remove(&old_key);
                if let Some(service_ids) = maps.service_ids_by_branch.get_mut(&old_key.branch_id) {
                    service_ids.retain(|&id| id != old_key.service_id);
                }
            }
        }

        maps.id_by_key.insert(key, association.id);
        let service_ids = maps.service_ids_by_branch.entry(key.branch_id).or_default();
        if !service_ids.contains(&key.service_id) {
            service_ids.push(key.service_id);
        }
        Ok(())
    }

    /// Prunes an association from every map it appears in.
    pub async fn remove_branch_service(&self, branch_service_id: i64) {
        let mut maps = self.maps.write().await;
        if let Some(key) = maps.key_by_id.remove(&branch_service_id) {
            maps.id_by_key.remove(&key);
            if let Some(service_ids) = maps.service_ids_by_branch.get_mut(&key.branch_id) {
                service_ids.retain(|&id| id != key.service_id);
            }
        }
    }

    fn ids_for_branch_locked(maps: &IndexMaps, branch_id: i64) -> Vec<i64> {
        let Some(service_ids) = maps.service_ids_by_branch.get(&branch_id) else {
            return Vec::new();
        };
        service_ids
            .iter()
            .filter_map(|service_id| {
                maps.id_by_key
                    .get(&BranchServiceKey::new(branch_id, *service_id))
                    .copied()
            })
            .collect()
    }
}
