use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use shared_models::entities::{
    Appointment, Branch, BranchConfigOverride, BranchService, District, GlobalConfig, Service,
};

use crate::EntityStore;

#[derive(Default)]
struct Tables {
    branches: BTreeMap<i64, Branch>,
    services: BTreeMap<i64, Service>,
    districts: BTreeMap<i64, District>,
    branch_services: BTreeMap<i64, BranchService>,
    // Appointments keep insertion order; the resolver's paging contract
    // depends on it.
    appointments: Vec<Appointment>,
    global_config: Option<GlobalConfig>,
    branch_overrides: Vec<BranchConfigOverride>,
    next_id: i64,
}

impl Tables {
    fn assign_id(&mut self, requested: i64) -> i64 {
        if requested != 0 {
            if requested >= self.next_id {
                self.next_id = requested + 1;
            }
            return requested;
        }
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// In-process `EntityStore`. Single writer at a time, concurrent readers.
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables {
                next_id: 1,
                ..Tables::default()
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn list_branches(&self) -> Result<Vec<Branch>> {
        Ok(self.tables.read().await.branches.values().cloned().collect())
    }

    async fn get_branch(&self, id: i64) -> Result<Option<Branch>> {
        Ok(self.tables.read().await.branches.get(&id).cloned())
    }

    async fn save_branch(&self, mut branch: Branch) -> Result<Branch> {
        let mut tables = self.tables.write().await;
        branch.id = tables.assign_id(branch.id);
        tables.branches.insert(branch.id, branch.clone());
        Ok(branch)
    }

    async fn delete_branch(&self, id: i64) -> Result<()> {
        self.tables.write().await.branches.remove(&id);
        Ok(())
    }

    async fn list_services(&self) -> Result<Vec<Service>> {
        Ok(self.tables.read().await.services.values().cloned().collect())
    }

    async fn get_service(&self, id: i64) -> Result<Option<Service>> {
        Ok(self.tables.read().await.services.get(&id).cloned())
    }

    async fn save_service(&self, mut service: Service) -> Result<Service> {
        let mut tables = self.tables.write().await;
        service.id = tables.assign_id(service.id);
        tables.services.insert(service.id, service.clone());
        Ok(service)
    }

    async fn delete_service(&self, id: i64) -> Result<()> {
        self.tables.write().await.services.remove(&id);
        Ok(())
    }

    async fn list_districts(&self) -> Result<Vec<District>> {
        Ok(self.tables.read().await.districts.values().cloned().collect())
    }

    async fn save_district(&self, mut district: District) -> Result<District> {
        let mut tables = self.tables.write().await;
        district.id = tables.assign_id(district.id);
        tables.districts.insert(district.id, district.clone());
        Ok(district)
    }

    async fn delete_district(&self, id: i64) -> Result<()> {
        self.tables.write().await.districts.remove(&id);
        Ok(())
    }

    async fn list_branch_services(&self) -> Result<Vec<BranchService>> {
        Ok(self
            .tables
            .read()
            .await
            .branch_services
            .values()
            .cloned()
            .collect())
    }

    async fn get_branch_service(&self, id: i64) -> Result<Option<BranchService>> {
        Ok(self.tables.read().await.branch_services.get(&id).cloned())
    }

    async fn get_branch_services_by_ids(&self, ids: &[i64]) -> Result<Vec<BranchService>> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.branch_services.get(id).cloned())
            .collect())
    }

    async fn save_branch_service(&self, mut association: BranchService) -> Result<BranchService> {
        let mut tables = self.tables.write().await;
        association.id = tables.assign_id(association.id);
        tables
            .branch_services
            .insert(association.id, association.clone());
        Ok(association)
    }

    async fn delete_branch_service(&self, id: i64) -> Result<()> {
        self.tables.write().await.branch_services.remove(&id);
        Ok(())
    }

    async fn list_appointments(&self) -> Result<Vec<Appointment>> {
        Ok(self.tables.read().await.appointments.clone())
    }

    async fn get_appointment(&self, id: i64) -> Result<Option<Appointment>> {
        Ok(self
            .tables
            .read()
            .await
            .appointments
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn save_appointment(&self, mut appointment: Appointment) -> Result<Appointment> {
        let mut tables = self.tables.write().await;
        appointment.id = tables.assign_id(appointment.id);
        if let Some(existing) = tables
            .appointments
            .iter_mut()
            .find(|a| a.id == appointment.id)
        {
            *existing = appointment.clone();
        } else {
            tables.appointments.push(appointment.clone());
        }
        Ok(appointment)
    }

    async fn delete_appointment(&self, id: i64) -> Result<()> {
        self.tables.write().await.appointments.retain(|a| a.id != id);
        Ok(())
    }

    async fn appointments_by_user(&self, user_id: i64) -> Result<Vec<Appointment>> {
        Ok(self
            .tables
            .read()
            .await
            .appointments
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn appointments_by_date(&self, date: NaiveDate) -> Result<Vec<Appointment>> {
        Ok(self
            .tables
            .read()
            .await
            .appointments
            .iter()
            .filter(|a| a.date == date)
            .cloned()
            .collect())
    }

    async fn appointments_in_period(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Appointment>> {
        Ok(self
            .tables
            .read()
            .await
            .appointments
            .iter()
            .filter(|a| a.date >= start && a.date <= end)
            .cloned()
            .collect())
    }

    async fn appointments_on_or_after(&self, start: NaiveDate) -> Result<Vec<Appointment>> {
        Ok(self
            .tables
            .read()
            .await
            .appointments
            .iter()
            .filter(|a| a.date >= start)
            .cloned()
            .collect())
    }

    async fn appointments_on_or_before(&self, end: NaiveDate) -> Result<Vec<Appointment>> {
        Ok(self
            .tables
            .read()
            .await
            .appointments
            .iter()
            .filter(|a| a.date <= end)
            .cloned()
            .collect())
    }

    async fn appointments_for_branch_services(
        &self,
        branch_service_ids: &[i64],
    ) -> Result<Vec<Appointment>> {
        Ok(self
            .tables
            .read()
            .await
            .appointments
            .iter()
            .filter(|a| branch_service_ids.contains(&a.branch_service_id))
            .cloned()
            .collect())
    }

    async fn appointments_by_date_in(
        &self,
        date: NaiveDate,
        branch_service_ids: &[i64],
    ) -> Result<Vec<Appointment>> {
        Ok(self
            .tables
            .read()
            .await
            .appointments
            .iter()
            .filter(|a| a.date == date && branch_service_ids.contains(&a.branch_service_id))
            .cloned()
            .collect())
    }

    async fn appointments_in_period_in(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        branch_service_ids: &[i64],
    ) -> Result<Vec<Appointment>> {
        Ok(self
            .tables
            .read()
            .await
            .appointments
            .iter()
            .filter(|a| {
                a.date >= start
                    && a.date <= end
                    && branch_service_ids.contains(&a.branch_service_id)
            })
            .cloned()
            .collect())
    }

    async fn appointments_on_or_after_in(
        &self,
        start: NaiveDate,
        branch_service_ids: &[i64],
    ) -> Result<Vec<Appointment>> {
        Ok(self
            .tables
            .read()
            .await
            .appointments
            .iter()
            .filter(|a| a.date >= start && branch_service_ids.contains(&a.branch_service_id))
            .cloned()
            .collect())
    }

    async fn appointments_on_or_before_in(
        &self,
        end: NaiveDate,
        branch_service_ids: &[i64],
    ) -> Result<Vec<Appointment>> {
        Ok(self
            .tables
            .read()
            .await
            .appointments
            .iter()
            .filter(|a| a.date <= end && branch_service_ids.contains(&a.branch_service_id))
            .cloned()
            .collect())
    }

    async fn get_global_config(&self) -> Result<Option<GlobalConfig>> {
        Ok(self.tables.read().await.global_config.clone())
    }

    async fn save_global_config(&self, mut config: GlobalConfig) -> Result<GlobalConfig> {
        let mut tables = self.tables.write().await;
        config.id = tables.assign_id(config.id);
        tables.global_config = Some(config.clone());
        Ok(config)
    }

    async fn list_branch_overrides(&self) -> Result<Vec<BranchConfigOverride>> {
        Ok(self.tables.read().await.branch_overrides.clone())
    }

    async fn save_branch_override(
        &self,
        mut record: BranchConfigOverride,
    ) -> Result<BranchConfigOverride> {
        let mut tables = self.tables.write().await;
        record.id = tables.assign_id(record.id);
        if let Some(existing) = tables
            .branch_overrides
            .iter_mut()
            .find(|o| o.id == record.id)
        {
            *existing = record.clone();
        } else {
            tables.branch_overrides.push(record.clone());
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appointment(branch_service_id: i64, date: &str, time: &str) -> Appointment {
        Appointment {
            id: 0,
            user_id: 7,
            branch_service_id,
            date: date.parse().expect("valid date"),
            time: time.parse().expect("valid time"),
            status: "on-queue".to_string(),
        }
    }

    #[tokio::test]
    async fn save_assigns_sequential_ids() {
        let store = MemoryStore::new();

        let first = store
            .save_branch(Branch {
                id: 0,
                name: "Central".to_string(),
                address: None,
                district: "Gasabo".to_string(),
                province: Some("Kigali".to_string()),
            })
            .await
            .expect("save branch");
        let second = store
            .save_service(Service {
                id: 0,
                name: "Account Opening".to_string(),
                description: None,
            })
            .await
            .expect("save service");

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn explicit_ids_are_kept_and_do_not_collide_with_later_assignments() {
        let store = MemoryStore::new();

        let seeded = store
            .save_branch(Branch {
                id: 40,
                name: "Remera".to_string(),
                address: None,
                district: "Gasabo".to_string(),
                province: None,
            })
            .await
            .expect("save branch");
        let assigned = store
            .save_branch(Branch {
                id: 0,
                name: "Nyamirambo".to_string(),
                address: None,
                district: "Nyarugenge".to_string(),
                province: None,
            })
            .await
            .expect("save branch");

        assert_eq!(seeded.id, 40);
        assert_eq!(assigned.id, 41);
    }

    #[tokio::test]
    async fn appointment_queries_preserve_insertion_order() {
        let store = MemoryStore::new();

        store
            .save_appointment(appointment(3, "2025-05-02", "09:00:00"))
            .await
            .expect("save");
        store
            .save_appointment(appointment(1, "2025-05-01", "10:00:00"))
            .await
            .expect("save");
        store
            .save_appointment(appointment(2, "2025-05-03", "11:00:00"))
            .await
            .expect("save");

        let all = store.list_appointments().await.expect("list");
        let ids: Vec<i64> = all.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn period_queries_are_inclusive_on_both_ends() {
        let store = MemoryStore::new();

        for date in ["2025-05-01", "2025-05-02", "2025-05-03", "2025-05-04"] {
            store
                .save_appointment(appointment(1, date, "09:00:00"))
                .await
                .expect("save");
        }

        let start: NaiveDate = "2025-05-02".parse().expect("date");
        let end: NaiveDate = "2025-05-03".parse().expect("date");

        let in_period = store
            .appointments_in_period(start, end)
            .await
            .expect("query");
        assert_eq!(in_period.len(), 2);

        let after = store.appointments_on_or_after(start).await.expect("query");
        assert_eq!(after.len(), 3);

        let before = store.appointments_on_or_before(end).await.expect("query");
        assert_eq!(before.len(), 3);
    }

    #[tokio::test]
    async fn membership_queries_filter_by_association_set() {
        let store = MemoryStore::new();

        store
            .save_appointment(appointment(1, "2025-05-01", "09:00:00"))
            .await
            .expect("save");
        store
            .save_appointment(appointment(2, "2025-05-01", "09:30:00"))
            .await
            .expect("save");
        store
            .save_appointment(appointment(3, "2025-05-01", "10:00:00"))
            .await
            .expect("save");

        let date: NaiveDate = "2025-05-01".parse().expect("date");
        let hits = store
            .appointments_by_date_in(date, &[1, 3])
            .await
            .expect("query");

        let links: Vec<i64> = hits.iter().map(|a| a.branch_service_id).collect();
        assert_eq!(links, vec![1, 3]);
    }

    #[tokio::test]
    async fn branch_override_save_replaces_by_id() {
        let store = MemoryStore::new();

        let saved = store
            .save_branch_override(BranchConfigOverride {
                id: 0,
                branch_id: 5,
                queue_threshold_low: Some(4),
                queue_threshold_moderate: None,
                slot_duration_mins: None,
                max_appointments_per_slot: None,
                last_updated: None,
            })
            .await
            .expect("save");

        store
            .save_branch_override(BranchConfigOverride {
                queue_threshold_low: Some(9),
                ..saved.clone()
            })
            .await
            .expect("save again");

        let all = store.list_branch_overrides().await.expect("list");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].queue_threshold_low, Some(9));
    }
}
