pub mod memory;
pub mod seed;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use shared_models::entities::{
    Appointment, Branch, BranchConfigOverride, BranchService, District, GlobalConfig, Service,
};

pub use memory::MemoryStore;

/// Durable-storage collaborator. The backend only ever needs simple
/// key-based access plus the appointment date-shape queries below; anything
/// richer (joins, aggregation) is derived in memory by the caller.
///
/// Appointment queries return records in the store's natural insertion
/// order. Saving a record with `id == 0` assigns the next identity and
/// returns the stored record.
#[async_trait]
pub trait EntityStore: Send + Sync {
    // Branches
    async fn list_branches(&self) -> Result<Vec<Branch>>;
    async fn get_branch(&self, id: i64) -> Result<Option<Branch>>;
    async fn save_branch(&self, branch: Branch) -> Result<Branch>;
    async fn delete_branch(&self, id: i64) -> Result<()>;

    // Services
    async fn list_services(&self) -> Result<Vec<Service>>;
    async fn get_service(&self, id: i64) -> Result<Option<Service>>;
    async fn save_service(&self, service: Service) -> Result<Service>;
    async fn delete_service(&self, id: i64) -> Result<()>;

    // Districts
    async fn list_districts(&self) -> Result<Vec<District>>;
    async fn save_district(&self, district: District) -> Result<District>;
    async fn delete_district(&self, id: i64) -> Result<()>;

    // Branch-service associations
    async fn list_branch_services(&self) -> Result<Vec<BranchService>>;
    async fn get_branch_service(&self, id: i64) -> Result<Option<BranchService>>;
    async fn get_branch_services_by_ids(&self, ids: &[i64]) -> Result<Vec<BranchService>>;
    async fn save_branch_service(&self, association: BranchService) -> Result<BranchService>;
    async fn delete_branch_service(&self, id: i64) -> Result<()>;

    // Appointments
    async fn list_appointments(&self) -> Result<Vec<Appointment>>;
    async fn get_appointment(&self, id: i64) -> Result<Option<Appointment>>;
    async fn save_appointment(&self, appointment: Appointment) -> Result<Appointment>;
    async fn delete_appointment(&self, id: i64) -> Result<()>;

    async fn appointments_by_user(&self, user_id: i64) -> Result<Vec<Appointment>>;
    async fn appointments_by_date(&self, date: NaiveDate) -> Result<Vec<Appointment>>;
    async fn appointments_in_period(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Appointment>>;
    async fn appointments_on_or_after(&self, start: NaiveDate) -> Result<Vec<Appointment>>;
    async fn appointments_on_or_before(&self, end: NaiveDate) -> Result<Vec<Appointment>>;

    async fn appointments_for_branch_services(
        &self,
        branch_service_ids: &[i64],
    ) -> Result<Vec<Appointment>>;
    async fn appointments_by_date_in(
        &self,
        date: NaiveDate,
        branch_service_ids: &[i64],
    ) -> Result<Vec<Appointment>>;
    async fn appointments_in_period_in(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        branch_service_ids: &[i64],
    ) -> Result<Vec<Appointment>>;
    async fn appointments_on_or_after_in(
        &self,
        start: NaiveDate,
        branch_service_ids: &[i64],
    ) -> Result<Vec<Appointment>>;
    async fn appointments_on_or_before_in(
        &self,
        end: NaiveDate,
        branch_service_ids: &[i64],
    ) -> Result<Vec<Appointment>>;

    // Configuration records
    async fn get_global_config(&self) -> Result<Option<GlobalConfig>>;
    async fn save_global_config(&self, config: GlobalConfig) -> Result<GlobalConfig>;
    async fn list_branch_overrides(&self) -> Result<Vec<BranchConfigOverride>>;
    async fn save_branch_override(
        &self,
        record: BranchConfigOverride,
    ) -> Result<BranchConfigOverride>;
}
