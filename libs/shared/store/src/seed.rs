use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

use shared_models::entities::{
    Appointment, Branch, BranchConfigOverride, BranchService, District, GlobalConfig, Service,
};

use crate::EntityStore;

/// Startup fixture for the in-process store. Every section is optional.
#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub districts: Vec<District>,
    #[serde(default)]
    pub branches: Vec<Branch>,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub branch_services: Vec<BranchService>,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
    #[serde(default)]
    pub global_config: Option<GlobalConfig>,
    #[serde(default)]
    pub branch_overrides: Vec<BranchConfigOverride>,
}

impl SeedData {
    pub fn from_file(path: &str) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading seed file {}", path))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing seed file {}", path))
    }

    pub async fn apply(self, store: &dyn EntityStore) -> Result<()> {
        let counts = (
            self.branches.len(),
            self.services.len(),
            self.branch_services.len(),
            self.appointments.len(),
        );

        for district in self.districts {
            store.save_district(district).await?;
        }
        for branch in self.branches {
            store.save_branch(branch).await?;
        }
        for service in self.services {
            store.save_service(service).await?;
        }
        for association in self.branch_services {
            store.save_branch_service(association).await?;
        }
        for appointment in self.appointments {
            store.save_appointment(appointment).await?;
        }
        if let Some(config) = self.global_config {
            store.save_global_config(config).await?;
        }
        for record in self.branch_overrides {
            store.save_branch_override(record).await?;
        }

        info!(
            "Seed applied: {} branches, {} services, {} associations, {} appointments",
            counts.0, counts.1, counts.2, counts.3
        );
        Ok(())
    }
}
