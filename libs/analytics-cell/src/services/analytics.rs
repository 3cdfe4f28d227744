use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use chrono::{Datelike, NaiveDate, Timelike};
use tracing::debug;

use lookup_cell::LookupIndex;
use shared_models::entities::Appointment;
use shared_store::EntityStore;

use crate::models::{
    BranchActivityReport, PeakBucket, PeakGrouping, PeakTimesReport, ServiceActivityReport,
    ServiceOutcomes,
};

// Outcome buckets match exactly; any other status only counts toward
// totals.
const STATUS_COMPLETED: &str = "COMPLETED";
const STATUS_CANCELLED: &str = "CANCELLED";
const STATUS_NO_SHOW: &str = "NO_SHOW";

pub struct AnalyticsService {
    store: Arc<dyn EntityStore>,
    lookup: Arc<LookupIndex>,
}

impl AnalyticsService {
    pub fn new(store: Arc<dyn EntityStore>, lookup: Arc<LookupIndex>) -> Self {
        Self { store, lookup }
    }

    /// Appointment counts grouped by hour of day or ISO day of week,
    /// ranked by count descending (bucket key ascending on ties). Scope
    /// narrows through the index when any of district/branch/service is
    /// supplied.
    pub async fn peak_times(
        &self,
        district: Option<&str>,
        branch_id: Option<i64>,
        service_id: Option<i64>,
        start: NaiveDate,
        end: NaiveDate,
        group_by: PeakGrouping,
    ) -> Result<PeakTimesReport> {
        let candidates = self
            .lookup
            .branch_service_ids_matching(branch_id, service_id, district)
            .await;

        let appointments = match &candidates {
            Some(ids) => self.store.appointments_in_period_in(start, end, ids).await?,
            None => self.store.appointments_in_period(start, end).await?,
        };
        debug!(
            "Peak-times aggregation over {} appointments",
            appointments.len()
        );

        let mut counts: HashMap<u32, u64> = HashMap::new();
        for appointment in &appointments {
            let bucket = match group_by {
                PeakGrouping::Hour => appointment.time.hour(),
                PeakGrouping::DayOfWeek => appointment.date.weekday().number_from_monday(),
            };
            *counts.entry(bucket).or_insert(0) += 1;
        }

        let mut buckets: Vec<PeakBucket> = counts
            .into_iter()
            .map(|(bucket, count)| PeakBucket { bucket, count })
            .collect();
        buckets.sort_by(|a, b| b.count.cmp(&a.count).then(a.bucket.cmp(&b.bucket)));

        Ok(PeakTimesReport {
            group_by,
            district: district.map(str::to_string),
            branch_id,
            service_id,
            buckets,
        })
    }

    /// Per-service outcome counts across everything one branch offers.
    /// Every offered service appears, even with all-zero counts.
    pub async fn branch_activity(
        &self,
        branch_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BranchActivityReport> {
        let association_ids = self.lookup.branch_service_ids_for_branch(branch_id).await;

        let mut per_service: HashMap<i64, ServiceOutcomes> = HashMap::new();
        for association_id in &association_ids {
            if let Some(key) = self.lookup.resolve_branch_service(*association_id).await {
                per_service.insert(
                    key.service_id,
                    ServiceOutcomes {
                        service_id: key.service_id,
                        service_name: self.lookup.service_name(key.service_id).await,
                        completed: 0,
                        cancelled: 0,
                        no_show: 0,
                    },
                );
            }
        }

        let appointments = self
            .store
            .appointments_in_period_in(start, end, &association_ids)
            .await?;

        for appointment in &appointments {
            let Some(key) = self
                .lookup
                .resolve_branch_service(appointment.branch_service_id)
                .await
            else {
                continue;
            };
            if let Some(outcomes) = per_service.get_mut(&key.service_id) {
                Self::tally(outcomes, appointment);
            }
        }

        let mut services: Vec<ServiceOutcomes> = per_service.into_values().collect();
        services.sort_by_key(|s| s.service_id);

        Ok(BranchActivityReport {
            branch_id,
            branch_name: self.lookup.branch_name(branch_id).await,
            appointment_count: appointments.len(),
            services,
        })
    }

    /// Outcome counts for one service across all branches of a district.
    pub async fn service_activity(
        &self,
        district: &str,
        service_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ServiceActivityReport> {
        let association_ids = self
            .lookup
            .branch_service_ids_for_district_and_service(district, service_id)
            .await;

        let appointments = self
            .store
            .appointments_in_period_in(start, end, &association_ids)
            .await?;

        let mut outcomes = ServiceOutcomes {
            service_id,
            service_name: self.lookup.service_name(service_id).await,
            completed: 0,
            cancelled: 0,
            no_show: 0,
        };
        for appointment in &appointments {
            Self::tally(&mut outcomes, appointment);
        }

        Ok(ServiceActivityReport {
            district: district.to_string(),
            service_id,
            service_name: outcomes.service_name.clone(),
            appointment_count: appointments.len(),
            completed: outcomes.completed,
            cancelled: outcomes.cancelled,
            no_show: outcomes.no_show,
        })
    }

    fn tally(outcomes: &mut ServiceOutcomes, appointment: &Appointment) {
        match appointment.status.as_str() {
            STATUS_COMPLETED => outcomes.completed += 1,
            STATUS_CANCELLED => outcomes.cancelled += 1,
            STATUS_NO_SHOW => outcomes.no_show += 1,
            _ => {}
        }
    }
}
