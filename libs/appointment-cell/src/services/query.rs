use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use lookup_cell::LookupIndex;
use shared_models::entities::Appointment;
use shared_store::EntityStore;

use crate::models::{AppointmentFilter, AppointmentPage};
use crate::services::to_view;

/// Answers composite appointment queries in two phases: a coarse store
/// fetch over the narrowest pre-filter the supplied dimensions allow,
/// then an exact in-memory pass that re-applies every requested filter.
/// The coarse fetch may over-select (a branch-only candidate set when both
/// branch and service were requested but the pair is not registered); the
/// second pass is what the returned page is guaranteed against.
pub struct AppointmentQueryService {
    store: Arc<dyn EntityStore>,
    lookup: Arc<LookupIndex>,
}

impl AppointmentQueryService {
    pub fn new(store: Arc<dyn EntityStore>, lookup: Arc<LookupIndex>) -> Self {
        Self { store, lookup }
    }

    pub async fn find_filtered(
        &self,
        filter: &AppointmentFilter,
        page: usize,
        size: usize,
    ) -> Result<AppointmentPage> {
        let coarse = self.coarse_fetch(filter).await?;
        debug!("Coarse fetch pulled {} appointments", coarse.len());

        let mut matched = Vec::new();
        for appointment in coarse {
            if self.matches(filter, &appointment).await {
                matched.push(appointment);
            }
        }

        let total_matches = matched.len();
        let start = page.saturating_mul(size).min(total_matches);
        let end = start.saturating_add(size).min(total_matches);

        let mut items = Vec::with_capacity(end - start);
        for appointment in &matched[start..end] {
            items.push(to_view(&self.lookup, appointment).await);
        }

        Ok(AppointmentPage {
            items,
            page,
            size,
            total_matches,
        })
    }

    /// Picks the cheapest store query: candidate association set if any
    /// dimension narrows one down, then whichever date shape the bounds
    /// allow. An empty candidate set falls back to the unnarrowed date
    /// shapes; the exact pass weeds out the over-selection.
    async fn coarse_fetch(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>> {
        let candidates = self
            .lookup
            .branch_service_ids_matching(
                filter.branch_id,
                filter.service_id,
                filter.district.as_deref(),
            )
            .await
            .filter(|ids| !ids.is_empty());

        match (&candidates, filter.date_from, filter.date_to) {
            (Some(ids), Some(start), Some(end)) => {
                self.store.appointments_in_period_in(start, end, ids).await
            }
            (Some(ids), Some(start), None) => {
                self.store.appointments_on_or_after_in(start, ids).await
            }
            (Some(ids), None, Some(end)) => {
                self.store.appointments_on_or_before_in(end, ids).await
            }
            (Some(ids), None, None) => self.store.appointments_for_branch_services(ids).await,
            (None, Some(start), Some(end)) => {
                self.store.appointments_in_period(start, end).await
            }
            (None, Some(start), None) => self.store.appointments_on_or_after(start).await,
            (None, None, Some(end)) => self.store.appointments_on_or_before(end).await,
            (None, None, None) => self.store.list_appointments().await,
        }
    }

    async fn matches(&self, filter: &AppointmentFilter, appointment: &Appointment) -> bool {
        if let Some(from) = filter.date_from {
            if appointment.date < from {
                return false;
            }
        }
        if let Some(to) = filter.date_to {
            if appointment.date > to {
                return false;
            }
        }

        if filter.branch_id.is_some() || filter.service_id.is_some() || filter.district.is_some() {
            let Some(key) = self
                .lookup
                .resolve_branch_service(appointment.branch_service_id)
                .await
            else {
                // Unknown association: cannot satisfy any branch-derived
                // predicate.
                return false;
            };

            if let Some(branch_id) = filter.branch_id {
                if key.branch_id != branch_id {
                    return false;
                }
            }
            if let Some(service_id) = filter.service_id {
                if key.service_id != service_id {
                    return false;
                }
            }
            if let Some(district) = &filter.district {
                match self.lookup.district_of_branch(key.branch_id).await {
                    Some(actual) => {
                        if !actual.eq_ignore_ascii_case(district) {
                            return false;
                        }
                    }
                    None => return false,
                }
            }
        }

        if let Some(status) = &filter.status {
            if !status.eq_ignore_ascii_case(&appointment.status) {
                return false;
            }
        }

        true
    }
}
