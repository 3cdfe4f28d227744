use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate};
use tracing::{debug, warn};

use lookup_cell::LookupIndex;
use shared_models::entities::Appointment;
use shared_store::EntityStore;

use crate::models::{
    AppointmentView, BatchCreateOutcome, BatchFailure, CreateAppointmentRequest,
};
use crate::services::to_view;

pub struct BookingService {
    store: Arc<dyn EntityStore>,
    lookup: Arc<LookupIndex>,
}

impl BookingService {
    pub fn new(store: Arc<dyn EntityStore>, lookup: Arc<LookupIndex>) -> Self {
        Self { store, lookup }
    }

    /// Books one appointment. The referenced association must be known to
    /// the index; there is no other booking-time validation here.
    pub async fn create(&self, request: CreateAppointmentRequest) -> Result<AppointmentView> {
        let appointment = self.create_record(request).await?;
        Ok(to_view(&self.lookup, &appointment).await)
    }

    async fn create_record(&self, request: CreateAppointmentRequest) -> Result<Appointment> {
        if self
            .lookup
            .resolve_branch_service(request.branch_service_id)
            .await
            .is_none()
        {
            return Err(anyhow!(
                "branch-service {} does not exist",
                request.branch_service_id
            ));
        }

        let appointment = Appointment {
            id: 0,
            user_id: request.user_id,
            branch_service_id: request.branch_service_id,
            date: request.date,
            time: request.time,
            status: request.status,
        };
        let saved = self.store.save_appointment(appointment).await?;
        debug!("Appointment {} created", saved.id);
        Ok(saved)
    }

    /// Attempts every submitted item independently; failures are collected
    /// with their input index and snapshot rather than aborting the batch.
    pub async fn create_batch(
        &self,
        requests: Vec<CreateAppointmentRequest>,
    ) -> BatchCreateOutcome {
        let total_submitted = requests.len();
        let mut successfully_created = 0;
        let mut failures = Vec::new();

        for (input_index, request) in requests.into_iter().enumerate() {
            match self.create_record(request.clone()).await {
                Ok(_) => successfully_created += 1,
                Err(e) => {
                    warn!("Batch item {} failed: {}", input_index, e);
                    failures.push(BatchFailure {
                        input_index,
                        input: request,
                        error: e.to_string(),
                    });
                }
            }
        }

        BatchCreateOutcome {
            total_submitted,
            successfully_created,
            failed_count: failures.len(),
            failures,
        }
    }

    pub async fn get(&self, id: i64) -> Result<Option<AppointmentView>> {
        match self.store.get_appointment(id).await? {
            Some(appointment) => Ok(Some(to_view(&self.lookup, &appointment).await)),
            None => Ok(None),
        }
    }

    pub async fn list_all(&self) -> Result<Vec<AppointmentView>> {
        let appointments = self.store.list_appointments().await?;
        self.to_views(appointments).await
    }

    pub async fn by_user(&self, user_id: i64) -> Result<Vec<AppointmentView>> {
        let appointments = self.store.appointments_by_user(user_id).await?;
        self.to_views(appointments).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.store.delete_appointment(id).await
    }

    /// Replaces the status string; returns None when the appointment is
    /// unknown.
    pub async fn update_status(&self, id: i64, status: String) -> Result<Option<Appointment>> {
        let Some(mut appointment) = self.store.get_appointment(id).await? else {
            return Ok(None);
        };
        appointment.status = status;
        let saved = self.store.save_appointment(appointment).await?;
        Ok(Some(saved))
    }

    // Operational queue reads: raw records for a single day, narrowed
    // through the index.

    pub async fn by_date(&self, date: NaiveDate) -> Result<Vec<Appointment>> {
        self.store.appointments_by_date(date).await
    }

    pub async fn by_date_and_branch_service(
        &self,
        date: NaiveDate,
        branch_service_id: i64,
    ) -> Result<Vec<Appointment>> {
        self.store
            .appointments_by_date_in(date, &[branch_service_id])
            .await
    }

    pub async fn by_date_and_branch(
        &self,
        date: NaiveDate,
        branch_id: i64,
    ) -> Result<Vec<Appointment>> {
        let ids = self.lookup.branch_service_ids_for_branch(branch_id).await;
        self.store.appointments_by_date_in(date, &ids).await
    }

    pub async fn today_by_branch(&self, branch_id: i64) -> Result<Vec<Appointment>> {
        self.by_date_and_branch(Local::now().date_naive(), branch_id).await
    }

    pub async fn today_by_district(&self, district: &str) -> Result<Vec<Appointment>> {
        let ids = self.lookup.branch_service_ids_for_district(district).await;
        self.store
            .appointments_by_date_in(Local::now().date_naive(), &ids)
            .await
    }

    pub async fn today_by_district_and_service(
        &self,
        district: &str,
        service_id: i64,
    ) -> Result<Vec<Appointment>> {
        let ids = self
            .lookup
            .branch_service_ids_for_district_and_service(district, service_id)
            .await;
        self.store
            .appointments_by_date_in(Local::now().date_naive(), &ids)
            .await
    }

    async fn to_views(&self, appointments: Vec<Appointment>) -> Result<Vec<AppointmentView>> {
        let mut views = Vec::with_capacity(appointments.len());
        for appointment in &appointments {
            views.push(to_view(&self.lookup, appointment).await);
        }
        Ok(views)
    }
}
