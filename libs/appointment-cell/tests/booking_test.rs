use std::sync::Arc;

use chrono::Local;

use appointment_cell::models::CreateAppointmentRequest;
use appointment_cell::services::BookingService;
use lookup_cell::LookupIndex;
use shared_models::entities::{Branch, BranchService, District, Service};
use shared_store::{EntityStore, MemoryStore};

fn request(branch_service_id: i64, date: &str, time: &str) -> CreateAppointmentRequest {
    CreateAppointmentRequest {
        user_id: 42,
        branch_service_id,
        date: date.parse().expect("valid date"),
        time: time.parse().expect("valid time"),
        status: "on-queue".to_string(),
    }
}

async fn booking_service() -> (Arc<MemoryStore>, BookingService) {
    let store = Arc::new(MemoryStore::new());

    store
        .save_district(District {
            id: 1,
            name: "Gasabo".to_string(),
            province: "Kigali".to_string(),
        })
        .await
        .expect("save district");
    store
        .save_branch(Branch {
            id: 1,
            name: "Central".to_string(),
            address: None,
            district: "Gasabo".to_string(),
            province: Some("Kigali".to_string()),
        })
        .await
        .expect("save branch");
    store
        .save_service(Service {
            id: 10,
            name: "Account Opening".to_string(),
            description: None,
        })
        .await
        .expect("save service");
    store
        .save_branch_service(BranchService {
            id: 101,
            branch_id: 1,
            service_id: 10,
        })
        .await
        .expect("save association");

    let lookup = Arc::new(
        LookupIndex::load(store.clone() as Arc<dyn EntityStore>)
            .await
            .expect("load index"),
    );
    let service = BookingService::new(store.clone() as Arc<dyn EntityStore>, lookup);
    (store, service)
}

#[tokio::test]
async fn create_enriches_the_view_through_the_index() {
    let (_store, service) = booking_service().await;

    let view = service
        .create(request(101, "2025-06-02", "09:00:00"))
        .await
        .expect("create appointment");

    assert_eq!(view.branch_id, Some(1));
    assert_eq!(view.branch_name.as_deref(), Some("Central"));
    assert_eq!(view.service_id, Some(10));
    assert_eq!(view.service_name.as_deref(), Some("Account Opening"));
    assert_eq!(view.status, "on-queue");
}

#[tokio::test]
async fn create_rejects_an_unknown_association() {
    let (store, service) = booking_service().await;

    let result = service.create(request(999, "2025-06-02", "09:00:00")).await;

    assert!(result.is_err());
    let all = store.list_appointments().await.expect("list");
    assert!(all.is_empty(), "nothing was persisted");
}

#[tokio::test]
async fn batch_collects_failures_without_aborting() {
    let (store, service) = booking_service().await;

    let outcome = service
        .create_batch(vec![
            request(101, "2025-06-02", "09:00:00"),
            request(999, "2025-06-02", "10:00:00"),
            request(101, "2025-06-02", "11:00:00"),
        ])
        .await;

    assert_eq!(outcome.total_submitted, 3);
    assert_eq!(outcome.successfully_created, 2);
    assert_eq!(outcome.failed_count, 1);

    let failure = &outcome.failures[0];
    assert_eq!(failure.input_index, 1);
    assert_eq!(failure.input.branch_service_id, 999);
    assert!(failure.error.contains("999"));

    let all = store.list_appointments().await.expect("list");
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn update_status_replaces_the_string() {
    let (_store, service) = booking_service().await;

    let created = service
        .create(request(101, "2025-06-02", "09:00:00"))
        .await
        .expect("create appointment");

    let updated = service
        .update_status(created.id, "COMPLETED".to_string())
        .await
        .expect("update status")
        .expect("appointment exists");
    assert_eq!(updated.status, "COMPLETED");

    let missing = service
        .update_status(9999, "COMPLETED".to_string())
        .await
        .expect("update status");
    assert!(missing.is_none());
}

#[tokio::test]
async fn by_user_returns_only_that_users_appointments() {
    let (store, service) = booking_service().await;

    service
        .create(request(101, "2025-06-02", "09:00:00"))
        .await
        .expect("create");
    let mut other = request(101, "2025-06-02", "10:00:00");
    other.user_id = 7;
    service.create(other).await.expect("create");

    let views = service.by_user(42).await.expect("query");
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].user_id, 42);

    let all = store.list_appointments().await.expect("list");
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn by_date_and_branch_narrows_through_the_index() {
    let (_store, service) = booking_service().await;

    service
        .create(request(101, "2025-06-02", "09:00:00"))
        .await
        .expect("create");
    service
        .create(request(101, "2025-06-03", "09:00:00"))
        .await
        .expect("create");

    let hits = service
        .by_date_and_branch("2025-06-02".parse().expect("date"), 1)
        .await
        .expect("query");
    assert_eq!(hits.len(), 1);

    let none = service
        .by_date_and_branch("2025-06-02".parse().expect("date"), 99)
        .await
        .expect("query");
    assert!(none.is_empty());
}

#[tokio::test]
async fn today_by_branch_uses_the_current_date() {
    let (_store, service) = booking_service().await;

    let today = Local::now().date_naive();
    let mut todays = request(101, "2025-01-01", "09:00:00");
    todays.date = today;
    service.create(todays).await.expect("create");
    service
        .create(request(101, "2025-06-02", "09:00:00"))
        .await
        .expect("create");

    let hits = service.today_by_branch(1).await.expect("query");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].date, today);
}

#[tokio::test]
async fn delete_removes_the_record() {
    let (store, service) = booking_service().await;

    let created = service
        .create(request(101, "2025-06-02", "09:00:00"))
        .await
        .expect("create");
    service.delete(created.id).await.expect("delete");

    let all = store.list_appointments().await.expect("list");
    assert!(all.is_empty());
}
