use std::sync::Arc;

use analytics_cell::models::{PeakBucket, PeakGrouping};
use analytics_cell::services::AnalyticsService;
use lookup_cell::LookupIndex;
use shared_models::entities::{Appointment, Branch, BranchService, District, Service};
use shared_store::{EntityStore, MemoryStore};

fn appointment(branch_service_id: i64, date: &str, time: &str, status: &str) -> Appointment {
    Appointment {
        id: 0,
        user_id: 1,
        branch_service_id,
        date: date.parse().expect("valid date"),
        time: time.parse().expect("valid time"),
        status: status.to_string(),
    }
}

/// Central (branch 1, Gasabo) offers Account Opening and Loans; Remera
/// (branch 2, Gasabo) offers Account Opening.
async fn analytics_with(appointments: Vec<Appointment>) -> AnalyticsService {
    let store = Arc::new(MemoryStore::new());

    store
        .save_district(District {
            id: 1,
            name: "Gasabo".to_string(),
            province: "Kigali".to_string(),
        })
        .await
        .expect("save district");
    for (id, name) in [(1, "Central"), (2, "Remera")] {
        store
            .save_branch(Branch {
                id,
                name: name.to_string(),
                address: None,
                district: "Gasabo".to_string(),
                province: Some("Kigali".to_string()),
            })
            .await
            .expect("save branch");
    }
    for (id, name) in [(10, "Account Opening"), (11, "Loans")] {
        store
            .save_service(Service {
                id,
                name: name.to_string(),
                description: None,
            })
            .await
            .expect("save service");
    }
    for (id, branch_id, service_id) in [(101, 1, 10), (102, 1, 11), (103, 2, 10)] {
        store
            .save_branch_service(BranchService {
                id,
                branch_id,
                service_id,
            })
            .await
            .expect("save association");
    }
    for record in appointments {
        store.save_appointment(record).await.expect("save appointment");
    }

    let lookup = Arc::new(
        LookupIndex::load(store.clone() as Arc<dyn EntityStore>)
            .await
            .expect("load index"),
    );
    AnalyticsService::new(store as Arc<dyn EntityStore>, lookup)
}

fn june(day: u32) -> chrono::NaiveDate {
    format!("2025-06-{:02}", day).parse().expect("valid date")
}

#[tokio::test]
async fn peak_hours_rank_by_count_descending() {
    let analytics = analytics_with(vec![
        appointment(101, "2025-06-02", "09:00:00", "on-queue"),
        appointment(101, "2025-06-02", "09:30:00", "on-queue"),
        appointment(101, "2025-06-03", "10:00:00", "on-queue"),
        appointment(101, "2025-06-03", "14:00:00", "on-queue"),
    ])
    .await;

    let report = analytics
        .peak_times(None, None, None, june(1), june(30), PeakGrouping::Hour)
        .await
        .expect("aggregate");

    assert_eq!(
        report.buckets,
        vec![
            PeakBucket { bucket: 9, count: 2 },
            PeakBucket { bucket: 10, count: 1 },
            PeakBucket { bucket: 14, count: 1 },
        ]
    );
}

#[tokio::test]
async fn peak_ties_break_on_the_smaller_bucket_key() {
    let analytics = analytics_with(vec![
        appointment(101, "2025-06-02", "15:00:00", "on-queue"),
        appointment(101, "2025-06-02", "08:00:00", "on-queue"),
    ])
    .await;

    let report = analytics
        .peak_times(None, None, None, june(1), june(30), PeakGrouping::Hour)
        .await
        .expect("aggregate");

    assert_eq!(
        report.buckets,
        vec![
            PeakBucket { bucket: 8, count: 1 },
            PeakBucket { bucket: 15, count: 1 },
        ]
    );
}

#[tokio::test]
async fn day_of_week_buckets_use_iso_numbering() {
    // 2025-06-02 is a Monday, 2025-06-08 a Sunday.
    let analytics = analytics_with(vec![
        appointment(101, "2025-06-02", "09:00:00", "on-queue"),
        appointment(101, "2025-06-09", "09:00:00", "on-queue"),
        appointment(101, "2025-06-08", "09:00:00", "on-queue"),
    ])
    .await;

    let report = analytics
        .peak_times(None, None, None, june(1), june(30), PeakGrouping::DayOfWeek)
        .await
        .expect("aggregate");

    assert_eq!(
        report.buckets,
        vec![
            PeakBucket { bucket: 1, count: 2 },
            PeakBucket { bucket: 7, count: 1 },
        ]
    );
}

#[tokio::test]
async fn peak_times_narrow_by_district_scope() {
    let analytics = analytics_with(vec![
        appointment(101, "2025-06-02", "09:00:00", "on-queue"),
        appointment(103, "2025-06-02", "11:00:00", "on-queue"),
    ])
    .await;

    let scoped = analytics
        .peak_times(
            Some("Gasabo"),
            None,
            Some(10),
            june(1),
            june(30),
            PeakGrouping::Hour,
        )
        .await
        .expect("aggregate");
    assert_eq!(scoped.buckets.len(), 2);

    // A district with no registered associations aggregates nothing.
    let empty = analytics
        .peak_times(
            Some("Nowhere"),
            None,
            None,
            june(1),
            june(30),
            PeakGrouping::Hour,
        )
        .await
        .expect("aggregate");
    assert!(empty.buckets.is_empty());
}

#[tokio::test]
async fn branch_activity_counts_outcomes_per_service() {
    let analytics = analytics_with(vec![
        appointment(101, "2025-06-02", "09:00:00", "COMPLETED"),
        appointment(101, "2025-06-03", "09:00:00", "CANCELLED"),
        appointment(102, "2025-06-03", "10:00:00", "NO_SHOW"),
        appointment(102, "2025-06-04", "10:00:00", "COMPLETED"),
        // Another branch entirely; must not appear.
        appointment(103, "2025-06-04", "11:00:00", "COMPLETED"),
    ])
    .await;

    let report = analytics
        .branch_activity(1, june(1), june(30))
        .await
        .expect("aggregate");

    assert_eq!(report.branch_name.as_deref(), Some("Central"));
    assert_eq!(report.appointment_count, 4);
    assert_eq!(report.services.len(), 2);

    let account_opening = &report.services[0];
    assert_eq!(account_opening.service_id, 10);
    assert_eq!(account_opening.completed, 1);
    assert_eq!(account_opening.cancelled, 1);
    assert_eq!(account_opening.no_show, 0);

    let loans = &report.services[1];
    assert_eq!(loans.service_id, 11);
    assert_eq!(loans.completed, 1);
    assert_eq!(loans.no_show, 1);
}

#[tokio::test]
async fn branch_activity_lists_offered_services_even_without_appointments() {
    let analytics = analytics_with(Vec::new()).await;

    let report = analytics
        .branch_activity(1, june(1), june(30))
        .await
        .expect("aggregate");

    assert_eq!(report.appointment_count, 0);
    assert_eq!(report.services.len(), 2);
    assert!(report.services.iter().all(|s| s.completed == 0));
}

#[tokio::test]
async fn outcome_buckets_match_status_case_sensitively() {
    let analytics = analytics_with(vec![
        appointment(101, "2025-06-02", "09:00:00", "COMPLETED"),
        // Lowercase: counted in the total, excluded from every bucket.
        appointment(101, "2025-06-03", "09:00:00", "completed"),
        appointment(101, "2025-06-04", "09:00:00", "finished"),
    ])
    .await;

    let report = analytics
        .service_activity("Gasabo", 10, june(1), june(30))
        .await
        .expect("aggregate");

    assert_eq!(report.appointment_count, 3);
    assert_eq!(report.completed, 1);
    assert_eq!(report.cancelled, 0);
    assert_eq!(report.no_show, 0);
}

#[tokio::test]
async fn service_activity_spans_every_branch_in_the_district() {
    let analytics = analytics_with(vec![
        appointment(101, "2025-06-02", "09:00:00", "COMPLETED"),
        appointment(103, "2025-06-02", "10:00:00", "COMPLETED"),
        // Loans, not Account Opening; excluded.
        appointment(102, "2025-06-02", "11:00:00", "COMPLETED"),
    ])
    .await;

    let report = analytics
        .service_activity("Gasabo", 10, june(1), june(30))
        .await
        .expect("aggregate");

    assert_eq!(report.appointment_count, 2);
    assert_eq!(report.completed, 2);
    assert_eq!(report.service_name.as_deref(), Some("Account Opening"));
}

#[tokio::test]
async fn period_bounds_constrain_the_aggregation() {
    let analytics = analytics_with(vec![
        appointment(101, "2025-05-31", "09:00:00", "on-queue"),
        appointment(101, "2025-06-15", "09:00:00", "on-queue"),
        appointment(101, "2025-07-01", "09:00:00", "on-queue"),
    ])
    .await;

    let report = analytics
        .peak_times(None, None, None, june(1), june(30), PeakGrouping::Hour)
        .await
        .expect("aggregate");

    assert_eq!(report.buckets, vec![PeakBucket { bucket: 9, count: 1 }]);
}
