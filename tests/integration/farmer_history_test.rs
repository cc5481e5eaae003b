// Farmer history view
//
// Bills come back most recent first, totals are recomputed from raw
// inputs, and references that no longer resolve are skipped.

#[path = "../helpers/mod.rs"]
mod helpers;

use canebook::bills::CreateBillRequest;
use canebook::core::AppError;
use chrono::{Duration, Utc};
use helpers::*;
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_bills_are_sorted_by_created_at_descending() {
    let services = create_test_services().await;
    let farmer = services
        .farmers
        .register_farmer(TestDataFactory::register_request("Ram", "9000000001"))
        .await
        .unwrap();

    let mut ids = Vec::new();
    for _ in 0..3 {
        let bill = services
            .bills
            .create_bill(TestDataFactory::create_bill_request("9000000001"))
            .await
            .unwrap();
        ids.push(bill.id);
    }

    // Creation order no longer matches chronological order
    let now = Utc::now();
    set_bill_created_at(&services.pool, &ids[0], now - Duration::days(1)).await;
    set_bill_created_at(&services.pool, &ids[1], now - Duration::days(3)).await;
    set_bill_created_at(&services.pool, &ids[2], now - Duration::days(2)).await;

    let history = services
        .history
        .get_farmer_with_bills(&farmer.id, now)
        .await
        .unwrap();

    let order: Vec<&str> = history.bills.iter().map(|v| v.bill.id.as_str()).collect();
    assert_eq!(order, vec![ids[0].as_str(), ids[2].as_str(), ids[1].as_str()]);
}

#[tokio::test]
async fn test_summary_uses_recomputed_figures() {
    let services = create_test_services().await;
    let farmer = services
        .farmers
        .register_farmer(TestDataFactory::register_request("Ram", "9000000001"))
        .await
        .unwrap();

    let recent = services
        .bills
        .create_bill(TestDataFactory::create_bill_request("9000000001"))
        .await
        .unwrap();
    let old = services
        .bills
        .create_bill(TestDataFactory::create_bill_request("9000000001"))
        .await
        .unwrap();
    services
        .bills
        .create_bill(CreateBillRequest {
            mobile_number: "9000000001".to_string(),
            fields: TestDataFactory::bill_fields(1000, 200, 50, 3, 3000),
        })
        .await
        .unwrap();

    let now = Utc::now();
    set_bill_created_at(&services.pool, &old.id, now - Duration::days(10)).await;

    // A stale cached balance must not leak into the summary
    sqlx::query("UPDATE bills SET remaining_money = '999999' WHERE id = ?")
        .bind(&recent.id)
        .execute(&services.pool)
        .await
        .unwrap();

    let history = services
        .history
        .get_farmer_with_bills(&farmer.id, now)
        .await
        .unwrap();

    assert_eq!(history.summary.bill_count, 3);
    assert_eq!(history.summary.recent_bill_count, 2);
    assert_eq!(history.summary.total_amount, dec!(6750));
    assert_eq!(history.summary.total_remaining, dec!(1750));

    let old_view = history
        .bills
        .iter()
        .find(|v| v.bill.id == old.id)
        .unwrap();
    assert!(!old_view.is_recent);
    assert_eq!(old_view.total_bill, Some(dec!(2250)));
}

#[tokio::test]
async fn test_farmer_without_bills() {
    let services = create_test_services().await;
    let farmer = services
        .farmers
        .register_farmer(TestDataFactory::register_request("Ram", "9000000001"))
        .await
        .unwrap();

    let history = services
        .history
        .get_farmer_with_bills(&farmer.id, Utc::now())
        .await
        .unwrap();

    assert_eq!(history.farmer_id, farmer.id);
    assert_eq!(history.mobile_number, "9000000001");
    assert!(history.bills.is_empty());
    assert_eq!(history.summary.total_amount, dec!(0));
}

#[tokio::test]
async fn test_dangling_reference_is_skipped() {
    let services = create_test_services().await;
    let farmer = services
        .farmers
        .register_farmer(TestDataFactory::register_request("Ram", "9000000001"))
        .await
        .unwrap();
    let bill = services
        .bills
        .create_bill(TestDataFactory::create_bill_request("9000000001"))
        .await
        .unwrap();

    // Simulate a reference left behind by an older store without cascades
    sqlx::query("PRAGMA foreign_keys = OFF")
        .execute(&services.pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO farmer_bill_history (farmer_id, bill_id) VALUES (?, ?)")
        .bind(&farmer.id)
        .bind(uuid::Uuid::new_v4().to_string())
        .execute(&services.pool)
        .await
        .unwrap();
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&services.pool)
        .await
        .unwrap();

    let history = services
        .history
        .get_farmer_with_bills(&farmer.id, Utc::now())
        .await
        .unwrap();

    assert_eq!(history.bills.len(), 1);
    assert_eq!(history.bills[0].bill.id, bill.id);
    assert_eq!(history.summary.bill_count, 1);
}

#[tokio::test]
async fn test_identifier_errors() {
    let services = create_test_services().await;

    let malformed = services
        .history
        .get_farmer_with_bills("farmer-1", Utc::now())
        .await;
    let unknown = services
        .history
        .get_farmer_with_bills("6f9619ff-8b86-4d01-b42d-00c04fc964ff", Utc::now())
        .await;

    assert!(matches!(malformed, Err(AppError::InvalidIdentifier(_))));
    assert!(matches!(unknown, Err(AppError::FarmerNotFound(_))));
}

#[tokio::test]
async fn test_search_against_directory() {
    let services = create_test_services().await;
    for (name, number) in [("Ram Patil", "9000000001"), ("Shyam", "9000000002")] {
        services
            .farmers
            .register_farmer(TestDataFactory::register_request(name, number))
            .await
            .unwrap();
    }

    let by_name = services.history.search("patil").await.unwrap();
    let exact = services.history.search("9000000002").await.unwrap();
    let blank = services.history.search("").await.unwrap();

    assert_eq!(by_name.matches.len(), 1);
    assert_eq!(by_name.matches[0].name, "Ram Patil");
    assert_eq!(exact.selected.map(|f| f.name), Some("Shyam".to_string()));
    assert!(blank.matches.is_empty());
}
