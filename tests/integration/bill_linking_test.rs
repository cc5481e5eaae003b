// Bill creation and the farmer history link
//
// A created bill must appear in its farmer's history exactly once, carry
// the farmer's identity as it was at creation time, and never exist
// without that history reference.

#[path = "../helpers/mod.rs"]
mod helpers;

use canebook::bills::{Bill, BillRepository, CreateBillRequest};
use canebook::core::amount::RawAmount;
use canebook::core::AppError;
use canebook::farmers::{Farmer, FarmerRepository, UpdateFarmerRequest};
use futures_util::future::join_all;
use helpers::*;
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_reference_bill_for_registered_farmer() {
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

    assert_eq!(bill.farmer_id, farmer.id);
    assert_eq!(bill.snapshot.farmer_name, "Ram");
    assert_eq!(bill.snapshot.farmer_number, "9000000001");
    assert_eq!(bill.only_sugarcane_weight, Some(dec!(750)));
    assert_eq!(bill.total_bill(), Some(dec!(2250)));
    assert_eq!(bill.remaining_money, Some(dec!(1250)));

    let reloaded = services
        .farmers
        .get_by_mobile_number("9000000001")
        .await
        .unwrap();
    assert_eq!(reloaded.bill_history, vec![bill.id.clone()]);

    let stored = services.bills.get_bill(&bill.id).await.unwrap();
    assert_eq!(stored, bill);
}

#[tokio::test]
async fn test_unknown_mobile_number_creates_nothing() {
    let services = create_test_services().await;

    let result = services
        .bills
        .create_bill(TestDataFactory::create_bill_request("9999999999"))
        .await;

    assert!(matches!(result, Err(AppError::FarmerNotFound(_))));
    assert_eq!(count_rows(&services.pool, "bills").await, 0);
    assert_eq!(count_rows(&services.pool, "farmer_bill_history").await, 0);
}

#[tokio::test]
async fn test_negative_amount_is_rejected_before_lookup() {
    let services = create_test_services().await;
    services
        .farmers
        .register_farmer(TestDataFactory::register_request("Ram", "9000000001"))
        .await
        .unwrap();

    let mut fields = TestDataFactory::reference_fields();
    fields.given_money = Some(RawAmount::from(-5i64));

    let result = services
        .bills
        .create_bill(CreateBillRequest {
            mobile_number: "9000000001".to_string(),
            fields,
        })
        .await;

    assert!(matches!(result, Err(AppError::InvalidInput(_))));
    assert_eq!(count_rows(&services.pool, "bills").await, 0);
    assert!(services
        .farmers
        .get_by_mobile_number("9000000001")
        .await
        .unwrap()
        .bill_history
        .is_empty());
}

#[tokio::test]
async fn test_garbage_amounts_read_as_zero() {
    let services = create_test_services().await;
    services
        .farmers
        .register_farmer(TestDataFactory::register_request("Ram", "9000000001"))
        .await
        .unwrap();

    let mut fields = TestDataFactory::reference_fields();
    fields.sugarcane_rate = Some(RawAmount::from("three"));
    fields.given_money = None;

    let bill = services
        .bills
        .create_bill(CreateBillRequest {
            mobile_number: "9000000001".to_string(),
            fields,
        })
        .await
        .unwrap();

    assert_eq!(bill.sugarcane_rate, dec!(0));
    assert_eq!(bill.only_sugarcane_weight, Some(dec!(750)));
    assert_eq!(bill.total_bill(), None);
    assert_eq!(bill.remaining_money, Some(dec!(0)));
}

#[tokio::test]
async fn test_snapshot_survives_farmer_rename() {
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

    services
        .farmers
        .update_farmer(
            &farmer.id,
            UpdateFarmerRequest {
                name: Some("Ram Patil".to_string()),
                mobile_number: Some("9000000009".to_string()),
            },
        )
        .await
        .unwrap();

    let history = services
        .history
        .get_farmer_with_bills(&farmer.id, chrono::Utc::now())
        .await
        .unwrap();

    assert_eq!(history.name, "Ram Patil");
    assert_eq!(history.bills.len(), 1);
    assert_eq!(history.bills[0].bill.id, bill.id);
    assert_eq!(history.bills[0].bill.snapshot.farmer_name, "Ram");
    assert_eq!(history.bills[0].bill.snapshot.farmer_number, "9000000001");
}

#[tokio::test]
async fn test_concurrent_bills_for_same_farmer_are_all_linked() {
    let services = create_test_services().await;
    services
        .farmers
        .register_farmer(TestDataFactory::register_request("Ram", "9000000001"))
        .await
        .unwrap();

    let results = join_all((0..8).map(|_| {
        services
            .bills
            .create_bill(TestDataFactory::create_bill_request("9000000001"))
    }))
    .await;

    let mut created: Vec<String> = results.into_iter().map(|r| r.unwrap().id).collect();
    created.sort();

    let mut history = services
        .farmers
        .get_by_mobile_number("9000000001")
        .await
        .unwrap()
        .bill_history;
    history.sort();

    assert_eq!(history, created);
    assert_eq!(count_rows(&services.pool, "bills").await, 8);
}

#[tokio::test]
async fn test_concurrent_bills_on_shared_file_database() {
    let dir = std::env::temp_dir().join(format!("canebook-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    let config = canebook::config::DatabaseConfig {
        url: format!("sqlite://{}", dir.join("ledger.db").display()),
        max_connections: 4,
        acquire_timeout_secs: 30,
    };
    let pool = config.create_pool().await.unwrap();
    let services = canebook::AppServices::new(pool, Default::default());
    services
        .farmers
        .register_farmer(TestDataFactory::register_request("Ram", "9000000001"))
        .await
        .unwrap();

    let tasks: Vec<_> = (0..4)
        .map(|_| {
            let bills = services.bills.clone();
            tokio::spawn(async move {
                bills
                    .create_bill(TestDataFactory::create_bill_request("9000000001"))
                    .await
            })
        })
        .collect();

    let mut created = Vec::new();
    for task in join_all(tasks).await {
        created.push(task.unwrap().unwrap().id);
    }

    let history = services
        .farmers
        .get_by_mobile_number("9000000001")
        .await
        .unwrap()
        .bill_history;

    assert_eq!(history.len(), 4);
    for id in &created {
        assert_eq!(history.iter().filter(|h| *h == id).count(), 1);
    }

    services.pool.close().await;
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_failed_history_append_leaves_no_bill() {
    let services = create_test_services().await;
    services
        .farmers
        .register_farmer(TestDataFactory::register_request("Ram", "9000000001"))
        .await
        .unwrap();

    // Reads still work, but every history append now aborts
    sqlx::query(
        r#"
        CREATE TRIGGER reject_history_append
        BEFORE INSERT ON farmer_bill_history
        BEGIN
            SELECT RAISE(ABORT, 'history store unavailable');
        END
        "#,
    )
    .execute(&services.pool)
    .await
    .unwrap();

    let result = services
        .bills
        .create_bill(TestDataFactory::create_bill_request("9000000001"))
        .await;

    match result {
        Err(AppError::ConsistencyFailure(message)) => {
            assert!(message.contains("could not be linked"));
        }
        other => panic!("expected ConsistencyFailure, got {:?}", other),
    }
    assert_eq!(count_rows(&services.pool, "bills").await, 0);
    assert!(services
        .farmers
        .get_by_mobile_number("9000000001")
        .await
        .unwrap()
        .bill_history
        .is_empty());
}

#[tokio::test]
async fn test_repeated_history_append_is_noop() {
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
    let farmer_repo = FarmerRepository::new(services.pool.clone());

    let mut tx = services.pool.begin().await.unwrap();
    let added = farmer_repo
        .append_bill_reference_with_tx(&mut tx, &farmer.id, &bill.id)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert!(!added);
    assert_eq!(farmer_repo.bill_history(&farmer.id).await.unwrap(), vec![bill.id]);
}

#[tokio::test]
async fn test_bill_for_unregistered_farmer_is_invalid_reference() {
    let services = create_test_services().await;
    let bill_repo = BillRepository::new(services.pool.clone());

    // Built in memory only, never stored
    let ghost = Farmer::new("Ghost", "9000000099").unwrap();
    let bill = Bill::new(&ghost, TestDataFactory::reference_fields().validate().unwrap());

    let mut tx = services.pool.begin().await.unwrap();
    let result = bill_repo.create_with_tx(&mut tx, &bill).await;
    tx.rollback().await.unwrap();

    assert!(matches!(result, Err(AppError::InvalidReference(_))));
    assert_eq!(count_rows(&services.pool, "bills").await, 0);
}

#[tokio::test]
async fn test_list_by_farmer_returns_only_that_farmers_bills() {
    let services = create_test_services().await;
    let ram = services
        .farmers
        .register_farmer(TestDataFactory::register_request("Ram", "9000000001"))
        .await
        .unwrap();
    let shyam = services
        .farmers
        .register_farmer(TestDataFactory::register_request("Shyam", "9000000002"))
        .await
        .unwrap();

    let mut ram_bills = Vec::new();
    for number in ["9000000001", "9000000002", "9000000001"] {
        let bill = services
            .bills
            .create_bill(TestDataFactory::create_bill_request(number))
            .await
            .unwrap();
        if number == "9000000001" {
            ram_bills.push(bill.id);
        }
    }

    let bill_repo = BillRepository::new(services.pool.clone());
    let for_ram: Vec<String> = bill_repo
        .list_by_farmer(&ram.id)
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.id)
        .collect();
    let for_shyam = bill_repo.list_by_farmer(&shyam.id).await.unwrap();

    assert_eq!(for_ram, ram_bills);
    assert_eq!(for_shyam.len(), 1);
    assert_eq!(for_shyam[0].farmer_id, shyam.id);
    assert!(bill_repo
        .list_by_farmer(&canebook::core::identifier::new_id())
        .await
        .unwrap()
        .is_empty());
}
