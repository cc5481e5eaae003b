use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{error, info, warn};

use crate::core::identifier::parse_id;
use crate::core::{AppError, Result};
use crate::modules::bills::models::{Bill, CreateBillRequest, UpdateBillRequest};
use crate::modules::bills::repositories::BillRepository;
use crate::modules::farmers::repositories::FarmerRepository;
use crate::modules::farmers::Farmer;

/// Service for the bill ledger and the bill-to-farmer linking path
///
/// `create_bill` is the only way a bill comes into existence. The bill row
/// and the farmer's history reference are written in one transaction, so
/// callers never observe one without the other.
#[derive(Clone)]
pub struct BillService {
    pool: SqlitePool,
    bill_repo: BillRepository,
    farmer_repo: FarmerRepository,
}

impl BillService {
    pub fn new(pool: SqlitePool, bill_repo: BillRepository, farmer_repo: FarmerRepository) -> Self {
        Self {
            pool,
            bill_repo,
            farmer_repo,
        }
    }

    /// Create a bill for the farmer registered under the request's mobile number
    ///
    /// 1. Resolve the farmer by mobile number
    /// 2. Snapshot the farmer's name and number onto the bill
    /// 3. Insert the bill
    /// 4. Append the bill id to the farmer's history
    /// 5. Commit and return the bill
    ///
    /// # Errors
    /// * `InvalidInput` if the request fails validation
    /// * `FarmerNotFound` if no farmer has that mobile number
    /// * `InvalidReference` if the farmer vanished before the insert
    /// * `ConsistencyFailure` if the history append failed; nothing is persisted
    pub async fn create_bill(&self, request: CreateBillRequest) -> Result<Bill> {
        let (mobile_number, fields) = request.validate()?;

        let farmer = self
            .farmer_repo
            .find_by_mobile_number(&mobile_number)
            .await?
            .ok_or_else(|| {
                AppError::farmer_not_found(format!("mobile number '{}'", mobile_number))
            })?;

        let bill = Bill::new(&farmer, fields);

        let mut tx = self.pool.begin().await?;

        // Dropping tx on error rolls the insert back
        let created = self.bill_repo.create_with_tx(&mut tx, &bill).await?;

        match self
            .farmer_repo
            .append_bill_reference_with_tx(&mut tx, &farmer.id, &created.id)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                return Err(self
                    .abort_link(tx, &farmer, &created, "bill id already referenced".to_string())
                    .await);
            }
            Err(e) => {
                return Err(self.abort_link(tx, &farmer, &created, e.to_string()).await);
            }
        }

        tx.commit().await?;

        info!(
            bill_id = %created.id,
            farmer_id = %farmer.id,
            mobile_number = %farmer.mobile_number,
            "Bill created and linked to farmer"
        );
        Ok(created)
    }

    /// Fetch a single bill
    pub async fn get_bill(&self, id: &str) -> Result<Bill> {
        let id = parse_id(id)?;

        self.bill_repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Bill with id '{}' not found", id)))
    }

    /// Replace a bill's transaction fields and recompute derived figures
    ///
    /// The farmer link, snapshot and creation time are kept as they are.
    pub async fn update_bill(&self, id: &str, request: UpdateBillRequest) -> Result<Bill> {
        let fields = request.validate()?;
        let mut bill = self.get_bill(id).await?;

        bill.apply_fields(fields);
        self.bill_repo.update(&bill).await?;

        info!(bill_id = %bill.id, farmer_id = %bill.farmer_id, "Bill updated");
        Ok(bill)
    }

    /// Delete a bill together with its farmer history reference
    ///
    /// # Errors
    /// * `InvalidIdentifier` if `id` is malformed
    /// * `NotFound` if no bill has that id
    pub async fn delete_bill(&self, id: &str) -> Result<()> {
        let id = parse_id(id)?;

        let mut tx = self.pool.begin().await?;

        let unlinked = self
            .farmer_repo
            .remove_bill_reference_with_tx(&mut tx, &id)
            .await?;
        let deleted = self.bill_repo.delete_with_tx(&mut tx, &id).await?;

        if !deleted {
            tx.rollback().await?;
            return Err(AppError::not_found(format!("Bill with id '{}' not found", id)));
        }

        tx.commit().await?;

        if !unlinked {
            warn!(bill_id = %id, "Deleted bill had no farmer history reference");
        }
        info!(bill_id = %id, "Bill deleted");
        Ok(())
    }

    /// Roll back a half-finished link and report it as a consistency failure
    async fn abort_link(
        &self,
        tx: Transaction<'_, Sqlite>,
        farmer: &Farmer,
        bill: &Bill,
        cause: String,
    ) -> AppError {
        let rollback = tx.rollback().await;

        error!(
            bill_id = %bill.id,
            farmer_id = %farmer.id,
            mobile_number = %farmer.mobile_number,
            cause = %cause,
            rolled_back = rollback.is_ok(),
            "Failed to append bill to farmer history"
        );

        if let Err(e) = rollback {
            error!(bill_id = %bill.id, error = %e, "Rollback after failed history append failed");
        }

        AppError::ConsistencyFailure(format!(
            "bill '{}' could not be linked to farmer '{}': {}",
            bill.id, farmer.id, cause
        ))
    }
}

// Linking behavior against a real database is covered in
// tests/integration/bill_linking_test.rs and bill_deletion_test.rs
