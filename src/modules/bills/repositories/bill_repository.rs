// BillRepository implementation
// Provides SQLite operations for the bill ledger
//
// Implements:
// - Create bill within a caller's transaction (farmer FK enforced by the store)
// - Read bill by id, by farmer, or by a list of ids
// - Replace transaction fields of a bill
// - Delete bill within a caller's transaction

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool, Transaction};

use crate::core::amount::{parse_stored, parse_stored_opt, to_stored};
use crate::core::{AppError, Result};
use crate::modules::bills::models::{Bill, FarmerSnapshot};

const BILL_COLUMNS: &str = r#"
    id, farmer_id, farmer_name, farmer_number, driver_name, sugarcane_quality,
    vehicle_type, cutter, filled_vehicle_weight, empty_vehicle_weight,
    binding_material, only_sugarcane_weight, sugarcane_rate, given_money,
    remaining_money, payment_type, created_at, updated_at
"#;

/// Repository for bill database operations
#[derive(Clone)]
pub struct BillRepository {
    pool: SqlitePool,
}

impl BillRepository {
    /// Create a new bill repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a bill within an existing transaction
    ///
    /// # Errors
    /// * `InvalidReference` if `bill.farmer_id` does not name a farmer
    pub async fn create_with_tx(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        bill: &Bill,
    ) -> Result<Bill> {
        sqlx::query(
            r#"
            INSERT INTO bills (
                id, farmer_id, farmer_name, farmer_number, driver_name, sugarcane_quality,
                vehicle_type, cutter, filled_vehicle_weight, empty_vehicle_weight,
                binding_material, only_sugarcane_weight, sugarcane_rate, given_money,
                remaining_money, payment_type, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&bill.id)
        .bind(&bill.farmer_id)
        .bind(&bill.snapshot.farmer_name)
        .bind(&bill.snapshot.farmer_number)
        .bind(&bill.driver_name)
        .bind(&bill.sugarcane_quality)
        .bind(&bill.vehicle_type)
        .bind(&bill.cutter)
        .bind(to_stored(bill.filled_vehicle_weight))
        .bind(to_stored(bill.empty_vehicle_weight))
        .bind(to_stored(bill.binding_material))
        .bind(bill.only_sugarcane_weight.map(to_stored))
        .bind(to_stored(bill.sugarcane_rate))
        .bind(to_stored(bill.given_money))
        .bind(bill.remaining_money.map(to_stored))
        .bind(&bill.payment_type)
        .bind(bill.created_at)
        .bind(bill.updated_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_foreign_key_violation() {
                    return AppError::InvalidReference(format!(
                        "Farmer '{}' does not exist",
                        bill.farmer_id
                    ));
                }
            }
            AppError::Storage(e)
        })?;

        Ok(bill.clone())
    }

    /// Find bill by id
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Bill>> {
        let row = sqlx::query_as::<_, BillRow>(&format!(
            "SELECT {} FROM bills WHERE id = ?",
            BILL_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(BillRow::into_bill).transpose()
    }

    /// All bills recorded against a farmer, oldest first
    pub async fn list_by_farmer(&self, farmer_id: &str) -> Result<Vec<Bill>> {
        let rows = sqlx::query_as::<_, BillRow>(&format!(
            "SELECT {} FROM bills WHERE farmer_id = ? ORDER BY created_at, rowid",
            BILL_COLUMNS
        ))
        .bind(farmer_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(BillRow::into_bill).collect()
    }

    /// Bills for the given ids; ids with no bill are silently absent
    pub async fn list_by_ids(&self, ids: &[String]) -> Result<Vec<Bill>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM bills WHERE id IN (",
            BILL_COLUMNS
        ));
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(id.as_str());
        }
        separated.push_unseparated(")");

        let rows = query
            .build_query_as::<BillRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(BillRow::into_bill).collect()
    }

    /// Replace transaction fields and derived figures of a bill
    ///
    /// `farmer_id`, the farmer snapshot and `created_at` are never written.
    pub async fn update(&self, bill: &Bill) -> Result<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE bills
            SET
                driver_name = ?,
                sugarcane_quality = ?,
                vehicle_type = ?,
                cutter = ?,
                filled_vehicle_weight = ?,
                empty_vehicle_weight = ?,
                binding_material = ?,
                only_sugarcane_weight = ?,
                sugarcane_rate = ?,
                given_money = ?,
                remaining_money = ?,
                payment_type = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&bill.driver_name)
        .bind(&bill.sugarcane_quality)
        .bind(&bill.vehicle_type)
        .bind(&bill.cutter)
        .bind(to_stored(bill.filled_vehicle_weight))
        .bind(to_stored(bill.empty_vehicle_weight))
        .bind(to_stored(bill.binding_material))
        .bind(bill.only_sugarcane_weight.map(to_stored))
        .bind(to_stored(bill.sugarcane_rate))
        .bind(to_stored(bill.given_money))
        .bind(bill.remaining_money.map(to_stored))
        .bind(&bill.payment_type)
        .bind(bill.updated_at)
        .bind(&bill.id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::not_found(format!("Bill with id '{}' not found", bill.id)));
        }

        Ok(())
    }

    /// Delete a bill within an existing transaction
    ///
    /// The farmer history reference must be removed first in the same
    /// transaction; the store rejects deleting a still-referenced bill.
    ///
    /// # Returns
    /// * `true` if a bill was deleted
    pub async fn delete_with_tx(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        id: &str,
    ) -> Result<bool> {
        let rows_affected = sqlx::query("DELETE FROM bills WHERE id = ?")
            .bind(id)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }
}

// Helper structs for database mapping

#[derive(Debug, sqlx::FromRow)]
struct BillRow {
    id: String,
    farmer_id: String,
    farmer_name: String,
    farmer_number: String,
    driver_name: String,
    sugarcane_quality: String,
    vehicle_type: String,
    cutter: String,
    filled_vehicle_weight: String,
    empty_vehicle_weight: String,
    binding_material: String,
    only_sugarcane_weight: Option<String>,
    sugarcane_rate: String,
    given_money: String,
    remaining_money: Option<String>,
    payment_type: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BillRow {
    fn into_bill(self) -> Result<Bill> {
        Ok(Bill {
            filled_vehicle_weight: parse_stored("filled_vehicle_weight", &self.filled_vehicle_weight)?,
            empty_vehicle_weight: parse_stored("empty_vehicle_weight", &self.empty_vehicle_weight)?,
            binding_material: parse_stored("binding_material", &self.binding_material)?,
            only_sugarcane_weight: parse_stored_opt(
                "only_sugarcane_weight",
                self.only_sugarcane_weight.as_deref(),
            )?,
            sugarcane_rate: parse_stored("sugarcane_rate", &self.sugarcane_rate)?,
            given_money: parse_stored("given_money", &self.given_money)?,
            remaining_money: parse_stored_opt("remaining_money", self.remaining_money.as_deref())?,
            id: self.id,
            farmer_id: self.farmer_id,
            snapshot: FarmerSnapshot {
                farmer_name: self.farmer_name,
                farmer_number: self.farmer_number,
            },
            driver_name: self.driver_name,
            sugarcane_quality: self.sugarcane_quality,
            vehicle_type: self.vehicle_type,
            cutter: self.cutter,
            payment_type: self.payment_type,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
