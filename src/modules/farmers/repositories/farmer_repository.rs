// FarmerRepository implementation
// Provides SQLite operations for farmers and their bill history
//
// Implements:
// - Create farmer (mobile number unique)
// - Read farmer by id or mobile number, with bill history
// - List farmer summaries
// - Update name / mobile number
// - Append and remove bill history references inside a caller's transaction

use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::core::{AppError, Result};
use crate::modules::farmers::models::{Farmer, FarmerSummary};

/// Repository for farmer database operations
#[derive(Clone)]
pub struct FarmerRepository {
    pool: SqlitePool,
}

impl FarmerRepository {
    /// Create a new farmer repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new farmer
    ///
    /// # Errors
    /// * `DuplicateFarmer` if the mobile number is already registered
    pub async fn create(&self, farmer: &Farmer) -> Result<Farmer> {
        sqlx::query(
            r#"
            INSERT INTO farmers (id, name, mobile_number, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&farmer.id)
        .bind(&farmer.name)
        .bind(&farmer.mobile_number)
        .bind(farmer.created_at)
        .bind(farmer.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &farmer.mobile_number))?;

        Ok(farmer.clone())
    }

    /// Find farmer by id, including bill history
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Farmer>> {
        let row = sqlx::query_as::<_, FarmerRow>(
            r#"
            SELECT id, name, mobile_number, created_at, updated_at
            FROM farmers
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        self.with_history(row).await
    }

    /// Find farmer by mobile number, including bill history
    pub async fn find_by_mobile_number(&self, mobile_number: &str) -> Result<Option<Farmer>> {
        let row = sqlx::query_as::<_, FarmerRow>(
            r#"
            SELECT id, name, mobile_number, created_at, updated_at
            FROM farmers
            WHERE mobile_number = ?
            "#,
        )
        .bind(mobile_number)
        .fetch_optional(&self.pool)
        .await?;

        self.with_history(row).await
    }

    /// List every farmer without bill history
    pub async fn list_all(&self) -> Result<Vec<FarmerSummary>> {
        let farmers = sqlx::query_as::<_, FarmerSummary>(
            r#"
            SELECT id, name, mobile_number, created_at
            FROM farmers
            ORDER BY name, mobile_number
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(farmers)
    }

    /// Persist name, mobile number and updated_at
    ///
    /// Bill snapshots are never touched.
    pub async fn update(&self, farmer: &Farmer) -> Result<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE farmers
            SET name = ?, mobile_number = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&farmer.name)
        .bind(&farmer.mobile_number)
        .bind(farmer.updated_at)
        .bind(&farmer.id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &farmer.mobile_number))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::farmer_not_found(format!("id '{}'", farmer.id)));
        }

        Ok(())
    }

    /// Bill ids referenced by a farmer, oldest first
    pub async fn bill_history(&self, farmer_id: &str) -> Result<Vec<String>> {
        let ids = sqlx::query_scalar::<_, String>(
            r#"
            SELECT bill_id
            FROM farmer_bill_history
            WHERE farmer_id = ?
            ORDER BY position ASC
            "#,
        )
        .bind(farmer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    /// Append a bill reference to a farmer's history within a transaction
    ///
    /// A single-row insert, so concurrent appends for the same farmer cannot
    /// overwrite each other. Appending a bill id that is already referenced
    /// is a no-op.
    ///
    /// # Returns
    /// * `true` if a reference was added, `false` if it already existed
    pub async fn append_bill_reference_with_tx(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        farmer_id: &str,
        bill_id: &str,
    ) -> Result<bool> {
        let rows_affected = sqlx::query(
            r#"
            INSERT INTO farmer_bill_history (farmer_id, bill_id)
            VALUES (?, ?)
            ON CONFLICT(bill_id) DO NOTHING
            "#,
        )
        .bind(farmer_id)
        .bind(bill_id)
        .execute(&mut **tx)
        .await?
        .rows_affected();

        Ok(rows_affected == 1)
    }

    /// Remove a bill reference from whichever farmer holds it
    ///
    /// # Returns
    /// * `true` if a reference was removed
    pub async fn remove_bill_reference_with_tx(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        bill_id: &str,
    ) -> Result<bool> {
        let rows_affected = sqlx::query("DELETE FROM farmer_bill_history WHERE bill_id = ?")
            .bind(bill_id)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }

    async fn with_history(&self, row: Option<FarmerRow>) -> Result<Option<Farmer>> {
        let Some(row) = row else {
            return Ok(None);
        };

        let bill_history = self.bill_history(&row.id).await?;
        Ok(Some(row.into_farmer(bill_history)))
    }
}

fn map_unique_violation(e: sqlx::Error, mobile_number: &str) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return AppError::DuplicateFarmer(mobile_number.to_string());
        }
    }
    AppError::Storage(e)
}

// Helper structs for database mapping

#[derive(Debug, sqlx::FromRow)]
struct FarmerRow {
    id: String,
    name: String,
    mobile_number: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl FarmerRow {
    fn into_farmer(self, bill_history: Vec<String>) -> Farmer {
        Farmer {
            id: self.id,
            name: self.name,
            mobile_number: self.mobile_number,
            bill_history,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
