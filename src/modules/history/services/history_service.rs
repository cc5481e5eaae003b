use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::core::identifier::parse_id;
use crate::core::{AppError, Result};
use crate::modules::bills::repositories::BillRepository;
use crate::modules::bills::Bill;
use crate::modules::farmers::repositories::FarmerRepository;
use crate::modules::history::models::{
    BillView, FarmerSearch, FarmerWithBills, HistoryConfig, HistorySummary,
};

/// Service composing a farmer with their bills for display
#[derive(Clone)]
pub struct HistoryService {
    farmer_repo: FarmerRepository,
    bill_repo: BillRepository,
    config: HistoryConfig,
}

impl HistoryService {
    pub fn new(
        farmer_repo: FarmerRepository,
        bill_repo: BillRepository,
        config: HistoryConfig,
    ) -> Self {
        Self {
            farmer_repo,
            bill_repo,
            config,
        }
    }

    /// Farmer with every bill in their history, most recent first
    ///
    /// Bills are resolved through the farmer's history. A reference that no
    /// longer resolves, or that points at another farmer's bill, is skipped.
    ///
    /// # Errors
    /// * `InvalidIdentifier` if `farmer_id` is malformed
    /// * `FarmerNotFound` if no farmer has that id
    pub async fn get_farmer_with_bills(
        &self,
        farmer_id: &str,
        now: DateTime<Utc>,
    ) -> Result<FarmerWithBills> {
        let farmer_id = parse_id(farmer_id)?;

        let farmer = self
            .farmer_repo
            .find_by_id(&farmer_id)
            .await?
            .ok_or_else(|| AppError::farmer_not_found(format!("id '{}'", farmer_id)))?;

        let mut by_id: HashMap<String, Bill> = self
            .bill_repo
            .list_by_ids(&farmer.bill_history)
            .await?
            .into_iter()
            .map(|bill| (bill.id.clone(), bill))
            .collect();

        // Newest references first so equal timestamps keep append order reversed
        let mut bills = Vec::with_capacity(farmer.bill_history.len());
        for bill_id in farmer.bill_history.iter().rev() {
            match by_id.remove(bill_id) {
                Some(bill) if bill.farmer_id == farmer.id => {
                    bills.push(BillView::new(bill, &self.config, now));
                }
                Some(bill) => {
                    warn!(
                        farmer_id = %farmer.id,
                        bill_id = %bill_id,
                        owner_id = %bill.farmer_id,
                        "Skipping history reference to another farmer's bill"
                    );
                }
                None => {
                    warn!(
                        farmer_id = %farmer.id,
                        bill_id = %bill_id,
                        "Skipping dangling bill reference in farmer history"
                    );
                }
            }
        }

        bills.sort_by(|a, b| b.bill.created_at.cmp(&a.bill.created_at));
        let summary = HistorySummary::from_views(&bills);

        debug!(
            farmer_id = %farmer.id,
            bill_count = summary.bill_count,
            recent_bill_count = summary.recent_bill_count,
            "Farmer history composed"
        );

        Ok(FarmerWithBills {
            farmer_id: farmer.id,
            name: farmer.name,
            mobile_number: farmer.mobile_number,
            bills,
            summary,
        })
    }

    /// Search the farmer directory by partial name or mobile number
    pub async fn search(&self, query: &str) -> Result<FarmerSearch> {
        if query.trim().is_empty() {
            return Ok(FarmerSearch::default());
        }

        let farmers = self.farmer_repo.list_all().await?;
        Ok(FarmerSearch::filter(farmers, query))
    }
}

// Service behavior against a real database is covered in
// tests/integration/farmer_history_test.rs
