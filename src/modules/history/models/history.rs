// Read-side shapes for a farmer's purchase history
//
// Nothing here is stored. Totals are recomputed from each bill's raw
// inputs so a stale cached figure never leaks into a summary.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::modules::bills::Bill;
use crate::modules::farmers::FarmerSummary;

/// Default number of whole days a bill counts as recent
pub const DEFAULT_RECENT_WINDOW_DAYS: i64 = 7;

/// History view settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryConfig {
    pub recent_window_days: i64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            recent_window_days: DEFAULT_RECENT_WINDOW_DAYS,
        }
    }
}

impl HistoryConfig {
    /// Whether a bill created at `created_at` is recent as of `now`
    ///
    /// Age is counted in whole elapsed days, so a bill exactly
    /// `recent_window_days` days old still counts.
    pub fn is_recent(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        (now - created_at).num_days() <= self.recent_window_days
    }
}

/// A stored bill with figures recomputed for display
#[derive(Debug, Clone, Serialize)]
pub struct BillView {
    #[serde(flatten)]
    pub bill: Bill,
    pub total_bill: Option<Decimal>,
    pub is_recent: bool,
}

impl BillView {
    pub fn new(bill: Bill, config: &HistoryConfig, now: DateTime<Utc>) -> Self {
        let total_bill = bill.total_bill();
        let is_recent = config.is_recent(bill.created_at, now);

        Self {
            bill,
            total_bill,
            is_recent,
        }
    }
}

/// Aggregates over the bills returned for one farmer
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistorySummary {
    pub bill_count: usize,
    pub recent_bill_count: usize,
    /// Sum of recomputed totals; bills without a positive total add nothing
    pub total_amount: Decimal,
    /// Sum of recomputed balances, over-payments included
    pub total_remaining: Decimal,
}

impl HistorySummary {
    pub fn from_views(views: &[BillView]) -> Self {
        views.iter().fold(Self::default(), |mut summary, view| {
            summary.bill_count += 1;
            if view.is_recent {
                summary.recent_bill_count += 1;
            }

            let remaining = view.bill.recalculate().remaining_money;
            summary.total_amount = summary
                .total_amount
                .saturating_add(view.total_bill.unwrap_or(Decimal::ZERO));
            summary.total_remaining = summary
                .total_remaining
                .saturating_add(remaining.unwrap_or(Decimal::ZERO));
            summary
        })
    }
}

/// A farmer together with their bills, most recent first
#[derive(Debug, Clone, Serialize)]
pub struct FarmerWithBills {
    pub farmer_id: String,
    pub name: String,
    pub mobile_number: String,
    pub bills: Vec<BillView>,
    pub summary: HistorySummary,
}

/// Result of a farmer search
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FarmerSearch {
    pub matches: Vec<FarmerSummary>,
    /// Farmer whose mobile number equals the query exactly
    pub selected: Option<FarmerSummary>,
}

impl FarmerSearch {
    /// Filter a farmer listing by `query`
    ///
    /// A farmer matches on a substring of the mobile number or a
    /// case-insensitive substring of the name. A blank query matches nothing.
    pub fn filter(farmers: Vec<FarmerSummary>, query: &str) -> Self {
        let query = query.trim();
        if query.is_empty() {
            return Self::default();
        }

        let needle = query.to_lowercase();
        let matches: Vec<FarmerSummary> = farmers
            .into_iter()
            .filter(|f| f.mobile_number.contains(query) || f.name.to_lowercase().contains(&needle))
            .collect();

        let selected = matches
            .iter()
            .find(|f| f.mobile_number == query)
            .cloned();

        Self { matches, selected }
    }
}
