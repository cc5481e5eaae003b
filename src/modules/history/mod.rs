// History module: read-side composition of a farmer and their bills

pub mod controllers;
pub mod models;
pub mod services;

pub use models::{
    BillView, FarmerSearch, FarmerWithBills, HistoryConfig, HistorySummary,
    DEFAULT_RECENT_WINDOW_DAYS,
};
pub use services::HistoryService;
