mod history;

pub use history::{
    BillView, FarmerSearch, FarmerWithBills, HistoryConfig, HistorySummary,
    DEFAULT_RECENT_WINDOW_DAYS,
};
