// Bills module: the bill ledger and the bill-to-farmer linking path

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Bill, CreateBillRequest, FarmerSnapshot, UpdateBillRequest};
pub use repositories::BillRepository;
pub use services::BillService;
