//! Canebook sugarcane purchase ledger
//!
//! Keeps the farmer directory and the bill ledger consistent: every bill
//! belongs to exactly one registered farmer and appears exactly once in that
//! farmer's history.

use std::sync::Arc;

use actix_web::web;
use sqlx::SqlitePool;

pub mod config;
pub mod core;
pub mod modules;

// Re-export commonly used types
pub use modules::bills;
pub use modules::calculation;
pub use modules::farmers;
pub use modules::history;

use modules::bills::{BillRepository, BillService};
use modules::farmers::{FarmerRepository, FarmerService};
use modules::history::{HistoryConfig, HistoryService};

/// Services shared by every HTTP worker
#[derive(Clone)]
pub struct AppServices {
    pub pool: SqlitePool,
    pub farmers: Arc<FarmerService>,
    pub bills: Arc<BillService>,
    pub history: Arc<HistoryService>,
}

impl AppServices {
    pub fn new(pool: SqlitePool, history_config: HistoryConfig) -> Self {
        let farmer_repo = FarmerRepository::new(pool.clone());
        let bill_repo = BillRepository::new(pool.clone());

        Self {
            farmers: Arc::new(FarmerService::new(farmer_repo.clone())),
            bills: Arc::new(BillService::new(
                pool.clone(),
                bill_repo.clone(),
                farmer_repo.clone(),
            )),
            history: Arc::new(HistoryService::new(farmer_repo, bill_repo, history_config)),
            pool,
        }
    }

    /// Register shared state and every route
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        let json_config = web::JsonConfig::default().error_handler(|err, _req| {
            crate::core::AppError::invalid_input(format!("Malformed request body: {}", err)).into()
        });

        cfg.app_data(json_config)
            .app_data(web::Data::new(self.pool.clone()))
            .app_data(web::Data::new(self.farmers.clone()))
            .app_data(web::Data::new(self.bills.clone()))
            .app_data(web::Data::new(self.history.clone()))
            .configure(modules::health::controllers::configure)
            .configure(modules::calculation::controllers::configure)
            .configure(modules::farmers::controllers::configure)
            .configure(modules::bills::controllers::configure);
    }
}
