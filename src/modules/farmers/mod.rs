// Farmers module: the farmer directory

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Farmer, FarmerSummary, RegisterFarmerRequest, UpdateFarmerRequest};
pub use repositories::FarmerRepository;
pub use services::FarmerService;
