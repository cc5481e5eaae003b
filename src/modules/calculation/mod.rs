// Calculation module: weighbridge and payment derivations

pub mod controllers;
pub mod models;
pub mod services;

pub use models::{CalculationInput, CalculationRequest, CalculationResult};
pub use services::BillCalculator;
