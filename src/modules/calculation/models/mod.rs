mod calculation;

pub use calculation::{CalculationInput, CalculationRequest, CalculationResult};
