pub mod bill_calculator;

pub use bill_calculator::BillCalculator;
