mod farmer;

pub use farmer::{Farmer, FarmerSummary, RegisterFarmerRequest, UpdateFarmerRequest};
