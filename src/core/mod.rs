pub mod amount;
pub mod error;
pub mod identifier;

pub use error::{AppError, Result};
