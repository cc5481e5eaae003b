pub mod bills;
pub mod calculation;
pub mod farmers;
pub mod health;
pub mod history;
