pub mod farmer_controller;

pub use farmer_controller::configure;
