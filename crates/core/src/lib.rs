pub mod analysis;
pub mod error;
pub mod types;
pub mod uploads;
