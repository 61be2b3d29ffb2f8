pub mod analysis;
pub mod queue;
pub mod status;
