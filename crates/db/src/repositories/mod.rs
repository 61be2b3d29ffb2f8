//! Repository structs, one per table. All methods are associated functions
//! taking a pool or executor as their first argument.

mod analysis_repo;
mod queue_repo;

pub use analysis_repo::AnalysisRepo;
pub use queue_repo::AnalysisJobRepo;
