//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and the shared domain library.

pub mod export;
pub mod import;
pub mod mobility;
pub mod profile;
pub mod training;
pub mod weight;

pub use export::ExportService;
pub use import::ImportService;
pub use mobility::MobilityService;
pub use profile::ProfileService;
pub use training::{LoggedSet, StartedSession, TrainingService};
pub use weight::{DashboardView, StatisticsView, WeightService};
