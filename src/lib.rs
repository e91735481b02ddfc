pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::app::pipelines::dashboard_pipeline::DashboardPipeline;
pub use crate::config::{cli::LocalStorage, toml_config::TomlConfig};
pub use crate::core::availability::{check_availability, AvailabilityStatus};
pub use crate::core::eligibility::{eligibility, Eligibility, ELIGIBILITY_WINDOW_DAYS};
pub use crate::core::engine::ReportEngine;
pub use crate::core::filter::{filter, FieldAccess};
pub use crate::core::progress::percentage;
pub use crate::core::stock::{classify, classify_inventory, StockLevel};
pub use crate::domain::model::{BloodGroup, Donor, FilterPredicate, InventoryLevel, ProgressMetric};
pub use crate::utils::error::{DashboardError, Result};
