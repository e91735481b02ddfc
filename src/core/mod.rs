pub mod availability;
pub mod display;
pub mod eligibility;
pub mod engine;
pub mod filter;
pub mod progress;
pub mod stock;

pub use crate::domain::model::{DashboardReport, DashboardSnapshot, Record};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
