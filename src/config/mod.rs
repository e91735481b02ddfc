pub mod cli;
pub mod toml_config;

use crate::core::display::parse_donation_date;
use crate::core::filter::ALL_CATEGORIES;
use crate::domain::model::BloodGroup;
use crate::utils::error::{DashboardError, Result};
use chrono::{DateTime, Utc};

#[cfg(feature = "cli")]
use crate::core::display::{NOT_SET, NOT_SET_BN};
#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::model::FilterPredicate;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "cli")]
use std::collections::HashMap;

pub const DEFAULT_DONORS_PATH: &str = "/api/admin/donors";
pub const DEFAULT_INVENTORY_PATH: &str = "/api/admin/inventory";
pub const DEFAULT_REPORT_FILENAME: &str = "dashboard_report.zip";

/// 評估時間：有 `as_of` 就用它，否則用目前時間
pub fn evaluation_time(as_of: Option<&str>) -> Result<DateTime<Utc>> {
    match as_of {
        Some(value) => parse_donation_date(value).map_err(|e| DashboardError::ConfigValidationError {
            field: "as_of".to_string(),
            message: e.to_string(),
        }),
        None => Ok(Utc::now()),
    }
}

/// 分類值必須是 "all" 或合法血型
pub fn validate_blood_group_choice(field_name: &str, value: &str) -> Result<()> {
    if value == ALL_CATEGORIES || value.parse::<BloodGroup>().is_ok() {
        return Ok(());
    }
    Err(DashboardError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: format!(
            "Expected '{}' or one of: {}",
            ALL_CATEGORIES,
            BloodGroup::ALL.map(|g| g.as_str()).join(", ")
        ),
    })
}

/// `"b+"` 轉成 API 使用的 `"B+"`；其他值原樣保留
pub fn normalize_blood_group_choice(value: &str) -> String {
    value
        .parse::<BloodGroup>()
        .map(|group| group.as_str().to_string())
        .unwrap_or_else(|_| value.to_string())
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "bloodbank-report")]
#[command(about = "Evaluate donor eligibility and blood stock levels from the admin API")]
pub struct CliConfig {
    #[arg(long, default_value = "http://localhost:5000")]
    pub api_base: String,

    #[arg(long, default_value = DEFAULT_DONORS_PATH)]
    pub donors_path: String,

    #[arg(long, default_value = DEFAULT_INVENTORY_PATH)]
    pub inventory_path: String,

    #[arg(long, help = "Optional campaigns endpoint, e.g. /api/admin/campaigns")]
    pub campaigns_path: Option<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, help = "Case-insensitive search over name, email, mobile and blood group")]
    pub search: Option<String>,

    #[arg(long, default_value = ALL_CATEGORIES, help = "Blood group to keep, or 'all'")]
    pub blood_group: String,

    #[arg(long, help = "Bearer token sent in the Authorization header")]
    pub auth_token: Option<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "Evaluate eligibility as of this date instead of now")]
    pub as_of: Option<String>,

    #[arg(long, help = "Use Bengali labels for missing dates")]
    pub bengali: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn api_base(&self) -> &str {
        &self.api_base
    }

    fn donors_path(&self) -> &str {
        &self.donors_path
    }

    fn inventory_path(&self) -> &str {
        &self.inventory_path
    }

    fn campaigns_path(&self) -> Option<&str> {
        self.campaigns_path.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn report_filename(&self) -> &str {
        DEFAULT_REPORT_FILENAME
    }

    fn headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        if let Some(token) = &self.auth_token {
            headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        }
        headers
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }

    fn donor_filter(&self) -> FilterPredicate {
        FilterPredicate::new(self.search.clone(), None).with_category(
            "bloodGroup",
            normalize_blood_group_choice(&self.blood_group),
        )
    }

    fn date_fallback(&self) -> &str {
        if self.bengali {
            NOT_SET_BN
        } else {
            NOT_SET
        }
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api_base", &self.api_base)?;
        validation::validate_endpoint_path("donors_path", &self.donors_path)?;
        validation::validate_endpoint_path("inventory_path", &self.inventory_path)?;
        if let Some(path) = &self.campaigns_path {
            validation::validate_endpoint_path("campaigns_path", path)?;
        }
        validation::validate_path("output_path", &self.output_path)?;
        validate_blood_group_choice("blood_group", &self.blood_group)?;
        if let Some(timeout) = self.timeout_seconds {
            validation::validate_range("timeout_seconds", timeout, 1, 300)?;
        }
        evaluation_time(self.as_of.as_deref())?;
        Ok(())
    }
}
