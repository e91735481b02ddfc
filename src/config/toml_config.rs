use crate::config::{
    evaluation_time, normalize_blood_group_choice, validate_blood_group_choice,
    DEFAULT_DONORS_PATH, DEFAULT_INVENTORY_PATH, DEFAULT_REPORT_FILENAME,
};
use crate::core::display::NOT_SET;
use crate::core::ConfigProvider;
use crate::domain::model::FilterPredicate;
use crate::utils::error::{DashboardError, Result};
use crate::utils::validation::{self, Validate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub report: ReportConfig,
    pub source: SourceConfig,
    pub filter: Option<FilterConfig>,
    pub load: LoadConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub name: String,
    pub description: Option<String>,
    /// 固定評估日期，方便重跑過去的報表
    pub as_of: Option<String>,
    pub date_fallback: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub api_base: String,
    pub donors_path: Option<String>,
    pub inventory_path: Option<String>,
    pub campaigns_path: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    pub search: Option<String>,
    pub category_field: Option<String>,
    pub category_value: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: Option<String>,
    pub verbose: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DashboardError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${BLOODBANK_TOKEN})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| DashboardError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("report.name", &self.report.name)?;
        validation::validate_url("source.api_base", &self.source.api_base)?;
        validation::validate_endpoint_path("source.donors_path", self.donors_path())?;
        validation::validate_endpoint_path("source.inventory_path", self.inventory_path())?;
        if let Some(path) = &self.source.campaigns_path {
            validation::validate_endpoint_path("source.campaigns_path", path)?;
        }
        if let Some(timeout) = self.source.timeout_seconds {
            validation::validate_range("source.timeout_seconds", timeout, 1, 300)?;
        }

        if let Some(headers) = &self.source.headers {
            // 未替換的 ${VAR} 代表環境變數缺漏
            for (name, value) in headers {
                if value.contains("${") {
                    return Err(DashboardError::MissingConfigError {
                        field: format!("source.headers.{} ({})", name, value),
                    });
                }
            }
        }

        if let Some(filter) = &self.filter {
            let field = filter.category_field.as_deref().unwrap_or("bloodGroup");
            validation::validate_non_empty_string("filter.category_field", field)?;
            if field == "bloodGroup" {
                if let Some(value) = &filter.category_value {
                    validate_blood_group_choice("filter.category_value", value)?;
                }
            }
        }

        validation::validate_path("load.output_path", &self.load.output_path)?;
        if let Some(filename) = &self.load.filename {
            validation::validate_non_empty_string("load.filename", filename)?;
        }

        self.evaluation_time()?;
        Ok(())
    }

    pub fn evaluation_time(&self) -> Result<DateTime<Utc>> {
        evaluation_time(self.report.as_of.as_deref())
    }

    pub fn json_logs(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.format.as_deref())
            .is_some_and(|format| format.eq_ignore_ascii_case("json"))
    }

    pub fn verbose(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.verbose).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn api_base(&self) -> &str {
        &self.source.api_base
    }

    fn donors_path(&self) -> &str {
        self.source.donors_path.as_deref().unwrap_or(DEFAULT_DONORS_PATH)
    }

    fn inventory_path(&self) -> &str {
        self.source
            .inventory_path
            .as_deref()
            .unwrap_or(DEFAULT_INVENTORY_PATH)
    }

    fn campaigns_path(&self) -> Option<&str> {
        self.source.campaigns_path.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn report_filename(&self) -> &str {
        self.load.filename.as_deref().unwrap_or(DEFAULT_REPORT_FILENAME)
    }

    fn headers(&self) -> HashMap<String, String> {
        self.source.headers.clone().unwrap_or_default()
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.source.timeout_seconds
    }

    fn donor_filter(&self) -> FilterPredicate {
        let Some(filter) = &self.filter else {
            return FilterPredicate::default();
        };

        let mut predicate = FilterPredicate::new(filter.search.clone(), None);
        if let Some(value) = &filter.category_value {
            let field = filter.category_field.as_deref().unwrap_or("bloodGroup");
            let value = if field == "bloodGroup" {
                normalize_blood_group_choice(value)
            } else {
                value.clone()
            };
            predicate = predicate.with_category(field, value);
        }
        predicate
    }

    fn date_fallback(&self) -> &str {
        self.report.date_fallback.as_deref().unwrap_or(NOT_SET)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
