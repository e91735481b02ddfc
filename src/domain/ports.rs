use crate::domain::model::{DashboardReport, DashboardSnapshot, FilterPredicate};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base(&self) -> &str;
    fn donors_path(&self) -> &str;
    fn inventory_path(&self) -> &str;
    fn campaigns_path(&self) -> Option<&str>;
    fn output_path(&self) -> &str;
    fn report_filename(&self) -> &str;
    fn headers(&self) -> HashMap<String, String>;
    fn timeout_seconds(&self) -> Option<u64>;
    fn donor_filter(&self) -> FilterPredicate;
    fn date_fallback(&self) -> &str;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<DashboardSnapshot>;
    async fn transform(&self, snapshot: DashboardSnapshot) -> Result<DashboardReport>;
    async fn load(&self, report: DashboardReport) -> Result<String>;
}
