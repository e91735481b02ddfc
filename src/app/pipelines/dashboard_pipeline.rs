use crate::core::availability::{check_availability, AvailabilityStatus};
use crate::core::display::format_donation_date;
use crate::core::eligibility::{eligibility, eligibility_from_str};
use crate::core::filter::{self, DONOR_SEARCH_FIELDS};
use crate::core::stock::{classify, critical_groups};
use crate::core::{ConfigProvider, DashboardReport, DashboardSnapshot, Pipeline, Storage};
use crate::domain::model::{
    BloodGroup, Campaign, CampaignRow, Donor, DonorRow, InventoryLevel, InventoryRow,
};
use crate::utils::error::{DashboardError, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

/// 從管理 API 取得資料，計算捐血資格與庫存狀態，輸出 zip 報表
pub struct DashboardPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
    now: DateTime<Utc>,
}

impl<S: Storage, C: ConfigProvider> DashboardPipeline<S, C> {
    pub fn new(storage: S, config: C, now: DateTime<Utc>) -> Self {
        Self {
            storage,
            config,
            client: Client::new(),
            now,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base().trim_end_matches('/'), path)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path);
        let mut request = self.client.get(&url);

        for (key, value) in self.config.headers() {
            request = request.header(key, value);
        }

        if let Some(timeout) = self.config.timeout_seconds() {
            request = request.timeout(std::time::Duration::from_secs(timeout));
        }

        tracing::debug!("Making API request to: {}", url);
        let response = request.send().await?;
        tracing::debug!("API response status: {}", response.status());

        if !response.status().is_success() {
            return Err(DashboardError::UnexpectedStatus {
                endpoint: url,
                status: response.status().as_u16(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn donor_row(&self, donor: &Donor) -> (DonorRow, AvailabilityStatus) {
        let status = match eligibility_from_str(donor.last_donation.as_deref(), self.now) {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!("⚠️ Donor '{}' has an unreadable last donation: {}", donor.name, e);
                eligibility(None, self.now)
            }
        };

        if donor.blood_group.is_none() {
            tracing::warn!("⚠️ Donor '{}' has no recognised blood group", donor.name);
        }

        let availability = check_availability(donor.is_available, &status);
        if availability.is_advisory() {
            tracing::debug!("Donor '{}' {}", donor.name, availability.describe());
        }

        let row = DonorRow {
            name: donor.name.clone(),
            email: donor.email.clone(),
            mobile: donor.mobile.clone(),
            blood_group: donor.blood_group,
            last_donation: format_donation_date(
                donor.last_donation.as_deref(),
                self.config.date_fallback(),
            ),
            is_available: donor.is_available,
            can_donate: status.can_donate,
            days_remaining: status.days_remaining,
            message: status.message,
            availability: availability.describe(),
        };
        (row, availability)
    }
}

fn inventory_rows(inventory: &InventoryLevel) -> Vec<InventoryRow> {
    BloodGroup::ALL
        .into_iter()
        .map(|group| {
            let units = inventory.units_for(group);
            let level = classify(units);
            InventoryRow {
                blood_group: group,
                units,
                level: level.label().to_string(),
                badge: level.badge().to_string(),
            }
        })
        .collect()
}

fn campaign_row(campaign: &Campaign) -> CampaignRow {
    CampaignRow {
        title: campaign.title.clone(),
        registered_donors: campaign.registered_donors,
        target_donors: campaign.target_donors,
        percentage: campaign.donor_progress().percentage(),
    }
}

fn to_csv<T: Serialize>(rows: &[T]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| DashboardError::ProcessingError {
            message: format!("Failed to flush CSV: {}", e),
        })
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for DashboardPipeline<S, C> {
    async fn extract(&self) -> Result<DashboardSnapshot> {
        tracing::info!("🚀 Fetching dashboard data from: {}", self.config.api_base());

        let donors: Vec<Donor> = self.fetch_json(self.config.donors_path()).await?;
        let inventory: InventoryLevel = self.fetch_json(self.config.inventory_path()).await?;

        let campaigns: Vec<Campaign> = match self.config.campaigns_path() {
            Some(path) => self.fetch_json(path).await?,
            None => Vec::new(),
        };

        Ok(DashboardSnapshot {
            donors,
            inventory,
            campaigns,
        })
    }

    async fn transform(&self, snapshot: DashboardSnapshot) -> Result<DashboardReport> {
        let predicate = self.config.donor_filter();
        let donors = filter::filter(&snapshot.donors, DONOR_SEARCH_FIELDS, &predicate);
        tracing::debug!(
            "Filter kept {} of {} donors ({:?})",
            donors.len(),
            snapshot.donors.len(),
            predicate
        );

        let (donor_rows, statuses): (Vec<DonorRow>, Vec<AvailabilityStatus>) =
            donors.iter().map(|d| self.donor_row(d)).unzip();

        let availability_advisories = statuses.iter().filter(|s| s.is_advisory()).count();
        if availability_advisories > 0 {
            tracing::warn!(
                "⚠️ {} donor(s) are marked available but inside the 120-day window",
                availability_advisories
            );
        }

        let critical = critical_groups(&snapshot.inventory);
        if !critical.is_empty() {
            let names: Vec<&str> = critical.iter().map(|g| g.as_str()).collect();
            tracing::warn!("🩸 Low or empty stock: {}", names.join(", "));
        }

        Ok(DashboardReport {
            generated_at: self.now.to_rfc3339(),
            donors: donor_rows,
            inventory: inventory_rows(&snapshot.inventory),
            campaigns: snapshot.campaigns.iter().map(campaign_row).collect(),
            total_units: snapshot.inventory.total_units(),
            critical_groups: critical,
            availability_advisories,
        })
    }

    async fn load(&self, report: DashboardReport) -> Result<String> {
        let filename = self.config.report_filename();
        let output_path = format!("{}/{}", self.config.output_path(), filename);

        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

            zip.start_file::<_, ()>("donors.csv", FileOptions::default())?;
            zip.write_all(&to_csv(&report.donors)?)?;

            zip.start_file::<_, ()>("inventory.csv", FileOptions::default())?;
            zip.write_all(&to_csv(&report.inventory)?)?;

            if !report.campaigns.is_empty() {
                zip.start_file::<_, ()>("campaigns.csv", FileOptions::default())?;
                zip.write_all(&to_csv(&report.campaigns)?)?;
            }

            zip.start_file::<_, ()>("report.json", FileOptions::default())?;
            zip.write_all(serde_json::to_string_pretty(&report)?.as_bytes())?;

            zip.finish()?.into_inner()
        };

        tracing::debug!("Writing report ({} bytes) to storage", zip_data.len());
        self.storage.write_file(filename, &zip_data).await?;

        Ok(output_path)
    }
}
