use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::DashboardError;

/// 未定型的 JSON 物件，用於任意管理表格
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BloodGroup {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodGroup {
    pub const ALL: [BloodGroup; 8] = [
        BloodGroup::APositive,
        BloodGroup::ANegative,
        BloodGroup::BPositive,
        BloodGroup::BNegative,
        BloodGroup::AbPositive,
        BloodGroup::AbNegative,
        BloodGroup::OPositive,
        BloodGroup::ONegative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BloodGroup::APositive => "A+",
            BloodGroup::ANegative => "A-",
            BloodGroup::BPositive => "B+",
            BloodGroup::BNegative => "B-",
            BloodGroup::AbPositive => "AB+",
            BloodGroup::AbNegative => "AB-",
            BloodGroup::OPositive => "O+",
            BloodGroup::ONegative => "O-",
        }
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BloodGroup {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        BloodGroup::ALL
            .into_iter()
            .find(|group| group.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| DashboardError::ProcessingError {
                message: format!("Unknown blood group: {}", s),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub address: String,
    /// 缺漏或非標準血型只影響該筆捐血者，不讓整份名單解析失敗
    #[serde(default, deserialize_with = "lenient_blood_group")]
    pub blood_group: Option<BloodGroup>,
    #[serde(default)]
    pub last_donation: Option<String>,
    #[serde(default)]
    pub is_available: bool,
}

fn lenient_blood_group<'de, D>(deserializer: D) -> Result<Option<BloodGroup>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|s| s.parse().ok()))
}

/// 各血型庫存單位數；缺少的血型視為 0
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventoryLevel {
    pub units: BTreeMap<BloodGroup, u32>,
}

impl InventoryLevel {
    pub fn new(units: BTreeMap<BloodGroup, u32>) -> Self {
        Self { units }
    }

    pub fn units_for(&self, group: BloodGroup) -> u32 {
        self.units.get(&group).copied().unwrap_or(0)
    }

    pub fn total_units(&self) -> u64 {
        self.units.values().map(|&u| u64::from(u)).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressMetric {
    pub current: u64,
    pub target: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub target_donors: u64,
    #[serde(default)]
    pub registered_donors: u64,
}

impl Campaign {
    pub fn donor_progress(&self) -> ProgressMetric {
        ProgressMetric {
            current: self.registered_donors,
            target: self.target_donors,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPredicate {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPredicate {
    pub search: Option<String>,
    pub category: Option<CategoryPredicate>,
}

impl FilterPredicate {
    pub fn new(search: Option<String>, category: Option<CategoryPredicate>) -> Self {
        Self { search, category }
    }

    pub fn with_category(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.category = Some(CategoryPredicate {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }
}

/// extract 階段從 API 取得的原始快照
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSnapshot {
    pub donors: Vec<Donor>,
    pub inventory: InventoryLevel,
    pub campaigns: Vec<Campaign>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonorRow {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub blood_group: Option<BloodGroup>,
    pub last_donation: String,
    pub is_available: bool,
    pub can_donate: bool,
    pub days_remaining: u32,
    pub message: String,
    pub availability: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryRow {
    pub blood_group: BloodGroup,
    pub units: u32,
    pub level: String,
    pub badge: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignRow {
    pub title: String,
    pub registered_donors: u64,
    pub target_donors: u64,
    pub percentage: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub generated_at: String,
    pub donors: Vec<DonorRow>,
    pub inventory: Vec<InventoryRow>,
    pub campaigns: Vec<CampaignRow>,
    pub total_units: u64,
    pub critical_groups: Vec<BloodGroup>,
    pub availability_advisories: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blood_group_wire_format() {
        let parsed: BloodGroup = serde_json::from_str("\"AB-\"").unwrap();
        assert_eq!(parsed, BloodGroup::AbNegative);
        assert_eq!(serde_json::to_string(&BloodGroup::OPositive).unwrap(), "\"O+\"");
        assert!(serde_json::from_str::<BloodGroup>("\"C+\"").is_err());
    }

    #[test]
    fn test_blood_group_from_str() {
        assert_eq!("ab+".parse::<BloodGroup>().unwrap(), BloodGroup::AbPositive);
        assert_eq!(" O- ".parse::<BloodGroup>().unwrap(), BloodGroup::ONegative);
        assert!("AB".parse::<BloodGroup>().is_err());
    }

    #[test]
    fn test_donor_deserializes_camel_case_with_defaults() {
        let donor: Donor = serde_json::from_value(serde_json::json!({
            "name": "Karim",
            "bloodGroup": "A+",
            "lastDonation": null
        }))
        .unwrap();
        assert_eq!(donor.name, "Karim");
        assert_eq!(donor.blood_group, Some(BloodGroup::APositive));
        assert_eq!(donor.last_donation, None);
        assert!(!donor.is_available);
        assert!(donor.email.is_empty());
    }

    #[test]
    fn test_unreadable_blood_group_is_tolerated_per_donor() {
        let donors: Vec<Donor> = serde_json::from_value(serde_json::json!([
            {"name": "Empty", "bloodGroup": ""},
            {"name": "Missing"},
            {"name": "Numeric", "bloodGroup": 7},
            {"name": "Lower", "bloodGroup": "o-"}
        ]))
        .unwrap();
        assert_eq!(donors.len(), 4);
        assert_eq!(donors[0].blood_group, None);
        assert_eq!(donors[1].blood_group, None);
        assert_eq!(donors[2].blood_group, None);
        assert_eq!(donors[3].blood_group, Some(BloodGroup::ONegative));
    }

    #[test]
    fn test_inventory_missing_groups_are_zero() {
        let inventory: InventoryLevel =
            serde_json::from_value(serde_json::json!({"A+": 4, "O-": 12})).unwrap();
        assert_eq!(inventory.units_for(BloodGroup::APositive), 4);
        assert_eq!(inventory.units_for(BloodGroup::BNegative), 0);
        assert_eq!(inventory.total_units(), 16);
    }
}
