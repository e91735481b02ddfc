use crate::domain::model::{BloodGroup, InventoryLevel};
use serde::Serialize;
use std::collections::BTreeMap;

pub const LOW_STOCK_THRESHOLD: u32 = 10;
pub const GOOD_STOCK_THRESHOLD: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StockLevel {
    Out,
    Low,
    Medium,
    Good,
}

impl StockLevel {
    pub fn label(&self) -> &'static str {
        match self {
            StockLevel::Out => "Out of stock",
            StockLevel::Low => "Low",
            StockLevel::Medium => "Medium",
            StockLevel::Good => "Good",
        }
    }

    /// Badge color used by the dashboard tables.
    pub fn badge(&self) -> &'static str {
        match self {
            StockLevel::Out => "red",
            StockLevel::Low => "orange",
            StockLevel::Medium => "yellow",
            StockLevel::Good => "green",
        }
    }

    pub fn is_critical(&self) -> bool {
        matches!(self, StockLevel::Out | StockLevel::Low)
    }
}

pub fn classify(units: u32) -> StockLevel {
    match units {
        0 => StockLevel::Out,
        u if u < LOW_STOCK_THRESHOLD => StockLevel::Low,
        u if u < GOOD_STOCK_THRESHOLD => StockLevel::Medium,
        _ => StockLevel::Good,
    }
}

/// 對全部八種血型分類，API 未回傳的血型視為缺貨
pub fn classify_inventory(inventory: &InventoryLevel) -> BTreeMap<BloodGroup, StockLevel> {
    BloodGroup::ALL
        .into_iter()
        .map(|group| (group, classify(inventory.units_for(group))))
        .collect()
}

pub fn critical_groups(inventory: &InventoryLevel) -> Vec<BloodGroup> {
    classify_inventory(inventory)
        .into_iter()
        .filter(|(_, level)| level.is_critical())
        .map(|(group, _)| group)
        .collect()
}
