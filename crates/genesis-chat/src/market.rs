//! Market analytics payloads. Fetch-only; the session controller never
//! touches these.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Inclusive numeric bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

/// Filter metadata for the analytics view.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketFilters {
    pub bhk_options: Vec<u32>,
    /// Localities grouped by city.
    pub localities: BTreeMap<String, Vec<String>>,
    pub price_range: Range,
    pub area_range: Range,
}

impl MarketFilters {
    pub fn cities(&self) -> impl Iterator<Item = &str> {
        self.localities.keys().map(String::as_str)
    }
}

/// Filters applied to a snapshot request. Unset filters are not sent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SnapshotQuery {
    pub bhk: Vec<u32>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_area: Option<f64>,
    pub max_area: Option<f64>,
    pub localities: Vec<String>,
}

impl SnapshotQuery {
    /// Query-string pairs in a stable order.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if !self.bhk.is_empty() {
            let joined: Vec<String> = self.bhk.iter().map(u32::to_string).collect();
            params.push(("bhk", joined.join(",")));
        }
        let bounds = [
            ("min_price", self.min_price),
            ("max_price", self.max_price),
            ("min_area", self.min_area),
            ("max_area", self.max_area),
        ];
        for (key, value) in bounds {
            if let Some(v) = value {
                params.push((key, v.to_string()));
            }
        }
        if !self.localities.is_empty() {
            params.push(("localities", self.localities.join(",")));
        }
        params
    }
}

/// Buy/rent decision counts for one city.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionSplit {
    pub buy: u64,
    pub rent: u64,
    pub total: u64,
}

/// Aggregated market statistics per city.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketSnapshot {
    pub buy_rent_distribution: BTreeMap<String, DecisionSplit>,
    pub median_price_per_sqft: BTreeMap<String, f64>,
    pub avg_break_even_year: BTreeMap<String, f64>,
    pub total_filtered: u64,
}

/// Outcome of a snapshot request.
#[derive(Clone, Debug, PartialEq)]
pub enum SnapshotOutcome {
    Data(MarketSnapshot),
    /// Too few properties match the filters to compute statistics.
    InsufficientData,
}

impl SnapshotOutcome {
    /// Interpret a raw snapshot body.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        if value.get("error").and_then(|e| e.as_str()) == Some("insufficient_data") {
            return Ok(SnapshotOutcome::InsufficientData);
        }
        serde_json::from_value(value).map(SnapshotOutcome::Data)
    }
}
