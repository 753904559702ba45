use indexmap::IndexMap;
use serde::{Deserialize, Serialize};


pub const FUEL_LOW_THRESHOLD: i64 = 600;
pub const CO2_LOW_THRESHOLD: i64 = 130;

/// Prices observed at one time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub fuel_price: i64,
    pub co2_price: i64,
}

/// Records of one calendar day keyed by `"HH:MM:SS TZ"`, in source order.
pub type DayLog = IndexMap<String, PriceRecord>;

/// The whole fuel log document keyed by `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FuelLog(IndexMap<String, DayLog>);

impl FuelLog {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn day(&self, date: &str) -> Option<&DayLog> {
        self.0.get(date)
    }

    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn insert(&mut self, date: impl Into<String>, time: impl Into<String>, record: PriceRecord) {
        self.0
            .entry(date.into())
            .or_default()
            .insert(time.into(), record);
    }
}

/// One row of the rendered price table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FuelStatView {
    pub display_time: String,
    pub fuel_price: i64,
    pub co2_price: i64,
    pub fuel_low: bool,
    pub co2_low: bool,
}

impl FuelStatView {
    pub fn new(display_time: impl Into<String>, record: &PriceRecord) -> Self {
        Self {
            display_time: display_time.into(),
            fuel_price: record.fuel_price,
            co2_price: record.co2_price,
            fuel_low: record.fuel_price < FUEL_LOW_THRESHOLD,
            co2_low: record.co2_price < CO2_LOW_THRESHOLD,
        }
    }
}
