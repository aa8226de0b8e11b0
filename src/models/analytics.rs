use std::fmt;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnualReturnPoint {
    pub period: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnualizedMetricRow {
    pub num_years: u32,
    pub value: f64,
}

/// Fixed short-horizon buckets of the daily volatility table, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolatilityBucket {
    OneWeek,
    TwoWeeks,
    OneMonth,
    TwoMonths,
    ThreeMonths,
}

impl VolatilityBucket {
    pub const ALL: [VolatilityBucket; 5] = [
        VolatilityBucket::OneWeek,
        VolatilityBucket::TwoWeeks,
        VolatilityBucket::OneMonth,
        VolatilityBucket::TwoMonths,
        VolatilityBucket::ThreeMonths,
    ];

    pub fn label(self) -> &'static str {
        match self {
            VolatilityBucket::OneWeek => "1 week",
            VolatilityBucket::TwoWeeks => "2 weeks",
            VolatilityBucket::OneMonth => "1 month",
            VolatilityBucket::TwoMonths => "2 months",
            VolatilityBucket::ThreeMonths => "3 months",
        }
    }

    /// Exact, case-sensitive label match.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|bucket| bucket.label() == label)
    }
}

impl fmt::Display for VolatilityBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for VolatilityBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// A table cell that is either a rounded value or the `-` placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum VolatilityCell {
    Value(f64),
    #[default]
    Missing,
}

impl VolatilityCell {
    pub const PLACEHOLDER: &'static str = "-";

    pub fn value(self) -> Option<f64> {
        match self {
            VolatilityCell::Value(v) => Some(v),
            VolatilityCell::Missing => None,
        }
    }
}

impl fmt::Display for VolatilityCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolatilityCell::Value(v) => write!(f, "{:.2}", v),
            VolatilityCell::Missing => f.write_str(Self::PLACEHOLDER),
        }
    }
}

impl Serialize for VolatilityCell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            VolatilityCell::Value(v) => serializer.serialize_f64(*v),
            VolatilityCell::Missing => serializer.serialize_str(Self::PLACEHOLDER),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortPeriodVolatilityRow {
    pub bucket: VolatilityBucket,
    pub value: VolatilityCell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearWindowOption {
    pub value: usize,
    pub label: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapitalAllocation {
    pub capital_amount: f64,
    pub placed: f64,
    pub available: f64,
    pub placed_display: String,
    pub available_display: String,
}

impl CapitalAllocation {
    pub fn is_over_allocated(&self) -> bool {
        self.placed > self.capital_amount
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryInterval {
    Monthly,
    Daily,
}

impl HistoryInterval {
    pub fn as_path(self) -> &'static str {
        match self {
            HistoryInterval::Monthly => "monthly",
            HistoryInterval::Daily => "daily",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationSlice {
    pub label: String,
    pub value: f64,
    pub share_pct: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RebalanceRow {
    pub stock_symbol: String,
    pub current: Option<u32>,
    pub target: u32,
    pub diff: Option<i64>,
}

impl RebalanceRow {
    /// A row needs an order unless the target already matches the holding.
    pub fn needs_order(&self) -> bool {
        self.diff != Some(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioOption {
    pub label: String,
    pub value: String,
}
