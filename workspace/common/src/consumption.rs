//! Consumption summary types: year-over-year deltas, yearly totals and
//! averages, and the row shape consumed by the report exporters.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Year-over-year change for a single metric.
///
/// `diff` and `pct` are absent when either compared value is missing; `pct`
/// alone is absent when the previous value is exactly zero.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct YoyDelta {
    /// Absolute change against the previous year
    pub diff: Option<Decimal>,
    /// Percentage change against the previous year
    pub pct: Option<Decimal>,
}

/// Year-over-year block for one (year, month) period, both metrics at once.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct YoySummary {
    /// The year compared against
    pub prev_year: i32,
    pub water_diff: Option<Decimal>,
    pub water_pct: Option<Decimal>,
    pub gas_diff: Option<Decimal>,
    pub gas_pct: Option<Decimal>,
}

impl YoySummary {
    /// Combines per-metric deltas into the dashboard block.
    pub fn from_deltas(prev_year: i32, water: YoyDelta, gas: YoyDelta) -> Self {
        Self {
            prev_year,
            water_diff: water.diff,
            water_pct: water.pct,
            gas_diff: gas.diff,
            gas_pct: gas.pct,
        }
    }
}

/// Summed consumption for one user-year.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct YearTotals {
    /// Total water in cubic meters
    pub water: Decimal,
    /// Total gas in cubic meters
    pub gas: Decimal,
    /// Total cost in CLP
    pub cost: Decimal,
}

/// Per-record average consumption for one user-year.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct YearAverages {
    pub water: Decimal,
    pub gas: Decimal,
}

/// One exported report line. Missing quantities surface as zero here; the
/// exporters never distinguish "no reading" from "read zero".
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ReportRow {
    pub year: i32,
    /// Stored month code, e.g. "ene" or "jun-25"
    pub month: String,
    pub water_m3: Decimal,
    pub gas_m3: Decimal,
    pub cost: Decimal,
}
