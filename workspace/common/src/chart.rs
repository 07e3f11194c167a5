//! Two-year comparison chart payload.
//!
//! The frontend chart consumes exactly this shape: twelve abbreviated month
//! labels, the pair of years being compared, and one series per metric per
//! year. Index 0 is always January regardless of which months have data.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The two years a comparison chart covers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ChartYears {
    /// Earlier year of the pair
    pub prev: i32,
    /// Later year of the pair
    pub now: i32,
}

/// One metric's series for both compared years.
///
/// Each vector holds twelve calendar-positioned sums; months without data
/// are zero.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct SeriesPair {
    /// Values for the earlier year, January first
    pub prev: Vec<Decimal>,
    /// Values for the later year, January first
    pub now: Vec<Decimal>,
}

/// Complete payload for the year-over-year consumption chart.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ChartData {
    /// Abbreviated month labels, "Ene" through "Dic"
    pub labels: Vec<String>,
    /// Years being compared
    pub years: ChartYears,
    /// Water series per year, in cubic meters
    pub water: SeriesPair,
    /// Gas series per year, in cubic meters
    pub gas: SeriesPair,
}

impl SeriesPair {
    pub fn new(prev: Vec<Decimal>, now: Vec<Decimal>) -> Self {
        Self { prev, now }
    }
}
