//! Assembly of the two-year comparison chart payload.

use common::{ChartData, ChartYears, SeriesPair};

use crate::period::MonthCode;
use crate::series::YearSeries;

/// Combines two independently built year series into the chart payload.
/// The two years never mix: each series keeps its own twelve slots, and the
/// labels are the fixed calendar axis.
pub fn comparison(prev: YearSeries, now: YearSeries, year_prev: i32, year_now: i32) -> ChartData {
    ChartData {
        labels: MonthCode::ALL
            .into_iter()
            .map(|m| m.chart_label().to_string())
            .collect(),
        years: ChartYears {
            prev: year_prev,
            now: year_now,
        },
        water: SeriesPair::new(prev.water_vec(), now.water_vec()),
        gas: SeriesPair::new(prev.gas_vec(), now.gas_vec()),
    }
}
