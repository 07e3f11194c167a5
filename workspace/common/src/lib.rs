//! Transport-layer types shared across the API surface.
//! These structs are produced by the compute module and serialized verbatim
//! by the backend handlers, so chart payloads and report rows keep a single
//! shape from aggregation to wire.

mod chart;
mod consumption;

pub use chart::{ChartData, ChartYears, SeriesPair};
pub use consumption::{ReportRow, YearAverages, YearTotals, YoyDelta, YoySummary};
