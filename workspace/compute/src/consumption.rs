//! Query-backed consumption aggregates.
//!
//! These functions adapt the store to the pure calendar logic: grouping and
//! summing happen server-side where SQL does it well, and the twelve-slot
//! series building, delta rules, and month-code handling stay in the pure
//! modules.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use common::{ChartData, ReportRow, YearAverages, YearTotals, YoySummary};
use model::entities::{boiler_reading, consumption_record};
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter, QueryOrder,
    QuerySelect,
};
use tracing::{debug, instrument, trace};

use crate::chart;
use crate::error::Result;
use crate::period::MonthCode;
use crate::series::YearSeries;
use crate::yoy::yoy_delta;

/// One grouped row of the per-month sum query. The month is the stored code,
/// untouched; NULL sums stay absent.
#[derive(Debug, Clone, FromQueryResult)]
pub struct MonthlySum {
    pub month: String,
    pub water: Option<Decimal>,
    pub gas: Option<Decimal>,
}

#[derive(Debug, FromQueryResult)]
struct SumRow {
    n: i64,
    water: Option<Decimal>,
    gas: Option<Decimal>,
    cost: Option<Decimal>,
}

#[derive(Debug, FromQueryResult)]
struct AvgRow {
    n: i64,
    water: Option<Decimal>,
    gas: Option<Decimal>,
}

/// Sums water and gas per stored month code for one user-year.
#[instrument(skip(db))]
pub async fn monthly_totals(
    db: &DatabaseConnection,
    user_id: i32,
    year: i32,
) -> Result<Vec<MonthlySum>> {
    trace!(
        "Summing consumption per month for user_id={} year={}",
        user_id, year
    );

    let rows = consumption_record::Entity::find()
        .select_only()
        .column(consumption_record::Column::Month)
        .column_as(consumption_record::Column::WaterM3.sum(), "water")
        .column_as(consumption_record::Column::GasM3.sum(), "gas")
        .filter(consumption_record::Column::UserId.eq(user_id))
        .filter(consumption_record::Column::Year.eq(year))
        .group_by(consumption_record::Column::Month)
        .into_model::<MonthlySum>()
        .all(db)
        .await?;

    debug!(
        "Found {} distinct month codes for user_id={} year={}",
        rows.len(),
        user_id,
        year
    );
    Ok(rows)
}

/// Builds one user's calendar series for a year.
#[instrument(skip(db))]
pub async fn year_series(db: &DatabaseConnection, user_id: i32, year: i32) -> Result<YearSeries> {
    let rows = monthly_totals(db, user_id, year).await?;
    Ok(YearSeries::from_month_sums(
        rows.into_iter().map(|r| (r.month, r.water, r.gas)),
    ))
}

/// Folds the year's boiler readings into the same twelve-slot series the
/// user records use, positioned by the reading's calendar month.
#[instrument(skip(db))]
pub async fn global_monthly_totals(db: &DatabaseConnection, year: i32) -> Result<YearSeries> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(year, 12, 31).unwrap();

    let readings = boiler_reading::Entity::find()
        .filter(boiler_reading::Column::Date.gte(start))
        .filter(boiler_reading::Column::Date.lte(end))
        .all(db)
        .await?;

    debug!(
        "Folding {} boiler readings into the {} series",
        readings.len(),
        year
    );

    let mut series = YearSeries::new();
    for reading in &readings {
        // chrono months are always in 1..=12
        let month = MonthCode::from_index(reading.date.month()).unwrap();
        series.add(month, Some(reading.water_m3), Some(reading.gas_m3));
    }
    Ok(series)
}

/// Chart payload comparing one user's two years.
#[instrument(skip(db))]
pub async fn user_comparison(
    db: &DatabaseConnection,
    user_id: i32,
    year_prev: i32,
    year_now: i32,
) -> Result<ChartData> {
    let prev = year_series(db, user_id, year_prev).await?;
    let now = year_series(db, user_id, year_now).await?;
    Ok(chart::comparison(prev, now, year_prev, year_now))
}

/// Chart payload comparing two years of the shared boiler series.
#[instrument(skip(db))]
pub async fn global_comparison(
    db: &DatabaseConnection,
    year_prev: i32,
    year_now: i32,
) -> Result<ChartData> {
    let prev = global_monthly_totals(db, year_prev).await?;
    let now = global_monthly_totals(db, year_now).await?;
    Ok(chart::comparison(prev, now, year_prev, year_now))
}

/// Summed consumption and cost for one user-year, absent when the year has
/// no records at all. NULL readings count as nothing, so a year of
/// water-only records still totals gas at zero.
#[instrument(skip(db))]
pub async fn year_totals(
    db: &DatabaseConnection,
    user_id: i32,
    year: i32,
) -> Result<Option<YearTotals>> {
    let row = consumption_record::Entity::find()
        .select_only()
        .column_as(consumption_record::Column::Id.count(), "n")
        .column_as(consumption_record::Column::WaterM3.sum(), "water")
        .column_as(consumption_record::Column::GasM3.sum(), "gas")
        .column_as(consumption_record::Column::Cost.sum(), "cost")
        .filter(consumption_record::Column::UserId.eq(user_id))
        .filter(consumption_record::Column::Year.eq(year))
        .into_model::<SumRow>()
        .one(db)
        .await?;

    Ok(row.filter(|r| r.n > 0).map(|r| YearTotals {
        water: r.water.unwrap_or_default(),
        gas: r.gas.unwrap_or_default(),
        cost: r.cost.unwrap_or_default(),
    }))
}

/// Per-record averages for one user-year, absent when the year has no
/// records. SQL AVG semantics: rows without a reading do not dilute the
/// average of the rows that have one.
#[instrument(skip(db))]
pub async fn year_averages(
    db: &DatabaseConnection,
    user_id: i32,
    year: i32,
) -> Result<Option<YearAverages>> {
    let row = consumption_record::Entity::find()
        .select_only()
        .column_as(consumption_record::Column::Id.count(), "n")
        .column_as(
            SimpleExpr::from(Func::avg(Expr::col(consumption_record::Column::WaterM3))),
            "water",
        )
        .column_as(
            SimpleExpr::from(Func::avg(Expr::col(consumption_record::Column::GasM3))),
            "gas",
        )
        .filter(consumption_record::Column::UserId.eq(user_id))
        .filter(consumption_record::Column::Year.eq(year))
        .into_model::<AvgRow>()
        .one(db)
        .await?;

    Ok(row.filter(|r| r.n > 0).map(|r| YearAverages {
        water: r.water.unwrap_or_default(),
        gas: r.gas.unwrap_or_default(),
    }))
}

/// The ordered rows the CSV and PDF exporters print for one user-year.
/// Sorted by calendar month whatever the stored codes look like; missing
/// readings surface as zero, exactly as the exported files always have.
#[instrument(skip(db))]
pub async fn report_rows(
    db: &DatabaseConnection,
    user_id: i32,
    year: i32,
) -> Result<Vec<ReportRow>> {
    let mut records = consumption_record::Entity::find()
        .filter(consumption_record::Column::UserId.eq(user_id))
        .filter(consumption_record::Column::Year.eq(year))
        .all(db)
        .await?;

    records.sort_by_key(|r| (MonthCode::normalize(&r.month).index(), r.id));

    Ok(records
        .into_iter()
        .map(|r| ReportRow {
            year: r.year,
            month: r.month,
            water_m3: r.water_m3.unwrap_or_default(),
            gas_m3: r.gas_m3.unwrap_or_default(),
            cost: r.cost.unwrap_or_default(),
        })
        .collect())
}

/// All of one user's records, newest year first, each with its
/// year-over-year block against the same calendar month one year earlier.
///
/// The previous-year side is the month's summed value so that split entries
/// (say "jun" and "jun-24" in the same year) compare the way the charts
/// draw them. Absence stays distinct from zero on both sides.
#[instrument(skip(db))]
pub async fn user_records_with_yoy(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Vec<(consumption_record::Model, YoySummary)>> {
    let records = consumption_record::Entity::find()
        .filter(consumption_record::Column::UserId.eq(user_id))
        .order_by_desc(consumption_record::Column::Year)
        .order_by_desc(consumption_record::Column::Id)
        .all(db)
        .await?;

    debug!("Found {} records for user_id={}", records.len(), user_id);

    let mut sums: HashMap<(i32, usize), (Option<Decimal>, Option<Decimal>)> = HashMap::new();
    for record in &records {
        let slot = MonthCode::normalize(&record.month).index();
        let entry = sums.entry((record.year, slot)).or_default();
        entry.0 = add_opt(entry.0, record.water_m3);
        entry.1 = add_opt(entry.1, record.gas_m3);
    }

    Ok(records
        .into_iter()
        .map(|record| {
            let slot = MonthCode::normalize(&record.month).index();
            let (prev_water, prev_gas) = sums
                .get(&(record.year - 1, slot))
                .copied()
                .unwrap_or((None, None));
            let summary = YoySummary::from_deltas(
                record.year - 1,
                yoy_delta(record.water_m3, prev_water),
                yoy_delta(record.gas_m3, prev_gas),
            );
            (record, summary)
        })
        .collect())
}

fn add_opt(acc: Option<Decimal>, value: Option<Decimal>) -> Option<Decimal> {
    match (acc, value) {
        (Some(a), Some(b)) => Some(a + b),
        (Some(a), None) => Some(a),
        (None, v) => v,
    }
}
