//! Calendar-indexed yearly series.
//!
//! A [`YearSeries`] is the fixed twelve-slot layout every chart and
//! comparison is built on: slot 0 is January, slot 11 is December, and a
//! month without data is zero. Nothing is interpolated.

use rust_decimal::Decimal;

use crate::period::MonthCode;

/// Twelve-month water and gas series for one year.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct YearSeries {
    pub water: [Decimal; 12],
    pub gas: [Decimal; 12],
}

impl YearSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulates one month's quantities into the series. Missing readings
    /// contribute nothing; a recorded zero contributes zero. Repeated months
    /// add up instead of overwriting.
    pub fn add(&mut self, month: MonthCode, water: Option<Decimal>, gas: Option<Decimal>) {
        let slot = month.index() - 1;
        if let Some(w) = water {
            self.water[slot] += w;
        }
        if let Some(g) = gas {
            self.gas[slot] += g;
        }
    }

    /// Builds the series from month-keyed rows, typically the output of a
    /// grouped sum over one user-year. Month strings go through
    /// [`MonthCode::normalize`], so suffixed codes land on their calendar
    /// month and unrecognized ones land on January.
    pub fn from_month_sums<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = (S, Option<Decimal>, Option<Decimal>)>,
        S: AsRef<str>,
    {
        let mut series = Self::new();
        for (month, water, gas) in rows {
            series.add(MonthCode::normalize(month.as_ref()), water, gas);
        }
        series
    }

    pub fn water_vec(&self) -> Vec<Decimal> {
        self.water.to_vec()
    }

    pub fn gas_vec(&self) -> Vec<Decimal> {
        self.gas.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    #[test]
    fn test_rows_land_on_their_calendar_slot() {
        let series = YearSeries::from_month_sums(vec![
            ("ene", Some(dec(10)), None),
            ("jun-25", Some(dec(5)), Some(dec(3))),
        ]);

        assert_eq!(
            series.water,
            [
                dec(10),
                dec(0),
                dec(0),
                dec(0),
                dec(0),
                dec(5),
                dec(0),
                dec(0),
                dec(0),
                dec(0),
                dec(0),
                dec(0)
            ]
        );
        assert_eq!(series.gas[5], dec(3));
    }

    #[test]
    fn test_series_is_always_twelve_wide_and_preserves_sums() {
        let rows = vec![
            ("mar", Some(dec(7)), Some(dec(1))),
            ("mar-24", Some(dec(3)), None),
            ("zzz", Some(dec(2)), None), // folds into January
            ("dic", None, Some(dec(4))),
        ];
        let input_water: Decimal = rows.iter().filter_map(|r| r.1).sum();
        let input_gas: Decimal = rows.iter().filter_map(|r| r.2).sum();

        let series = YearSeries::from_month_sums(rows);

        assert_eq!(series.water.len(), 12);
        assert_eq!(series.gas.len(), 12);
        assert_eq!(series.water.iter().sum::<Decimal>(), input_water);
        assert_eq!(series.gas.iter().sum::<Decimal>(), input_gas);
        // Duplicate month codes accumulate on one slot.
        assert_eq!(series.water[2], dec(10));
        // The unrecognized code went to January together with nothing else.
        assert_eq!(series.water[0], dec(2));
    }

    #[test]
    fn test_building_is_idempotent_over_identical_input() {
        let rows = || {
            vec![
                ("feb", Some(dec(8)), Some(dec(2))),
                ("oct-25", Some(dec(1)), None),
            ]
        };
        assert_eq!(
            YearSeries::from_month_sums(rows()),
            YearSeries::from_month_sums(rows())
        );
    }

    #[test]
    fn test_missing_is_not_zero_but_renders_as_zero() {
        let series = YearSeries::from_month_sums(vec![("jul", None, None)]);
        assert_eq!(series.water[6], dec(0));
        assert_eq!(series.gas[6], dec(0));
        assert_eq!(series, YearSeries::new());
    }
}
