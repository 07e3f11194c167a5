//! Year-over-year deltas.

use common::YoyDelta;
use rust_decimal::Decimal;

/// Compares one metric's value against the same period a year earlier.
///
/// Both outputs are absent unless both inputs are present. When the previous
/// value is exactly zero the absolute difference is still reported but the
/// percentage stays absent, so a first year of data never divides by zero.
pub fn yoy_delta(current: Option<Decimal>, previous: Option<Decimal>) -> YoyDelta {
    match (current, previous) {
        (Some(current), Some(previous)) => {
            let diff = current - previous;
            let pct = if previous.is_zero() {
                None
            } else {
                Some(diff / previous * Decimal::ONE_HUNDRED)
            };
            YoyDelta {
                diff: Some(diff),
                pct,
            }
        }
        _ => YoyDelta {
            diff: None,
            pct: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    #[test]
    fn test_missing_operand_yields_no_delta() {
        let delta = yoy_delta(None, Some(dec(5)));
        assert_eq!(delta.diff, None);
        assert_eq!(delta.pct, None);

        let delta = yoy_delta(Some(dec(5)), None);
        assert_eq!(delta.diff, None);
        assert_eq!(delta.pct, None);

        let delta = yoy_delta(None, None);
        assert_eq!(delta.diff, None);
        assert_eq!(delta.pct, None);
    }

    #[test]
    fn test_zero_previous_reports_diff_without_percentage() {
        let delta = yoy_delta(Some(dec(10)), Some(dec(0)));
        assert_eq!(delta.diff, Some(dec(10)));
        assert_eq!(delta.pct, None);
    }

    #[test]
    fn test_regular_comparison() {
        let delta = yoy_delta(Some(dec(12)), Some(dec(10)));
        assert_eq!(delta.diff, Some(dec(2)));
        assert_eq!(delta.pct, Some(dec(20)));
    }

    #[test]
    fn test_decreases_go_negative() {
        let delta = yoy_delta(Some(dec(5)), Some(dec(10)));
        assert_eq!(delta.diff, Some(dec(-5)));
        assert_eq!(delta.pct, Some(dec(-50)));
    }

    #[test]
    fn test_zero_current_is_still_a_value() {
        // A recorded zero compares normally; only absence suppresses the delta.
        let delta = yoy_delta(Some(dec(0)), Some(dec(10)));
        assert_eq!(delta.diff, Some(dec(-10)));
        assert_eq!(delta.pct, Some(dec(-100)));
    }
}
