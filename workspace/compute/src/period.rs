//! Month-code handling.
//!
//! Entry forms store periods as three-letter lowercase Spanish abbreviations
//! ("ene".."dic"), optionally suffixed with a two-digit year like "jun-25".
//! Everything that positions a record in the calendar funnels through
//! [`MonthCode`], so the suffix handling and the January fallback live in
//! exactly one place.

use crate::error::{ComputeError, Result};

/// One calendar month, keyed by its stored abbreviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonthCode {
    Ene,
    Feb,
    Mar,
    Abr,
    May,
    Jun,
    Jul,
    Ago,
    Sep,
    Oct,
    Nov,
    Dic,
}

impl MonthCode {
    /// All twelve months in calendar order.
    pub const ALL: [MonthCode; 12] = [
        MonthCode::Ene,
        MonthCode::Feb,
        MonthCode::Mar,
        MonthCode::Abr,
        MonthCode::May,
        MonthCode::Jun,
        MonthCode::Jul,
        MonthCode::Ago,
        MonthCode::Sep,
        MonthCode::Oct,
        MonthCode::Nov,
        MonthCode::Dic,
    ];

    /// Reads a stored period string, falling back to January for anything
    /// unrecognized. Lowercases, keeps the first three characters (dropping
    /// the "-YY" suffix and any other trailer), then looks the code up.
    ///
    /// The fallback mirrors the behavior the historical data was entered
    /// under: a malformed code lands in January rather than failing the whole
    /// aggregation. Use [`MonthCode::parse`] where bad input must be rejected
    /// instead of absorbed.
    pub fn normalize(raw: &str) -> MonthCode {
        Self::lookup(raw).unwrap_or(MonthCode::Ene)
    }

    /// Strict companion of [`MonthCode::normalize`]: same lowercasing and
    /// prefix handling, but unknown codes are an error instead of January.
    pub fn parse(raw: &str) -> Result<MonthCode> {
        Self::lookup(raw).ok_or_else(|| ComputeError::UnrecognizedPeriod(raw.to_string()))
    }

    fn lookup(raw: &str) -> Option<MonthCode> {
        // Character-based prefix, not byte-based: inputs are user text.
        let prefix: String = raw.to_lowercase().chars().take(3).collect();
        match prefix.as_str() {
            "ene" => Some(MonthCode::Ene),
            "feb" => Some(MonthCode::Feb),
            "mar" => Some(MonthCode::Mar),
            "abr" => Some(MonthCode::Abr),
            "may" => Some(MonthCode::May),
            "jun" => Some(MonthCode::Jun),
            "jul" => Some(MonthCode::Jul),
            "ago" => Some(MonthCode::Ago),
            "sep" => Some(MonthCode::Sep),
            "oct" => Some(MonthCode::Oct),
            "nov" => Some(MonthCode::Nov),
            "dic" => Some(MonthCode::Dic),
            _ => None,
        }
    }

    /// Calendar position, 1 through 12.
    pub fn index(self) -> usize {
        match self {
            MonthCode::Ene => 1,
            MonthCode::Feb => 2,
            MonthCode::Mar => 3,
            MonthCode::Abr => 4,
            MonthCode::May => 5,
            MonthCode::Jun => 6,
            MonthCode::Jul => 7,
            MonthCode::Ago => 8,
            MonthCode::Sep => 9,
            MonthCode::Oct => 10,
            MonthCode::Nov => 11,
            MonthCode::Dic => 12,
        }
    }

    /// Inverse of [`MonthCode::index`]; accepts chrono's 1-based month
    /// numbers.
    pub fn from_index(index: u32) -> Option<MonthCode> {
        match index {
            1 => Some(MonthCode::Ene),
            2 => Some(MonthCode::Feb),
            3 => Some(MonthCode::Mar),
            4 => Some(MonthCode::Abr),
            5 => Some(MonthCode::May),
            6 => Some(MonthCode::Jun),
            7 => Some(MonthCode::Jul),
            8 => Some(MonthCode::Ago),
            9 => Some(MonthCode::Sep),
            10 => Some(MonthCode::Oct),
            11 => Some(MonthCode::Nov),
            12 => Some(MonthCode::Dic),
            _ => None,
        }
    }

    /// The canonical stored code.
    pub fn code(self) -> &'static str {
        match self {
            MonthCode::Ene => "ene",
            MonthCode::Feb => "feb",
            MonthCode::Mar => "mar",
            MonthCode::Abr => "abr",
            MonthCode::May => "may",
            MonthCode::Jun => "jun",
            MonthCode::Jul => "jul",
            MonthCode::Ago => "ago",
            MonthCode::Sep => "sep",
            MonthCode::Oct => "oct",
            MonthCode::Nov => "nov",
            MonthCode::Dic => "dic",
        }
    }

    /// Full Spanish month name for dashboards and report rows.
    pub fn label(self) -> &'static str {
        match self {
            MonthCode::Ene => "Enero",
            MonthCode::Feb => "Febrero",
            MonthCode::Mar => "Marzo",
            MonthCode::Abr => "Abril",
            MonthCode::May => "Mayo",
            MonthCode::Jun => "Junio",
            MonthCode::Jul => "Julio",
            MonthCode::Ago => "Agosto",
            MonthCode::Sep => "Septiembre",
            MonthCode::Oct => "Octubre",
            MonthCode::Nov => "Noviembre",
            MonthCode::Dic => "Diciembre",
        }
    }

    /// Capitalized abbreviation used as a chart axis label.
    pub fn chart_label(self) -> &'static str {
        match self {
            MonthCode::Ene => "Ene",
            MonthCode::Feb => "Feb",
            MonthCode::Mar => "Mar",
            MonthCode::Abr => "Abr",
            MonthCode::May => "May",
            MonthCode::Jun => "Jun",
            MonthCode::Jul => "Jul",
            MonthCode::Ago => "Ago",
            MonthCode::Sep => "Sep",
            MonthCode::Oct => "Oct",
            MonthCode::Nov => "Nov",
            MonthCode::Dic => "Dic",
        }
    }
}

/// Full display name for a stored period string. Recognized codes get their
/// month name; anything else passes through unchanged rather than being
/// renamed to January.
pub fn display_label(raw: &str) -> String {
    match MonthCode::parse(raw) {
        Ok(code) => code.label().to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Inverse display lookup, case-sensitive on the canonical names:
/// "Junio" -> `Jun`.
pub fn label_to_code(label: &str) -> Option<MonthCode> {
    MonthCode::ALL.into_iter().find(|m| m.label() == label)
}
