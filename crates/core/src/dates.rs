//! Calendar-date conventions for the date-of-birth and expiration fields.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

static ISO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));

static MONTH_DAY_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}/\d{2}/\d{4}$").expect("valid regex"));

/// Which digit ordering and separator a date field uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateConvention {
    /// `YYYY-MM-DD`
    #[default]
    Iso,
    /// `MM/DD/YYYY`
    MonthDayYear,
}

impl DateConvention {
    /// Pattern shown to users and embedded in model instructions.
    pub fn pattern(self) -> &'static str {
        match self {
            DateConvention::Iso => "YYYY-MM-DD",
            DateConvention::MonthDayYear => "MM/DD/YYYY",
        }
    }

    fn chrono_format(self) -> &'static str {
        match self {
            DateConvention::Iso => "%Y-%m-%d",
            DateConvention::MonthDayYear => "%m/%d/%Y",
        }
    }

    fn shape(self) -> &'static Regex {
        match self {
            DateConvention::Iso => &ISO_RE,
            DateConvention::MonthDayYear => &MONTH_DAY_YEAR_RE,
        }
    }

    /// Parse `value` as a real calendar date in this convention.
    ///
    /// The digit shape is checked first so that chrono's lenient parsing
    /// (single-digit months, missing padding) cannot slip through.
    pub fn parse(self, value: &str) -> Option<NaiveDate> {
        if !self.shape().is_match(value) {
            return None;
        }
        NaiveDate::parse_from_str(value, self.chrono_format()).ok()
    }

    pub fn is_valid(self, value: &str) -> bool {
        self.parse(value).is_some()
    }
}

impl fmt::Display for DateConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pattern())
    }
}

impl FromStr for DateConvention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "iso" | "yyyy-mm-dd" => Ok(DateConvention::Iso),
            "us" | "mdy" | "mm/dd/yyyy" => Ok(DateConvention::MonthDayYear),
            other => Err(format!(
                "Unknown date format '{other}' (expected 'iso' or 'mm/dd/yyyy')"
            )),
        }
    }
}
