//! Six-digit date fields.

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order of the three 2-digit groups inside a date field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum DateOrder {
    /// `DDMMYY`
    #[value(name = "DMY")]
    #[serde(rename = "DMY")]
    DayMonthYear,

    /// `YYMMDD`, the layout Norma 43 uses for every record.
    #[default]
    #[value(name = "YMD")]
    #[serde(rename = "YMD")]
    YearMonthDay,
}

impl DateOrder {
    /// Decodes a `YYMMDD`/`DDMMYY` field.
    ///
    /// Two-digit years always land in 2000-2099. Returns `None` if the field
    /// is not six ASCII digits or does not name a real calendar day.
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use norma43::DateOrder;
    ///
    /// let date = DateOrder::YearMonthDay.decode("200203");
    /// assert_eq!(date, NaiveDate::from_ymd_opt(2020, 2, 3));
    /// assert_eq!(DateOrder::DayMonthYear.decode("030220"), date);
    /// ```
    pub fn decode(self, field: &str) -> Option<NaiveDate> {
        let bytes = field.as_bytes();
        if bytes.len() != 6 {
            return None;
        }

        let group = |idx: usize| -> Option<u32> {
            let pair = &bytes[idx * 2..idx * 2 + 2];
            if pair.iter().all(u8::is_ascii_digit) {
                Some(u32::from(pair[0] - b'0') * 10 + u32::from(pair[1] - b'0'))
            } else {
                None
            }
        };

        let (year, month, day) = match self {
            DateOrder::DayMonthYear => (group(2)?, group(1)?, group(0)?),
            DateOrder::YearMonthDay => (group(0)?, group(1)?, group(2)?),
        };

        NaiveDate::from_ymd_opt(2000 + year as i32, month, day)
    }

    /// `chrono` format string used when rendering dates in this order.
    pub fn display_format(self) -> &'static str {
        match self {
            DateOrder::DayMonthYear => "%d/%m/%Y",
            DateOrder::YearMonthDay => "%Y-%m-%d",
        }
    }
}

impl FromStr for DateOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DMY" => Ok(DateOrder::DayMonthYear),
            "YMD" => Ok(DateOrder::YearMonthDay),
            other => Err(format!("unsupported date order {other:?}, expected DMY or YMD")),
        }
    }
}

impl fmt::Display for DateOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateOrder::DayMonthYear => f.write_str("DMY"),
            DateOrder::YearMonthDay => f.write_str("YMD"),
        }
    }
}
