use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Calendar frequency of a time series
///
/// Anchored variants (month/quarter/year start and end) step along the calendar,
/// so month lengths and leap years are respected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Frequency {
    /// Every second
    Secondly,
    /// Every minute
    Minutely,
    /// Every hour
    Hourly,
    /// Every day
    Daily,
    /// Every seven days
    Weekly,
    /// First day of each month
    #[default]
    MonthStart,
    /// Last day of each month
    MonthEnd,
    /// First day of January, April, July and October
    QuarterStart,
    /// Last day of March, June, September and December
    QuarterEnd,
    /// January 1st
    YearStart,
    /// December 31st
    YearEnd,
    /// Fixed-length step
    Custom(Duration),
}

impl Frequency {
    /// Approximate length of one period in seconds
    ///
    /// Calendar frequencies use mean Gregorian lengths.
    pub fn nominal_seconds(&self) -> i64 {
        match self {
            Frequency::Secondly => 1,
            Frequency::Minutely => 60,
            Frequency::Hourly => 3_600,
            Frequency::Daily => 86_400,
            Frequency::Weekly => 604_800,
            Frequency::MonthStart | Frequency::MonthEnd => 2_629_746,
            Frequency::QuarterStart | Frequency::QuarterEnd => 7_889_238,
            Frequency::YearStart | Frequency::YearEnd => 31_556_952,
            Frequency::Custom(duration) => duration.num_seconds(),
        }
    }

    /// Whether `ts` falls on this frequency's calendar anchor
    ///
    /// Fixed-step frequencies have no anchor, so every timestamp qualifies.
    pub fn is_on_anchor(&self, ts: &NaiveDateTime) -> bool {
        let date = ts.date();
        let is_month_end = date.succ_opt().map_or(true, |next| next.day() == 1);
        match self {
            Frequency::MonthStart => date.day() == 1,
            Frequency::MonthEnd => is_month_end,
            Frequency::QuarterStart => date.day() == 1 && date.month() % 3 == 1,
            Frequency::QuarterEnd => is_month_end && date.month() % 3 == 0,
            Frequency::YearStart => date.day() == 1 && date.month() == 1,
            Frequency::YearEnd => date.day() == 31 && date.month() == 12,
            _ => true,
        }
    }

    /// First timestamp on this frequency that is strictly after `ts`
    ///
    /// The time of day of `ts` is preserved.
    pub fn next_after(&self, ts: &NaiveDateTime) -> Result<NaiveDateTime> {
        let time = ts.time();
        let date = ts.date();
        let first = first_of_month(date)?;

        let next = match self {
            Frequency::Secondly
            | Frequency::Minutely
            | Frequency::Hourly
            | Frequency::Daily
            | Frequency::Weekly
            | Frequency::Custom(_) => {
                let step = Duration::seconds(self.nominal_seconds());
                if step <= Duration::zero() {
                    return Err(Error::ConfigError(format!(
                        "frequency {} does not advance time",
                        self
                    )));
                }
                return ts
                    .checked_add_signed(step)
                    .ok_or_else(|| out_of_range(ts));
            }
            Frequency::MonthStart => shift_months(first, 1),
            Frequency::MonthEnd => {
                let end = last_of_month(first);
                match end {
                    Some(end) if end > date => Some(end),
                    _ => shift_months(first, 1).and_then(last_of_month),
                }
            }
            Frequency::QuarterStart => {
                quarter_first(date).and_then(|quarter| shift_months(quarter, 3))
            }
            Frequency::QuarterEnd => {
                let quarter = quarter_first(date);
                let end = quarter.and_then(|q| shift_months(q, 2)).and_then(last_of_month);
                match end {
                    Some(end) if end > date => Some(end),
                    _ => quarter
                        .and_then(|q| shift_months(q, 5))
                        .and_then(last_of_month),
                }
            }
            Frequency::YearStart => NaiveDate::from_ymd_opt(date.year() + 1, 1, 1),
            Frequency::YearEnd => {
                let end = NaiveDate::from_ymd_opt(date.year(), 12, 31);
                match end {
                    Some(end) if end > date => Some(end),
                    _ => NaiveDate::from_ymd_opt(date.year() + 1, 12, 31),
                }
            }
        };

        next.map(|d| d.and_time(time))
            .ok_or_else(|| out_of_range(ts))
    }

    /// Canonical code for this frequency
    pub fn code(&self) -> String {
        match self {
            Frequency::Secondly => "S".to_string(),
            Frequency::Minutely => "T".to_string(),
            Frequency::Hourly => "H".to_string(),
            Frequency::Daily => "D".to_string(),
            Frequency::Weekly => "W".to_string(),
            Frequency::MonthStart => "MS".to_string(),
            Frequency::MonthEnd => "M".to_string(),
            Frequency::QuarterStart => "QS".to_string(),
            Frequency::QuarterEnd => "Q".to_string(),
            Frequency::YearStart => "AS".to_string(),
            Frequency::YearEnd => "A".to_string(),
            Frequency::Custom(duration) => format!("{}s", duration.num_seconds()),
        }
    }
}

impl FromStr for Frequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim().to_uppercase();
        let freq = match code.as_str() {
            "S" | "SEC" | "SECOND" | "SECONDLY" => Frequency::Secondly,
            "T" | "MIN" | "MINUTE" | "MINUTELY" => Frequency::Minutely,
            "H" | "HOUR" | "HOURLY" => Frequency::Hourly,
            "D" | "DAY" | "DAILY" => Frequency::Daily,
            "W" | "WEEK" | "WEEKLY" => Frequency::Weekly,
            "MS" | "MONTH-START" | "MONTH_START" | "MONTHSTART" => Frequency::MonthStart,
            "M" | "ME" | "MONTH-END" | "MONTH_END" | "MONTHLY" => Frequency::MonthEnd,
            "QS" | "QUARTER-START" | "QUARTER_START" => Frequency::QuarterStart,
            "Q" | "QE" | "QUARTER-END" | "QUARTER_END" | "QUARTERLY" => Frequency::QuarterEnd,
            "AS" | "YS" | "YEAR-START" | "YEAR_START" => Frequency::YearStart,
            "A" | "Y" | "YE" | "YEAR-END" | "YEAR_END" | "YEARLY" | "ANNUAL" => {
                Frequency::YearEnd
            }
            _ => parse_custom_frequency(&code)
                .ok_or_else(|| Error::ConfigError(format!("unrecognized frequency code '{}'", s)))?,
        };
        Ok(freq)
    }
}

impl TryFrom<String> for Frequency {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Frequency> for String {
    fn from(freq: Frequency) -> Self {
        freq.code()
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Parse a `<count><unit>` code such as `3D` or `3600S`
fn parse_custom_frequency(code: &str) -> Option<Frequency> {
    let split = code.find(|c: char| !c.is_ascii_digit())?;
    if split == 0 {
        return None;
    }
    let (num, unit) = code.split_at(split);
    let num: i64 = num.parse().ok()?;
    if num <= 0 {
        return None;
    }

    let duration = match unit {
        "S" | "SEC" | "SECONDS" => Duration::try_seconds(num)?,
        "T" | "MIN" | "MINUTES" => Duration::try_minutes(num)?,
        "H" | "HOURS" => Duration::try_hours(num)?,
        "D" | "DAYS" => Duration::try_days(num)?,
        "W" | "WEEKS" => Duration::try_weeks(num)?,
        _ => return None,
    };
    Some(Frequency::Custom(duration))
}

fn first_of_month(date: NaiveDate) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
        .ok_or_else(|| Error::Format(format!("date out of range: {}", date)))
}

fn quarter_first(date: NaiveDate) -> Option<NaiveDate> {
    let month = (date.month() - 1) / 3 * 3 + 1;
    NaiveDate::from_ymd_opt(date.year(), month, 1)
}

fn shift_months(first: NaiveDate, months: u32) -> Option<NaiveDate> {
    first.checked_add_months(Months::new(months))
}

fn last_of_month(first: NaiveDate) -> Option<NaiveDate> {
    shift_months(first, 1)?.pred_opt()
}

fn out_of_range(ts: &NaiveDateTime) -> Error {
    Error::Format(format!("no representable timestamp after {}", ts))
}
