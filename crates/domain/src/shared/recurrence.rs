use super::variant::InvalidVariantError;
use chrono::{DateTime, Days, Months, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// How often a `Reminder` should repeat after it has been processed
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

#[derive(Error, Debug, PartialEq)]
pub enum RecurrenceError {
    #[error("Recurrence `none` has no next occurrence")]
    NotRecurring,
    #[error("Next occurrence after {0} is out of range")]
    OutOfRange(DateTime<Utc>),
}

impl Recurrence {
    pub const VALUES: &'static [&'static str] = &["none", "daily", "weekly", "monthly"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    pub fn is_recurring(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Computes the occurrence following `remind_at`.
    ///
    /// Months are added on the calendar: the day of month is kept when it
    /// exists in the target month and clamped to its last day otherwise, so
    /// Jan 31 advances to Feb 28 (or Feb 29 in a leap year).
    pub fn advance(&self, remind_at: DateTime<Utc>) -> Result<DateTime<Utc>, RecurrenceError> {
        let next = match self {
            Self::None => return Err(RecurrenceError::NotRecurring),
            Self::Daily => remind_at.checked_add_days(Days::new(1)),
            Self::Weekly => remind_at.checked_add_days(Days::new(7)),
            Self::Monthly => remind_at.checked_add_months(Months::new(1)),
        };
        next.ok_or(RecurrenceError::OutOfRange(remind_at))
    }
}

impl Display for Recurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Recurrence {
    type Err = InvalidVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(InvalidVariantError::new("recurrence", s, Self::VALUES)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn advances_daily_and_weekly() {
        let t = at(2024, 1, 1, 9);
        assert_eq!(Recurrence::Daily.advance(t), Ok(at(2024, 1, 2, 9)));
        assert_eq!(Recurrence::Weekly.advance(t), Ok(at(2024, 1, 8, 9)));
        // Crosses month and year boundaries
        assert_eq!(
            Recurrence::Daily.advance(at(2023, 12, 31, 23)),
            Ok(at(2024, 1, 1, 23))
        );
        assert_eq!(
            Recurrence::Weekly.advance(at(2024, 2, 26, 8)),
            Ok(at(2024, 3, 4, 8))
        );
    }

    #[test]
    fn advances_monthly_on_the_calendar() {
        assert_eq!(
            Recurrence::Monthly.advance(at(2024, 3, 15, 10)),
            Ok(at(2024, 4, 15, 10))
        );
        assert_eq!(
            Recurrence::Monthly.advance(at(2024, 12, 5, 10)),
            Ok(at(2025, 1, 5, 10))
        );
    }

    #[test]
    fn monthly_clamps_to_end_of_month() {
        assert_eq!(
            Recurrence::Monthly.advance(at(2024, 1, 31, 8)),
            Ok(at(2024, 2, 29, 8))
        );
        assert_eq!(
            Recurrence::Monthly.advance(at(2023, 1, 31, 8)),
            Ok(at(2023, 2, 28, 8))
        );
        assert_eq!(
            Recurrence::Monthly.advance(at(2024, 5, 31, 8)),
            Ok(at(2024, 6, 30, 8))
        );
    }

    #[test]
    fn none_has_no_next_occurrence() {
        assert!(!Recurrence::None.is_recurring());
        assert_eq!(
            Recurrence::None.advance(at(2024, 1, 1, 9)),
            Err(RecurrenceError::NotRecurring)
        );
    }

    #[test]
    fn parses_recurrence_strings() {
        assert_eq!("weekly".parse::<Recurrence>(), Ok(Recurrence::Weekly));
        assert_eq!(Recurrence::default(), Recurrence::None);
        let err = "yearly".parse::<Recurrence>().unwrap_err();
        assert_eq!(err.field, "recurrence");
        assert_eq!(err.valid, Recurrence::VALUES);
        assert!("Weekly".parse::<Recurrence>().is_err());
    }
}
