//! Holiday calendar and workday predicates.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Statutory holiday calendar for one evaluation year.
///
/// An entry of `true` marks a statutory non-work day; an entry of `false`
/// marks a compensatory workday (a weekend that is worked). Dates without an
/// entry follow the plain Monday-Friday week.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HolidayCalendar {
    entries: HashMap<NaiveDate, bool>,
}

impl HolidayCalendar {
    pub fn new(entries: HashMap<NaiveDate, bool>) -> Self {
        Self { entries }
    }

    /// Whether the date is a working day.
    pub fn is_workday(&self, date: NaiveDate) -> bool {
        match self.entries.get(&date) {
            Some(true) => false,
            Some(false) => true,
            None => !matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
        }
    }

    /// Whether the date is a statutory holiday.
    pub fn is_statutory_holiday(&self, date: NaiveDate) -> bool {
        self.entries.get(&date) == Some(&true)
    }

    /// First working day of the month containing `date`.
    pub fn first_workday_of_month(&self, date: NaiveDate) -> Option<NaiveDate> {
        let first = date.with_day(1)?;
        self.workdays_between(first, Self::last_day_of_month(first)?)
            .into_iter()
            .next()
    }

    /// Last working day of the month containing `date`.
    pub fn last_workday_of_month(&self, date: NaiveDate) -> Option<NaiveDate> {
        let first = date.with_day(1)?;
        self.workdays_between(first, Self::last_day_of_month(first)?)
            .into_iter()
            .next_back()
    }

    /// Count of working days in the month containing `date`.
    pub fn workdays_in_month(&self, date: NaiveDate) -> u32 {
        let Some(first) = date.with_day(1) else {
            return 0;
        };
        let Some(last) = Self::last_day_of_month(first) else {
            return 0;
        };
        self.workdays_between(first, last).len() as u32
    }

    /// Count of statutory holidays in the month containing `date`.
    pub fn holidays_in_month(&self, date: NaiveDate) -> u32 {
        let Some(first) = date.with_day(1) else {
            return 0;
        };
        let Some(last) = Self::last_day_of_month(first) else {
            return 0;
        };
        first
            .iter_days()
            .take_while(|d| *d <= last)
            .filter(|d| self.is_statutory_holiday(*d))
            .count() as u32
    }

    /// Working days in `[from, to]`, ascending.
    pub fn workdays_between(&self, from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
        from.iter_days()
            .take_while(|d| *d <= to)
            .filter(|d| self.is_workday(*d))
            .collect()
    }

    fn last_day_of_month(first: NaiveDate) -> Option<NaiveDate> {
        let next_month = if first.month() == 12 {
            NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)?
        };
        next_month.checked_sub_days(Days::new(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn calendar() -> HolidayCalendar {
        // May 2025: Labour Day holiday 1-5, compensatory workdays on
        // Sat Apr 27 (not in range here) and Sun May 11.
        let mut entries = HashMap::new();
        for d in 1..=5 {
            entries.insert(date(2025, 5, d), true);
        }
        entries.insert(date(2025, 5, 11), false);
        HolidayCalendar::new(entries)
    }

    #[test]
    fn test_plain_week() {
        let cal = HolidayCalendar::default();
        assert!(cal.is_workday(date(2025, 3, 10))); // Monday
        assert!(!cal.is_workday(date(2025, 3, 8))); // Saturday
    }

    #[test]
    fn test_statutory_holiday_not_workday() {
        let cal = calendar();
        assert!(!cal.is_workday(date(2025, 5, 1)));
        assert!(cal.is_statutory_holiday(date(2025, 5, 1)));
    }

    #[test]
    fn test_compensatory_weekend_is_workday() {
        let cal = calendar();
        assert!(cal.is_workday(date(2025, 5, 11))); // Sunday, worked
        assert!(!cal.is_statutory_holiday(date(2025, 5, 11)));
    }

    #[test]
    fn test_first_workday_skips_holiday_run() {
        let cal = calendar();
        // May 1-5 are holidays, May 3-4 weekend anyway; first workday is Tue May 6.
        assert_eq!(cal.first_workday_of_month(date(2025, 5, 20)), Some(date(2025, 5, 6)));
    }

    #[test]
    fn test_last_workday_of_month() {
        let cal = calendar();
        // May 31 2025 is a Saturday; last workday is Fri May 30.
        assert_eq!(cal.last_workday_of_month(date(2025, 5, 1)), Some(date(2025, 5, 30)));
    }

    #[test]
    fn test_workdays_in_month_counts_compensatory_day() {
        let cal = calendar();
        // 22 weekday slots in May 2025, minus holidays May 1,2,5 (weekdays),
        // plus the worked Sunday May 11.
        assert_eq!(cal.workdays_in_month(date(2025, 5, 1)), 20);
    }
}
