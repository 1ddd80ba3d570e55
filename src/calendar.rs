//! Rule based holiday calendar with named holidays and make-up workdays.
//!
//! The [`HolidayOracle`] trait is the only thing the classifier depends on;
//! [`Calendar`] is the implementation shipped with the crate.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Source of truth for holidays, workdays and named events.
pub trait HolidayOracle {
    /// Returns true if nobody works on `date`, whether because of a public holiday or a weekend
    fn is_holiday(&self, date: NaiveDate) -> bool;

    /// Returns true if `date` is a working day, including make-up workdays
    fn is_workday(&self, date: NaiveDate) -> bool;

    /// Returns the holiday flag together with the name of the event attached to `date`, if any.
    /// For a make-up workday the name is the holiday it compensates for.
    fn get_holiday_detail(&self, date: NaiveDate) -> (bool, Option<String>);

    /// Returns false if the oracle has no holiday data for `year`
    fn supports_year(&self, _year: i32) -> bool {
        true
    }
}

/// Specifies the nth week of a month
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub enum NthWeek {
    First,
    Second,
    Third,
    Fourth,
    Last,
}

/// Rules describing days off and make-up workdays
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub enum Holiday {
    /// A weekday that is off every week, e.g. `Sat` and `Sun`
    WeekDay(Weekday),
    /// A single named holiday which is valid only once in time.
    SingularDay { date: NaiveDate, name: String },
    /// A block of consecutive days off, `first` and `last` inclusive.
    DateRange {
        first: NaiveDate,
        last: NaiveDate,
        name: String,
    },
    /// A weekend day turned into a working day to compensate for the named holiday.
    MakeupDay { date: NaiveDate, name: String },
    /// A holiday on the same month and day every year.
    /// With `observed` set, a Saturday holiday moves to Friday and a Sunday holiday to Monday.
    /// `first` and `last` are the first and last year this day is a holiday (inclusively).
    YearlyDay {
        month: u32,
        day: u32,
        name: String,
        observed: bool,
        first: Option<i32>,
        last: Option<i32>,
    },
    /// A holiday that falls on the nth (or last) weekday of a specific month, e.g. the first Monday in May.
    /// `first` and `last` are the first and last year this day is a holiday (inclusively).
    MonthWeekday {
        month: u32,
        weekday: Weekday,
        nth: NthWeek,
        name: String,
        first: Option<i32>,
        last: Option<i32>,
    },
    /// A holiday that is defined in relative days (e.g. -2 for Good Friday) to Easter (Sunday).
    EasterOffset {
        offset: i32,
        name: String,
        first: Option<i32>,
        last: Option<i32>,
    },
}

/// Calendar for arbitrary complex holiday rules
#[derive(Debug, Clone)]
pub struct Calendar {
    holidays: BTreeMap<NaiveDate, String>,
    makeup_days: BTreeMap<NaiveDate, String>,
    weekdays: Vec<Weekday>,
    start: i32,
    end: i32,
    years: BTreeSet<i32>,
}

impl Calendar {
    /// Calculate all holidays, make-up days and weekend days for a given range of years
    /// from `start` to `end` (inclusively). Rules producing dates that do not exist
    /// (e.g. Feb 30) are skipped.
    pub fn calc_calendar(holiday_rules: &[Holiday], start: i32, end: i32) -> Calendar {
        let mut holidays = BTreeMap::new();
        let mut makeup_days = BTreeMap::new();
        let mut weekdays = Vec::new();
        let in_range = |date: &NaiveDate| date.year() >= start && date.year() <= end;

        for rule in holiday_rules {
            match rule {
                Holiday::WeekDay(weekday) => {
                    if !weekdays.contains(weekday) {
                        weekdays.push(*weekday);
                    }
                }
                Holiday::SingularDay { date, name } => {
                    if in_range(date) {
                        holidays.insert(*date, name.clone());
                    }
                }
                Holiday::DateRange { first, last, name } => {
                    for date in first.iter_days().take_while(|d| d <= last) {
                        if in_range(&date) {
                            holidays.insert(date, name.clone());
                        }
                    }
                }
                Holiday::MakeupDay { date, name } => {
                    if in_range(date) {
                        makeup_days.insert(*date, name.clone());
                    }
                }
                Holiday::YearlyDay {
                    month,
                    day,
                    name,
                    observed,
                    first,
                    last,
                } => {
                    let (first, last) = Self::calc_first_and_last(start, end, first, last);
                    for year in first..last + 1 {
                        let date = match NaiveDate::from_ymd_opt(year, *month, *day) {
                            Some(date) => date,
                            None => continue,
                        };
                        let date = if *observed {
                            observed_date(date)
                        } else {
                            Some(date)
                        };
                        if let Some(date) = date {
                            holidays.insert(date, name.clone());
                        }
                    }
                }
                Holiday::MonthWeekday {
                    month,
                    weekday,
                    nth,
                    name,
                    first,
                    last,
                } => {
                    let (first, last) = Self::calc_first_and_last(start, end, first, last);
                    for year in first..last + 1 {
                        if let Some(date) = nth_weekday_of_month(year, *month, *weekday, nth) {
                            holidays.insert(date, name.clone());
                        }
                    }
                }
                Holiday::EasterOffset {
                    offset,
                    name,
                    first,
                    last,
                } => {
                    let (first, last) = Self::calc_first_and_last(start, end, first, last);
                    for year in first..last + 1 {
                        let easter = match computus::gregorian(year) {
                            Ok(easter) => easter,
                            Err(_) => continue,
                        };
                        let date = NaiveDate::from_ymd_opt(easter.year, easter.month, easter.day)
                            .and_then(|easter| {
                                easter.checked_add_signed(Duration::days(*offset as i64))
                            });
                        if let Some(date) = date {
                            holidays.insert(date, name.clone());
                        }
                    }
                }
            }
        }
        Calendar {
            holidays,
            makeup_days,
            weekdays,
            start,
            end,
            years: (start..=end).collect(),
        }
    }

    fn calc_first_and_last(
        start: i32,
        end: i32,
        first: &Option<i32>,
        last: &Option<i32>,
    ) -> (i32, i32) {
        let first = match first {
            Some(year) => std::cmp::max(start, *year),
            _ => start,
        };
        let last = match last {
            Some(year) => std::cmp::min(end, *year),
            _ => end,
        };
        (first, last)
    }

    /// Returns true if the date falls on a weekend
    pub fn is_weekend(&self, day: NaiveDate) -> bool {
        self.weekdays.contains(&day.weekday())
    }

    /// Returns the name of the public holiday on `date`
    pub fn holiday_name(&self, date: NaiveDate) -> Option<&str> {
        self.holidays.get(&date).map(String::as_str)
    }

    /// Returns the name of the holiday a make-up workday on `date` compensates for
    pub fn makeup_name(&self, date: NaiveDate) -> Option<&str> {
        self.makeup_days.get(&date).map(String::as_str)
    }

    /// First and last year covered by this calendar
    pub fn year_range(&self) -> (i32, i32) {
        (self.start, self.end)
    }

    /// Narrows the supported years to those in `years`, for rule sets that leave gaps
    pub fn restrict_years(mut self, years: impl IntoIterator<Item = i32>) -> Calendar {
        let known: BTreeSet<i32> = years.into_iter().collect();
        self.years.retain(|year| known.contains(year));
        self
    }

    /// Years the calendar has holiday data for
    pub fn covered_years(&self) -> &BTreeSet<i32> {
        &self.years
    }
}

impl HolidayOracle for Calendar {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        // make-up days override both weekends and holidays
        if self.makeup_days.contains_key(&date) {
            return false;
        }
        self.holidays.contains_key(&date) || self.is_weekend(date)
    }

    fn is_workday(&self, date: NaiveDate) -> bool {
        !self.is_holiday(date)
    }

    fn get_holiday_detail(&self, date: NaiveDate) -> (bool, Option<String>) {
        let name = self
            .makeup_name(date)
            .or_else(|| self.holiday_name(date))
            .map(str::to_owned);
        (self.is_holiday(date), name)
    }

    fn supports_year(&self, year: i32) -> bool {
        self.years.contains(&year)
    }
}

/// Returns true if the specified year is a leap year (i.e. Feb 29th exists for this year)
pub fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

/// Calculate the last day of a given month in a given year
pub fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    NaiveDate::from_ymd_opt(year, month + 1, 1)
        .or_else(|| NaiveDate::from_ymd_opt(year + 1, 1, 1))
        .and_then(|first_of_next| first_of_next.pred_opt())
        .map(|date| date.day())
}

/// Saturday moves back to Friday, Sunday forward to Monday
fn observed_date(date: NaiveDate) -> Option<NaiveDate> {
    match date.weekday() {
        Weekday::Sat => date.pred_opt(),
        Weekday::Sun => date.succ_opt(),
        _ => Some(date),
    }
}

fn nth_weekday_of_month(year: i32, month: u32, weekday: Weekday, nth: &NthWeek) -> Option<NaiveDate> {
    if month == 0 || month > 12 {
        return None;
    }
    let day = match nth {
        NthWeek::First => 1,
        NthWeek::Second => 8,
        NthWeek::Third => 15,
        NthWeek::Fourth => 22,
        NthWeek::Last => last_day_of_month(year, month)?,
    };
    let mut date = NaiveDate::from_ymd_opt(year, month, day)?;
    while date.weekday() != weekday {
        date = match nth {
            NthWeek::Last => date.pred_opt()?,
            _ => date.succ_opt()?,
        }
    }
    Some(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn weekend() -> Vec<Holiday> {
        vec![Holiday::WeekDay(Weekday::Sat), Holiday::WeekDay(Weekday::Sun)]
    }

    #[test]
    fn fixed_dates_calendar() {
        let mut holidays = weekend();
        holidays.extend([
            Holiday::SingularDay {
                date: ymd(2019, 11, 20),
                name: "Founders Day".to_string(),
            },
            Holiday::SingularDay {
                date: ymd(2019, 11, 24),
                name: "Harvest Day".to_string(),
            },
        ]);
        let cal = Calendar::calc_calendar(&holidays, 2019, 2019);

        assert_eq!(true, cal.is_holiday(ymd(2019, 11, 20)));
        assert_eq!(true, cal.is_workday(ymd(2019, 11, 21)));
        // plain weekend, no name
        assert_eq!(true, cal.is_holiday(ymd(2019, 11, 23)));
        assert_eq!((true, None), cal.get_holiday_detail(ymd(2019, 11, 23)));
        // weekend and holiday
        assert_eq!(true, cal.is_weekend(ymd(2019, 11, 24)));
        assert_eq!(
            (true, Some("Harvest Day".to_string())),
            cal.get_holiday_detail(ymd(2019, 11, 24))
        );
        assert_eq!(false, cal.is_holiday(ymd(2019, 11, 25)));
    }

    #[test]
    fn date_range_and_makeup_day() {
        let mut holidays = weekend();
        holidays.extend([
            Holiday::DateRange {
                first: ymd(2024, 5, 1),
                last: ymd(2024, 5, 5),
                name: "Labour Day".to_string(),
            },
            Holiday::MakeupDay {
                date: ymd(2024, 5, 11),
                name: "Labour Day".to_string(),
            },
        ]);
        let cal = Calendar::calc_calendar(&holidays, 2024, 2024);
        for day in 1..=5 {
            assert_eq!(Some("Labour Day"), cal.holiday_name(ymd(2024, 5, day)));
        }
        assert_eq!(None, cal.holiday_name(ymd(2024, 5, 6)));
        // 2024-05-11 is a Saturday turned into a workday
        assert_eq!(true, cal.is_weekend(ymd(2024, 5, 11)));
        assert_eq!(false, cal.is_holiday(ymd(2024, 5, 11)));
        assert_eq!(true, cal.is_workday(ymd(2024, 5, 11)));
        assert_eq!(
            (false, Some("Labour Day".to_string())),
            cal.get_holiday_detail(ymd(2024, 5, 11))
        );
    }

    #[test]
    fn rules_outside_the_year_range_are_ignored() {
        let holidays = vec![
            Holiday::SingularDay {
                date: ymd(2023, 1, 2),
                name: "Old".to_string(),
            },
            Holiday::DateRange {
                first: ymd(2023, 12, 30),
                last: ymd(2024, 1, 1),
                name: "New Year's Day".to_string(),
            },
        ];
        let cal = Calendar::calc_calendar(&holidays, 2024, 2024);
        assert_eq!(None, cal.holiday_name(ymd(2023, 1, 2)));
        assert_eq!(None, cal.holiday_name(ymd(2023, 12, 31)));
        assert_eq!(Some("New Year's Day"), cal.holiday_name(ymd(2024, 1, 1)));
        assert_eq!((2024, 2024), cal.year_range());
        assert!(cal.supports_year(2024));
        assert!(!cal.supports_year(2025));
    }

    #[test]
    fn restricted_years_leave_gaps_unsupported() {
        let cal = Calendar::calc_calendar(&weekend(), 2024, 2027)
            .restrict_years([2024, 2025, 2027, 2030]);
        assert_eq!((2024, 2027), cal.year_range());
        assert_eq!(&BTreeSet::from([2024, 2025, 2027]), cal.covered_years());
        assert!(cal.supports_year(2025));
        assert!(!cal.supports_year(2026));
        assert!(!cal.supports_year(2030));
    }

    #[test]
    fn test_yearly_day() {
        let holidays = vec![
            Holiday::YearlyDay {
                month: 7,
                day: 4,
                name: "Independence Day".to_string(),
                observed: true,
                first: None,
                last: None,
            },
            Holiday::YearlyDay {
                month: 2,
                day: 29,
                name: "Leap Day".to_string(),
                observed: false,
                first: None,
                last: None,
            },
        ];
        let cal = Calendar::calc_calendar(&holidays, 2020, 2021);
        // 2020-07-04 is a Saturday, observed on Friday
        assert_eq!(Some("Independence Day"), cal.holiday_name(ymd(2020, 7, 3)));
        assert_eq!(None, cal.holiday_name(ymd(2020, 7, 4)));
        // 2021-07-04 is a Sunday, observed on Monday
        assert_eq!(Some("Independence Day"), cal.holiday_name(ymd(2021, 7, 5)));
        assert_eq!(Some("Leap Day"), cal.holiday_name(ymd(2020, 2, 29)));
    }

    #[test]
    /// Good Friday example
    fn test_easter_offset() {
        let holidays = vec![Holiday::EasterOffset {
            offset: -2,
            name: "Good Friday".to_string(),
            first: None,
            last: None,
        }];
        let cal = Calendar::calc_calendar(&holidays, 2021, 2022);
        assert_eq!(true, cal.is_holiday(ymd(2021, 4, 2)));
        assert_eq!(true, cal.is_holiday(ymd(2022, 4, 15)));
    }

    #[test]
    fn test_month_weekday() {
        let holidays = vec![
            Holiday::MonthWeekday {
                month: 1,
                weekday: Weekday::Mon,
                nth: NthWeek::Third,
                name: "Martin Luther King Jr. Day".to_string(),
                first: None,
                last: None,
            },
            Holiday::MonthWeekday {
                month: 5,
                weekday: Weekday::Mon,
                nth: NthWeek::Last,
                name: "Memorial Day".to_string(),
                first: Some(2023),
                last: None,
            },
        ];
        let cal = Calendar::calc_calendar(&holidays, 2022, 2023);
        assert_eq!(true, cal.is_holiday(ymd(2022, 1, 17)));
        assert_eq!(false, cal.is_holiday(ymd(2022, 5, 30)));
        assert_eq!(Some("Memorial Day"), cal.holiday_name(ymd(2023, 5, 29)));
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(Some(29), last_day_of_month(2024, 2));
        assert_eq!(Some(28), last_day_of_month(2023, 2));
        assert_eq!(Some(31), last_day_of_month(2023, 12));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
    }

    #[test]
    /// Testing serialization and deserialization of holidays definitions
    fn serialize_cal_definition() {
        let holidays = vec![
            Holiday::WeekDay(Weekday::Sat),
            Holiday::MakeupDay {
                date: ymd(2024, 9, 14),
                name: "Mid-autumn Festival".to_string(),
            },
            Holiday::DateRange {
                first: ymd(2024, 9, 15),
                last: ymd(2024, 9, 17),
                name: "Mid-autumn Festival".to_string(),
            },
        ];
        let json = serde_json::to_string_pretty(&holidays).unwrap();
        assert_eq!(
            json,
            r#"[
  {
    "WeekDay": "Sat"
  },
  {
    "MakeupDay": {
      "date": "2024-09-14",
      "name": "Mid-autumn Festival"
    }
  },
  {
    "DateRange": {
      "first": "2024-09-15",
      "last": "2024-09-17",
      "name": "Mid-autumn Festival"
    }
  }
]"#
        );
        let holidays2: Vec<Holiday> = serde_json::from_str(&json).unwrap();
        assert_eq!(holidays, holidays2);
    }
}
