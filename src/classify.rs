use chrono::NaiveDate;
use std::fmt;

use crate::calendar::HolidayOracle;
use crate::error::{Error, Result};
use crate::trace::TraceSink;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The four mutually exclusive kinds of day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DayKind {
    Workday,
    Weekend,
    Holiday,
    /// A weekend day worked to compensate for a holiday block
    MakeupWorkday,
}

impl DayKind {
    pub const ALL: [DayKind; 4] = [
        DayKind::Workday,
        DayKind::Weekend,
        DayKind::Holiday,
        DayKind::MakeupWorkday,
    ];
}

impl fmt::Display for DayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DayKind::Workday => "workday",
            DayKind::Weekend => "weekend",
            DayKind::Holiday => "holiday",
            DayKind::MakeupWorkday => "make-up workday",
        };
        f.write_str(text)
    }
}

/// Resolves single dates to a [`DayKind`] and remark by querying a [`HolidayOracle`]
pub struct DateClassifier<'a> {
    oracle: &'a dyn HolidayOracle,
    sink: &'a dyn TraceSink,
}

impl<'a> DateClassifier<'a> {
    pub fn new(oracle: &'a dyn HolidayOracle, sink: &'a dyn TraceSink) -> DateClassifier<'a> {
        DateClassifier { oracle, sink }
    }

    /// Holidays are checked before workdays. A day off without a name is an
    /// ordinary weekend, a workday with a name is a make-up workday.
    pub fn classify(&self, date: NaiveDate) -> Result<(DayKind, String)> {
        let (kind, remark) = if self.oracle.is_holiday(date) {
            match self.oracle.get_holiday_detail(date).1 {
                Some(name) => (DayKind::Holiday, name),
                None => (DayKind::Weekend, String::new()),
            }
        } else if self.oracle.is_workday(date) {
            match self.oracle.get_holiday_detail(date).1 {
                Some(name) => (DayKind::MakeupWorkday, name),
                None => (DayKind::Workday, String::new()),
            }
        } else {
            self.sink.day_unresolved(date);
            return Err(Error::Classification { date });
        };
        self.sink.day_classified(date, kind, &remark);
        Ok((kind, remark))
    }

    /// Same as [`classify`](Self::classify) for a `YYYY-MM-DD` string
    pub fn classify_str(&self, input: &str) -> Result<(DayKind, String)> {
        let date = NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|source| {
            Error::Parse {
                input: input.to_owned(),
                source,
            }
        })?;
        self.classify(date)
    }
}
