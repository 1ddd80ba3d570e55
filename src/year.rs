use chrono::{Datelike, NaiveDate};

use crate::error::{Error, Result};

/// Every date of `year` from January 1 through December 31, in order.
pub fn enumerate_year(year: i32) -> Result<Vec<NaiveDate>> {
    let first = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(Error::InvalidYear(year))?;
    NaiveDate::from_ymd_opt(year, 12, 31).ok_or(Error::InvalidYear(year))?;
    Ok(first
        .iter_days()
        .take_while(|date| date.year() == year)
        .collect())
}
