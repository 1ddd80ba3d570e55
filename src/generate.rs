//! Builds the labeled record set for a whole year.

use chrono::NaiveDate;

use crate::calendar::HolidayOracle;
use crate::classify::{DateClassifier, DayKind};
use crate::config::GenerationConfig;
use crate::error::{Error, Result};
use crate::trace::TraceSink;
use crate::year::enumerate_year;

#[derive(Debug, Clone, PartialEq)]
pub struct LabeledDate {
    year: i32,
    date: NaiveDate,
    kind: DayKind,
    code: String,
    remark: String,
}

impl LabeledDate {
    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn kind(&self) -> DayKind {
        self.kind
    }

    /// Configured code for [`kind`](Self::kind)
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Holiday name for holidays and make-up workdays, empty otherwise
    pub fn remark(&self) -> &str {
        &self.remark
    }
}

/// All dates of one year in calendar order, one record per day
#[derive(Debug, Clone, PartialEq)]
pub struct YearRecordSet {
    year: i32,
    records: Vec<LabeledDate>,
}

impl YearRecordSet {
    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn records(&self) -> &[LabeledDate] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LabeledDate> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn count(&self, kind: DayKind) -> usize {
        self.records.iter().filter(|r| r.kind == kind).count()
    }
}

impl<'a> IntoIterator for &'a YearRecordSet {
    type Item = &'a LabeledDate;
    type IntoIter = std::slice::Iter<'a, LabeledDate>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Classifies every date of `year`. The first failure aborts the whole year.
pub fn generate(
    year: i32,
    config: &GenerationConfig,
    oracle: &dyn HolidayOracle,
    sink: &dyn TraceSink,
) -> Result<YearRecordSet> {
    if !oracle.supports_year(year) {
        return Err(Error::UnsupportedYear(year));
    }
    let classifier = DateClassifier::new(oracle, sink);
    let records = enumerate_year(year)?
        .into_iter()
        .map(|date| -> Result<LabeledDate> {
            let (kind, remark) = classifier.classify(date)?;
            Ok(LabeledDate {
                year,
                date,
                kind,
                code: config.date_types.code(kind).to_owned(),
                remark,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(YearRecordSet { year, records })
}
