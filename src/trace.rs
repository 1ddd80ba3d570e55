//! Observability sink handed to each pipeline stage.

use chrono::NaiveDate;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

use crate::classify::DayKind;

pub trait TraceSink {
    fn generation_started(&self, year: i32);

    fn day_classified(&self, date: NaiveDate, kind: DayKind, remark: &str);

    fn day_unresolved(&self, date: NaiveDate);

    /// Number of days of `kind` in the generated year, emitted once per kind
    fn kind_summary(&self, kind: DayKind, code: &str, count: usize);

    fn file_written(&self, path: &Path, rows: usize);
}

/// Forwards events to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl TraceSink for LogSink {
    fn generation_started(&self, year: i32) {
        log::info!("generating work calendar for {year}");
    }

    fn day_classified(&self, date: NaiveDate, kind: DayKind, remark: &str) {
        match kind {
            DayKind::Workday => log::debug!("{date} is a {kind}"),
            _ if remark.is_empty() => log::info!("{date} is a {kind}"),
            _ => log::info!("{date} is a {kind}: {remark}"),
        }
    }

    fn day_unresolved(&self, date: NaiveDate) {
        log::error!("{date} matched no day type");
    }

    fn kind_summary(&self, kind: DayKind, code: &str, count: usize) {
        log::info!("{:>16} ({code}): {count}", kind.to_string());
    }

    fn file_written(&self, path: &Path, rows: usize) {
        log::info!("wrote {rows} rows to {}", path.display());
    }
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl TraceSink for NullSink {
    fn generation_started(&self, _year: i32) {}

    fn day_classified(&self, _date: NaiveDate, _kind: DayKind, _remark: &str) {}

    fn day_unresolved(&self, _date: NaiveDate) {}

    fn kind_summary(&self, _kind: DayKind, _code: &str, _count: usize) {}

    fn file_written(&self, _path: &Path, _rows: usize) {}
}

#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent {
    Started(i32),
    Classified {
        date: NaiveDate,
        kind: DayKind,
        remark: String,
    },
    Unresolved(NaiveDate),
    Summary {
        kind: DayKind,
        code: String,
        count: usize,
    },
    FileWritten { path: PathBuf, rows: usize },
}

/// Keeps every event in memory, in arrival order
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: RefCell<Vec<TraceEvent>>,
}

impl RecordingSink {
    pub fn new() -> RecordingSink {
        RecordingSink::default()
    }

    pub fn events(&self) -> Vec<TraceEvent> {
        self.events.borrow().clone()
    }
}

impl TraceSink for RecordingSink {
    fn generation_started(&self, year: i32) {
        self.events.borrow_mut().push(TraceEvent::Started(year));
    }

    fn day_classified(&self, date: NaiveDate, kind: DayKind, remark: &str) {
        self.events.borrow_mut().push(TraceEvent::Classified {
            date,
            kind,
            remark: remark.to_owned(),
        });
    }

    fn day_unresolved(&self, date: NaiveDate) {
        self.events.borrow_mut().push(TraceEvent::Unresolved(date));
    }

    fn kind_summary(&self, kind: DayKind, code: &str, count: usize) {
        self.events.borrow_mut().push(TraceEvent::Summary {
            kind,
            code: code.to_owned(),
            count,
        });
    }

    fn file_written(&self, path: &Path, rows: usize) {
        self.events.borrow_mut().push(TraceEvent::FileWritten {
            path: path.to_path_buf(),
            rows,
        });
    }
}
