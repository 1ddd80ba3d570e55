use crate::calendar::HolidayOracle;
use crate::classify::DayKind;
use crate::config::GenerationConfig;
use crate::error::Result;
use crate::generate::generate;
use crate::render::{write_outputs, OutputPaths};
use crate::trace::TraceSink;

/// Generates the configured year and writes both output files.
/// Nothing is written unless every day was classified.
pub fn run(
    config: &GenerationConfig,
    oracle: &dyn HolidayOracle,
    sink: &dyn TraceSink,
) -> Result<OutputPaths> {
    sink.generation_started(config.target_year);
    let records = generate(config.target_year, config, oracle, sink)?;
    for kind in DayKind::ALL {
        sink.kind_summary(kind, config.date_types.code(kind), records.count(kind));
    }
    write_outputs(&config.save_path, &config.table_name, &records, sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::tests::StubOracle;
    use crate::config::tests::sample_config;
    use crate::error::Error;
    use crate::trace::{NullSink, RecordingSink, TraceEvent};
    use chrono::NaiveDate;
    use std::fs;

    #[test]
    fn failed_classification_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = sample_config();
        config.save_path = tmp.path().join("out");
        let oracle = StubOracle::default().undecided(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());

        let err = run(&config, &oracle, &NullSink).unwrap_err();
        assert!(matches!(err, Error::Classification { .. }));
        assert!(!config.save_path.exists());
    }

    #[test]
    fn repeated_runs_are_byte_identical() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = sample_config();
        config.save_path = tmp.path().to_path_buf();
        let oracle = StubOracle::default()
            .day_off(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(), Some("International Workers' Day"));

        let paths = run(&config, &oracle, &NullSink).unwrap();
        let first = (fs::read(&paths.sql).unwrap(), fs::read(&paths.csv).unwrap());
        let again = run(&config, &oracle, &NullSink).unwrap();
        assert_eq!(paths, again);
        assert_eq!(first, (fs::read(&again.sql).unwrap(), fs::read(&again.csv).unwrap()));
    }

    #[test]
    fn run_reports_through_the_sink() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = sample_config();
        config.save_path = tmp.path().to_path_buf();
        let oracle = StubOracle::default()
            .day_off(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), Some("New Year's Day"))
            .day_off(NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(), None)
            .makeup(NaiveDate::from_ymd_opt(2024, 2, 4).unwrap(), "Spring Festival");
        let sink = RecordingSink::new();

        let paths = run(&config, &oracle, &sink).unwrap();
        let events = sink.events();
        assert_eq!(Some(&TraceEvent::Started(2024)), events.first());
        let summaries: Vec<&TraceEvent> = events
            .iter()
            .filter(|event| matches!(event, TraceEvent::Summary { .. }))
            .collect();
        assert_eq!(
            vec![
                &TraceEvent::Summary { kind: DayKind::Workday, code: "W".to_string(), count: 363 },
                &TraceEvent::Summary { kind: DayKind::Weekend, code: "E".to_string(), count: 1 },
                &TraceEvent::Summary { kind: DayKind::Holiday, code: "H".to_string(), count: 1 },
                &TraceEvent::Summary { kind: DayKind::MakeupWorkday, code: "M".to_string(), count: 1 },
            ],
            summaries
        );
        assert_eq!(
            &events[events.len() - 2..],
            &[
                TraceEvent::FileWritten { path: paths.sql, rows: 366 },
                TraceEvent::FileWritten { path: paths.csv, rows: 366 },
            ]
        );
    }
}
