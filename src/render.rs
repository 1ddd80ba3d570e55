//! SQL and CSV renderers plus file emission.
//!
//! Both renderers keep the record order, so statement N of the SQL file and
//! data row N of the CSV file describe the same date.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::classify::DATE_FORMAT;
use crate::error::{Error, Result};
use crate::generate::{LabeledDate, YearRecordSet};
use crate::trace::TraceSink;

pub const CSV_HEADER: [&str; 4] = ["YEAR", "CALENDAR_DATE", "DATE_TYPE", "COMMENTS"];

/// UTF-8 byte order mark, lets spreadsheet tools detect the encoding
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Single quotes are doubled, everything else is kept as is
pub fn escape_sql_literal(text: &str) -> String {
    text.replace('\'', "''")
}

pub fn sql_statement(table_name: &str, record: &LabeledDate) -> String {
    format!(
        "INSERT INTO {} VALUES ('{}', '{}', '{}', '{}');\n",
        table_name,
        record.year(),
        record.date().format(DATE_FORMAT),
        record.code(),
        escape_sql_literal(record.remark())
    )
}

pub fn render_sql(table_name: &str, records: &YearRecordSet) -> String {
    records
        .iter()
        .map(|record| sql_statement(table_name, record))
        .collect()
}

pub fn render_csv(records: &YearRecordSet) -> Result<Vec<u8>> {
    let mut buffer = UTF8_BOM.to_vec();
    {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(&mut buffer);
        writer.write_record(CSV_HEADER)?;
        for record in records {
            let year = record.year().to_string();
            let date = record.date().format(DATE_FORMAT).to_string();
            writer.write_record([
                year.as_str(),
                date.as_str(),
                record.code(),
                record.remark(),
            ])?;
        }
        writer
            .flush()
            .map_err(|err| Error::Csv(csv::Error::from(err)))?;
    }
    Ok(buffer)
}

/// `<dir>/<year>Day.sql` and `<dir>/<year>Day.csv`
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPaths {
    pub sql: PathBuf,
    pub csv: PathBuf,
}

impl OutputPaths {
    pub fn new(dir: impl AsRef<Path>, year: i32) -> OutputPaths {
        let stem = format!("{year}Day");
        let dir = dir.as_ref();
        OutputPaths {
            sql: dir.join(format!("{stem}.sql")),
            csv: dir.join(format!("{stem}.csv")),
        }
    }
}

/// Creates `dir` (with parents) and writes both files for `records`.
/// Both files are rendered and staged next to their targets before either
/// replaces an existing file; when the second rename fails the first file is
/// removed again, so a failed run leaves no `.sql` without its `.csv`.
pub fn write_outputs(
    dir: &Path,
    table_name: &str,
    records: &YearRecordSet,
    sink: &dyn TraceSink,
) -> Result<OutputPaths> {
    let sql = render_sql(table_name, records);
    let csv = render_csv(records)?;

    fs::create_dir_all(dir).map_err(|source| Error::io(dir, source))?;
    let dir = fs::canonicalize(dir).map_err(|source| Error::io(dir, source))?;
    let paths = OutputPaths::new(&dir, records.year());

    let staged_sql = stage(&dir, sql.as_bytes())?;
    let staged_csv = stage(&dir, &csv)?;
    persist(staged_sql, &paths.sql)?;
    if let Err(err) = persist(staged_csv, &paths.csv) {
        // the csv error is the one worth reporting
        let _ = fs::remove_file(&paths.sql);
        return Err(err);
    }

    sink.file_written(&paths.sql, records.len());
    sink.file_written(&paths.csv, records.len());
    Ok(paths)
}

fn stage(dir: &Path, contents: &[u8]) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new_in(dir).map_err(|source| Error::io(dir, source))?;
    file.write_all(contents)
        .map_err(|source| Error::io(file.path(), source))?;
    Ok(file)
}

// the staged file is deleted when persisting fails
fn persist(file: NamedTempFile, path: &Path) -> Result<()> {
    file.persist(path).map_err(|err| Error::io(path, err.error))?;
    Ok(())
}
