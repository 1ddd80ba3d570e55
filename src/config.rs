//! Typed configuration loaded from a YAML document.
//!
//! ```yaml
//! database:
//!   table_name: SYS_CALENDAR
//! generation:
//!   target_year: 2025
//!   save_path: ./output
//! date_types:
//!   workday: { code: "1", description: Workday }
//!   weekend: { code: "2", description: Weekend }
//!   holiday: { code: "3", description: Public holiday }
//!   working_holiday: { code: "4", description: Make-up workday }
//! oracle:
//!   jurisdiction: CN
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::classify::DayKind;
use crate::error::ConfigError;

/// Code and human readable description emitted for one kind of day
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct DateType {
    #[serde(deserialize_with = "code_from_scalar")]
    pub code: String,
    #[serde(default)]
    pub description: String,
}

/// Codes for the four kinds of day, validated once at load time
#[derive(Debug, Clone, PartialEq)]
pub struct DateTypeCodes {
    pub workday: DateType,
    pub weekend: DateType,
    pub holiday: DateType,
    pub working_holiday: DateType,
}

impl DateTypeCodes {
    /// Picks the four required entries out of the `date_types` mapping.
    /// Extra entries are ignored, the four codes must be distinct.
    pub fn from_map(mut map: BTreeMap<String, DateType>) -> Result<DateTypeCodes, ConfigError> {
        let mut take = |key: &str| {
            map.remove(key)
                .ok_or_else(|| ConfigError::MissingKey(format!("date_types.{key}")))
        };
        let codes = DateTypeCodes {
            workday: take("workday")?,
            weekend: take("weekend")?,
            holiday: take("holiday")?,
            working_holiday: take("working_holiday")?,
        };
        codes.check_distinct()?;
        Ok(codes)
    }

    fn check_distinct(&self) -> Result<(), ConfigError> {
        let mut seen: BTreeMap<&str, DayKind> = BTreeMap::new();
        for kind in DayKind::ALL {
            if let Some(first) = seen.insert(self.code(kind), kind) {
                return Err(ConfigError::DuplicateCode {
                    code: self.code(kind).to_owned(),
                    first: Self::key(first).to_owned(),
                    second: Self::key(kind).to_owned(),
                });
            }
        }
        Ok(())
    }

    /// Name of the `date_types` entry holding the code for `kind`
    pub fn key(kind: DayKind) -> &'static str {
        match kind {
            DayKind::Workday => "workday",
            DayKind::Weekend => "weekend",
            DayKind::Holiday => "holiday",
            DayKind::MakeupWorkday => "working_holiday",
        }
    }

    pub fn get(&self, kind: DayKind) -> &DateType {
        match kind {
            DayKind::Workday => &self.workday,
            DayKind::Weekend => &self.weekend,
            DayKind::Holiday => &self.holiday,
            DayKind::MakeupWorkday => &self.working_holiday,
        }
    }

    pub fn code(&self, kind: DayKind) -> &str {
        &self.get(kind).code
    }
}

/// Which holiday rules back the oracle
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct OracleConfig {
    #[serde(default = "default_jurisdiction")]
    pub jurisdiction: String,
    /// JSON rule set merged into the built-in rules, relative to the working directory
    #[serde(default)]
    pub rules_path: Option<PathBuf>,
}

impl Default for OracleConfig {
    fn default() -> Self {
        OracleConfig {
            jurisdiction: default_jurisdiction(),
            rules_path: None,
        }
    }
}

fn default_jurisdiction() -> String {
    "CN".to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub table_name: String,
    pub target_year: i32,
    pub save_path: PathBuf,
    pub date_types: DateTypeCodes,
    pub oracle: OracleConfig,
}

#[derive(Deserialize)]
struct DatabaseSection {
    table_name: String,
}

#[derive(Deserialize)]
struct GenerationSection {
    target_year: i32,
    save_path: PathBuf,
}

#[derive(Deserialize)]
struct ConfigDocument {
    database: DatabaseSection,
    generation: GenerationSection,
    date_types: Option<BTreeMap<String, DateType>>,
    #[serde(default)]
    oracle: OracleConfig,
}

impl GenerationConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<GenerationConfig, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> Result<GenerationConfig, ConfigError> {
        let document: ConfigDocument = serde_yaml::from_str(text)?;
        let date_types = document
            .date_types
            .ok_or_else(|| ConfigError::MissingKey("date_types".to_string()))?;
        Ok(GenerationConfig {
            table_name: document.database.table_name,
            target_year: document.generation.target_year,
            save_path: document.generation.save_path,
            date_types: DateTypeCodes::from_map(date_types)?,
            oracle: document.oracle,
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
}

// codes are often written unquoted, e.g. `code: 1`
fn code_from_scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Text(text) => text,
        Scalar::Integer(number) => number.to_string(),
    })
}
