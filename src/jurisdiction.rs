use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::calendar::{Calendar, Holiday};
use crate::config::OracleConfig;
use crate::error::ConfigError;

/// Holiday rules together with the years they are known to be complete for
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RuleSet {
    pub first_year: i32,
    pub last_year: i32,
    pub rules: Vec<Holiday>,
}

impl RuleSet {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<RuleSet, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Rules {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn years(&self) -> std::ops::RangeInclusive<i32> {
        self.first_year..=self.last_year
    }

    pub fn calendar(&self) -> Calendar {
        Calendar::calc_calendar(&self.rules, self.first_year, self.last_year)
    }
}

/// One calendar from several rule sets, applied in order so that on conflicting
/// dates the later rule wins. Only years covered by at least one set are supported,
/// years between disjoint sets stay unsupported.
pub fn combined_calendar(rule_sets: &[RuleSet]) -> Calendar {
    let first = rule_sets.iter().map(|set| set.first_year).min().unwrap_or(0);
    let last = rule_sets.iter().map(|set| set.last_year).max().unwrap_or(-1);
    let rules: Vec<Holiday> = rule_sets
        .iter()
        .flat_map(|set| set.rules.iter().cloned())
        .collect();
    Calendar::calc_calendar(&rules, first, last)
        .restrict_years(rule_sets.iter().flat_map(RuleSet::years))
}

/// Built-in rule sets keyed by jurisdiction code
#[derive(Debug, Clone)]
pub struct Jurisdictions {
    rule_sets: BTreeMap<String, RuleSet>,
}

impl Jurisdictions {
    pub fn builtin() -> Jurisdictions {
        let mut rule_sets = BTreeMap::new();
        rule_sets.insert("CN".to_string(), china_mainland());
        Jurisdictions { rule_sets }
    }

    pub fn get(&self, name: &str) -> Option<&RuleSet> {
        self.rule_sets.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rule_sets.keys().map(String::as_str)
    }
}

/// Builds the oracle described by `config`: the built-in rules of the
/// jurisdiction, extended by the optional rule file.
pub fn oracle_for(config: &OracleConfig) -> Result<Calendar, ConfigError> {
    let builtin = Jurisdictions::builtin()
        .get(&config.jurisdiction)
        .cloned()
        .ok_or_else(|| ConfigError::UnknownJurisdiction(config.jurisdiction.clone()))?;
    let mut rule_sets = vec![builtin];
    if let Some(path) = &config.rules_path {
        rule_sets.push(RuleSet::from_json_file(path)?);
    }
    Ok(combined_calendar(&rule_sets))
}

type Ymd = (i32, u32, u32);

/// Days off as published by the State Council, `(name, first, last)`
const CN_DAYS_OFF: &[(&str, Ymd, Ymd)] = &[
    ("New Year's Day", (2024, 1, 1), (2024, 1, 1)),
    ("Spring Festival", (2024, 2, 10), (2024, 2, 17)),
    ("Tomb-sweeping Day", (2024, 4, 4), (2024, 4, 6)),
    ("Labour Day", (2024, 5, 1), (2024, 5, 5)),
    ("Dragon Boat Festival", (2024, 6, 10), (2024, 6, 10)),
    ("Mid-autumn Festival", (2024, 9, 15), (2024, 9, 17)),
    ("National Day", (2024, 10, 1), (2024, 10, 7)),
    ("New Year's Day", (2025, 1, 1), (2025, 1, 1)),
    ("Spring Festival", (2025, 1, 28), (2025, 2, 4)),
    ("Tomb-sweeping Day", (2025, 4, 4), (2025, 4, 6)),
    ("Labour Day", (2025, 5, 1), (2025, 5, 5)),
    ("Dragon Boat Festival", (2025, 5, 31), (2025, 6, 2)),
    ("National Day", (2025, 10, 1), (2025, 10, 8)),
    // falls inside the National Day block
    ("Mid-autumn Festival", (2025, 10, 6), (2025, 10, 6)),
];

/// Weekend days worked to compensate, `(name of the holiday, date)`
const CN_MAKEUP_DAYS: &[(&str, Ymd)] = &[
    ("Spring Festival", (2024, 2, 4)),
    ("Spring Festival", (2024, 2, 18)),
    ("Tomb-sweeping Day", (2024, 4, 7)),
    ("Labour Day", (2024, 4, 28)),
    ("Labour Day", (2024, 5, 11)),
    ("Mid-autumn Festival", (2024, 9, 14)),
    ("National Day", (2024, 9, 29)),
    ("National Day", (2024, 10, 12)),
    ("Spring Festival", (2025, 1, 26)),
    ("Spring Festival", (2025, 2, 8)),
    ("Labour Day", (2025, 4, 27)),
    ("National Day", (2025, 9, 28)),
    ("National Day", (2025, 10, 11)),
];

fn date((year, month, day): Ymd) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Mainland China, 2024 through 2025
pub fn china_mainland() -> RuleSet {
    let mut rules = vec![Holiday::WeekDay(Weekday::Sat), Holiday::WeekDay(Weekday::Sun)];
    rules.extend(CN_DAYS_OFF.iter().filter_map(|(name, first, last)| {
        Some(Holiday::DateRange {
            first: date(*first)?,
            last: date(*last)?,
            name: name.to_string(),
        })
    }));
    rules.extend(CN_MAKEUP_DAYS.iter().filter_map(|(name, day)| {
        Some(Holiday::MakeupDay {
            date: date(*day)?,
            name: name.to_string(),
        })
    }));
    RuleSet {
        first_year: 2024,
        last_year: 2025,
        rules,
    }
}
