//! Work calendar generator.
//!
//! Every day of a year is classified as a workday, weekend, public holiday or
//! make-up workday by asking a [`calendar::HolidayOracle`], then written out
//! as SQL insert statements and a CSV file.
//!
//! ```no_run
//! use workcal::config::GenerationConfig;
//! use workcal::jurisdiction::oracle_for;
//! use workcal::trace::LogSink;
//!
//! let config = GenerationConfig::from_path("config.yaml")?;
//! let oracle = oracle_for(&config.oracle)?;
//! let paths = workcal::pipeline::run(&config, &oracle, &LogSink)?;
//! println!("{}", paths.sql.display());
//! # Ok::<(), workcal::error::Error>(())
//! ```

pub mod calendar;
pub mod classify;
pub mod config;
pub mod error;
pub mod generate;
pub mod jurisdiction;
pub mod pipeline;
pub mod render;
pub mod trace;
pub mod year;

pub use error::{ConfigError, Error, Result};
