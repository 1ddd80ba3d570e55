use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use workcal::config::GenerationConfig;
use workcal::jurisdiction::oracle_for;
use workcal::trace::LogSink;

/// Classify every day of a year and write <year>Day.sql and <year>Day.csv
#[derive(Parser)]
#[command(name = "workcal", version, about, long_about = None)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Overrides generation.target_year
    #[arg(short, long)]
    year: Option<i32>,

    /// Overrides generation.save_path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON holiday rules merged into the built-in ones, overrides oracle.rules_path
    #[arg(short, long)]
    rules: Option<PathBuf>,
}

fn run(cli: Cli) -> workcal::Result<()> {
    let mut config = GenerationConfig::from_path(&cli.config)?;
    if let Some(year) = cli.year {
        config.target_year = year;
    }
    if let Some(output) = cli.output {
        config.save_path = output;
    }
    if let Some(rules) = cli.rules {
        config.oracle.rules_path = Some(rules);
    }
    let oracle = oracle_for(&config.oracle)?;
    let paths = workcal::pipeline::run(&config, &oracle, &LogSink)?;
    log::info!("SQL file saved: {}", paths.sql.display());
    log::info!("CSV file saved: {}", paths.csv.display());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("generation failed: {err}");
            ExitCode::FAILURE
        }
    }
}
