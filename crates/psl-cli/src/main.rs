use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use psl_core::{analyze_with, displayable, AdviceItem, AnalysisError, Gender, Report};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod detection;
mod render;

use config::{Config, OutputFormat};
use detection::JsonFileDetector;

/// Exit status when the detector found no face.
const EXIT_NO_FACE: i32 = 2;

#[derive(Parser)]
#[command(name = "psl", about = "Facial proportion scoring from detected landmarks")]
struct Cli {
    /// TOML configuration file (default: $PSL_CONFIG)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a face from a landmark detection file
    Analyze {
        /// JSON file with 68 landmarks and the detector confidence
        input: PathBuf,
        /// Declared gender (male, female)
        #[arg(short, long)]
        gender: Option<Gender>,
        /// Declared age in years
        #[arg(short, long)]
        age: Option<u32>,
        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
        /// Include advice restricted to another gender
        #[arg(long)]
        all_advice: bool,
    },
    /// Print the score band table
    Bands,
    /// Validate weights, bands and advice rules
    Check,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Inconsistent static tables are a build defect; refuse to score anything.
    psl_core::validate_calibration().context("calibration tables are inconsistent")?;

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze {
            input,
            gender,
            age,
            format,
            all_advice,
        } => {
            let gender = gender.unwrap_or(config.default_gender);
            let age = age.unwrap_or(config.default_age);
            let format = format.unwrap_or(config.format);
            let show_restricted = all_advice || config.show_restricted;

            let report = match analyze_with(&JsonFileDetector, input.as_path(), gender, age) {
                Ok(report) => report,
                Err(AnalysisError::MissingFace) => {
                    eprintln!("{}", AnalysisError::MissingFace);
                    std::process::exit(EXIT_NO_FACE);
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("analyzing {}", input.display()));
                }
            };

            let advice = select_advice(&report, show_restricted, config.max_advice);
            match format {
                OutputFormat::Text => print!(
                    "{}",
                    render::ReportText {
                        report: &report,
                        advice: &advice,
                    }
                ),
                OutputFormat::Json => {
                    let shown: Vec<AdviceItem> = advice.into_iter().cloned().collect();
                    let view = Report {
                        advice: shown,
                        ..report
                    };
                    println!("{}", serde_json::to_string_pretty(&view)?);
                }
            }
        }
        Commands::Bands => {
            print!("{}", render::BandTable);
        }
        Commands::Check => {
            println!(
                "calibration OK: {} weights, {} bands, {} advice rules",
                psl_core::Metric::ALL.len(),
                psl_core::BANDS.len(),
                psl_core::advice::RULES.len()
            );
        }
    }

    Ok(())
}

/// Apply the presentation filters: gender restriction, then the item cap.
fn select_advice(report: &Report, show_restricted: bool, max: usize) -> Vec<&AdviceItem> {
    let mut items: Vec<&AdviceItem> = if show_restricted {
        report.advice.iter().collect()
    } else {
        displayable(&report.advice, report.gender)
    };
    if max > 0 {
        items.truncate(max);
    }
    items
}
