use clap::{Parser, Subcommand};
use pronto_core::clinical::VitalSigns;
use pronto_core::config::load_vital_thresholds;
use pronto_core::validation::validate_vital_signs;
use pronto_core::{evaluate_vitals_with, CoreConfig, VitalThresholds};
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod demo;

#[derive(Parser)]
#[command(name = "pronto")]
#[command(about = "Pronto emergency-department record tracker CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a set of vital signs and print the alerts they raise
    Vitals {
        /// Systolic pressure (mmHg)
        #[arg(long)]
        systolic: Option<u16>,
        /// Diastolic pressure (mmHg)
        #[arg(long)]
        diastolic: Option<u16>,
        /// Heart rate (bpm)
        #[arg(long)]
        heart_rate: Option<u16>,
        /// Respiratory rate (rpm)
        #[arg(long)]
        respiratory_rate: Option<u16>,
        /// Temperature (°C)
        #[arg(long)]
        temperature: Option<f64>,
        /// Oxygen saturation (%)
        #[arg(long)]
        saturation: Option<u8>,
        /// Capillary glucose (mg/dL)
        #[arg(long)]
        glucose: Option<u16>,
        /// YAML file overriding the alert thresholds
        #[arg(long)]
        thresholds: Option<PathBuf>,
    },
    /// Run a scripted shift against an in-memory store and print each timeline
    Demo {
        /// YAML file overriding the alert thresholds
        #[arg(long)]
        thresholds: Option<PathBuf>,
    },
}

fn thresholds_from(path: Option<&Path>) -> Result<VitalThresholds, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(load_vital_thresholds(path)?),
        None => Ok(VitalThresholds::default()),
    }
}

/// Validate `vitals` and render one alert label per line, or "No alerts.".
fn vitals_report(
    vitals: &VitalSigns,
    thresholds: &VitalThresholds,
) -> Result<String, Box<dyn std::error::Error>> {
    validate_vital_signs(vitals)?;
    let alerts = evaluate_vitals_with(vitals, thresholds);
    if alerts.is_empty() {
        return Ok("No alerts.".to_string());
    }
    let labels: Vec<&str> = alerts.iter().map(|a| a.label()).collect();
    Ok(labels.join("\n"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("pronto=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Vitals {
            systolic,
            diastolic,
            heart_rate,
            respiratory_rate,
            temperature,
            saturation,
            glucose,
            thresholds,
        }) => {
            let vitals = VitalSigns {
                systolic,
                diastolic,
                heart_rate,
                respiratory_rate,
                temperature,
                saturation,
                glucose,
            };
            let thresholds = thresholds_from(thresholds.as_deref())?;
            println!("{}", vitals_report(&vitals, &thresholds)?);
        }
        Some(Commands::Demo { thresholds }) => {
            let thresholds = thresholds_from(thresholds.as_deref())?;
            let cfg = CoreConfig::new(thresholds, CoreConfig::default().search_limit_max())?;
            demo::run_demo(Arc::new(cfg), &mut std::io::stdout().lock())?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
