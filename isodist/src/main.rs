use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use isodist::{FoldingConfig, IsoError, IsotopeDistribution, Peak};

/// Fold an isotope distribution with itself and print the resulting peaks.
#[derive(Parser, Debug)]
#[command(name = "isodist", version, about)]
struct Args {
    /// Isotope peak as `mass:abundance`, repeat in isotope order
    #[arg(short, long = "peak", value_parser = parse_peak, required = true)]
    peaks: Vec<Peak>,

    /// Number of identical components to fold together
    #[arg(short = 'n', long, default_value_t = 1)]
    power: u32,

    /// Nominal mass of a single component
    #[arg(long, default_value_t = 0)]
    nominal_mass: i32,

    /// JSON file holding the folding configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of peaks to compute, overrides the configuration file
    #[arg(short, long)]
    size: Option<usize>,

    /// Abundance sum tolerance, overrides the configuration file
    #[arg(short, long)]
    tolerance: Option<f64>,
}

fn parse_peak(value: &str) -> Result<Peak, String> {
    let (mass, abundance) = value
        .split_once(':')
        .ok_or_else(|| format!("expected mass:abundance, got '{}'", value))?;
    let mass = mass.trim().parse::<f64>().map_err(|e| format!("invalid mass '{}': {}", mass, e))?;
    let abundance = abundance
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid abundance '{}': {}", abundance, e))?;
    Ok(Peak::new(mass, abundance))
}

fn load_config(args: &Args) -> Result<FoldingConfig, IsoError> {
    let mut config = match &args.config {
        Some(path) => FoldingConfig::from_json(&fs::read_to_string(path)?)?,
        None => FoldingConfig::default(),
    };
    if let Some(size) = args.size {
        config.size = size;
    }
    if let Some(tolerance) = args.tolerance {
        config.abundance_sum_error = tolerance;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), IsoError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    info!("folding with {:?}", config);

    let component = IsotopeDistribution::from_peaks(args.peaks.clone(), args.nominal_mass);
    let result = component.fold_pow(args.power, &config);

    info!(
        "{} peaks, nominal mass {}, average mass {}",
        result.len(),
        result.nominal_mass(),
        result.average_mass()
    );
    print!("{}", result);

    Ok(())
}
