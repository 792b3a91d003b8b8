//! quadline command-line interface.
//!
//! Runs S-parameter sweeps and transient step responses of a single
//! four-terminal transmission line. Set `RUST_LOG=debug` for solver logs.

mod analysis;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use quadline_core::{LineParams, Z0};
use quadline_devices::TransmissionLine4;
use quadline_solver::FrequencySweep;

use analysis::transient::TransientSetup;

/// Four-terminal lossy transmission-line analysis
#[derive(Parser)]
#[command(name = "quadline", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Line parameters, from a JSON file and/or individual flags.
#[derive(Args)]
struct LineArgs {
    /// JSON file with line parameters ({"length", "z", "alpha", "temp"})
    #[arg(long)]
    params: Option<PathBuf>,

    /// Physical length (m)
    #[arg(short = 'l', long)]
    length: Option<f64>,

    /// Characteristic impedance (Ω)
    #[arg(short = 'z', long)]
    z: Option<f64>,

    /// Linear attenuation factor (1 = lossless)
    #[arg(long)]
    alpha: Option<f64>,

    /// Device temperature (°C)
    #[arg(long)]
    temp: Option<f64>,
}

impl LineArgs {
    /// Resolve parameters: file values (or defaults), then flag overrides.
    fn resolve(&self) -> Result<LineParams> {
        let mut params = match &self.params {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => LineParams::default(),
        };
        if let Some(length) = self.length {
            params.length = length;
        }
        if let Some(z) = self.z {
            params.z = z;
        }
        if let Some(alpha) = self.alpha {
            params.alpha = alpha;
        }
        if let Some(temp) = self.temp {
            params.temp = temp;
        }
        params.validate().context("invalid line parameters")?;
        log::debug!("line parameters: {:?}", params);
        Ok(params)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Sweep the single-ended and differential S-parameters
    Sparams {
        #[command(flatten)]
        line: LineArgs,

        /// Reference impedance at every terminal (Ω)
        #[arg(long, default_value_t = Z0)]
        z0: f64,

        /// Start frequency (Hz)
        #[arg(long, default_value = "1e6")]
        start: f64,

        /// Stop frequency (Hz)
        #[arg(long, default_value = "1e10")]
        stop: f64,

        /// Number of frequency points
        #[arg(long, default_value = "201")]
        points: usize,

        /// Logarithmic frequency spacing
        #[arg(long)]
        log: bool,

        /// Include the noise-correlation matrix
        #[arg(long)]
        noise: bool,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Step response of a source / line / load circuit
    Transient {
        #[command(flatten)]
        line: LineArgs,

        /// Stop time (s); defaults to four propagation delays
        #[arg(long)]
        tstop: Option<f64>,

        /// Timestep (s); defaults to a twentieth of the propagation delay
        #[arg(long)]
        tstep: Option<f64>,

        /// Source resistance (Ω); defaults to the line impedance
        #[arg(long)]
        rs: Option<f64>,

        /// Load resistance (Ω); defaults to the line impedance
        #[arg(long)]
        rl: Option<f64>,

        /// Step amplitude (V)
        #[arg(long, default_value = "1.0")]
        amplitude: f64,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Sparams {
            line,
            z0,
            start,
            stop,
            points,
            log,
            noise,
            json,
        } => {
            let params = line.resolve()?;
            let line = TransmissionLine4::new("T1", params).with_reference_impedance(z0);
            let sweep = if log {
                FrequencySweep::logarithmic(start, stop, points)
            } else {
                FrequencySweep::linear(start, stop, points)
            }
            .context("invalid frequency sweep")?;
            analysis::run_sparams(&line, &sweep, noise, json)
        }
        Commands::Transient {
            line,
            tstop,
            tstep,
            rs,
            rl,
            amplitude,
            json,
        } => {
            let params = line.resolve()?;
            let setup = TransientSetup::new(params, tstop, tstep, rs, rl, amplitude);
            analysis::run_transient(params, &setup, json)
        }
    }
}
