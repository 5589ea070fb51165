//! Print motor telemetry received through a serial nRF24 bridge.

use std::process::ExitCode;

use clap::Parser;
use rf24_protocol::Rf24Serial;
use rf24_runner::logging::init_logging;
use rf24_runner::session::{run_telemetry, settle};
use rf24_runner::CommonArgs;

/// Print telemetry frames from a remote robot
#[derive(Parser, Debug)]
#[command(name = "rf24-telemetry")]
#[command(version)]
struct Args {
    /// Serial port of the bridge (e.g. /dev/ttyUSB0 or COM15)
    port: String,

    /// Air data rate index
    #[arg(long)]
    rate: Option<u32>,

    /// Stop after this many frames (default: run until interrupted)
    #[arg(short = 'n', long)]
    frames: Option<usize>,

    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.common.verbose);

    let mut config = match args.common.resolve() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(rate) = args.rate {
        config.rate = rate;
    }

    tracing::info!("Working with port: {}", args.port);
    let mut radio =
        match Rf24Serial::open(&args.port, &config.serial_settings(), config.driver_config()) {
            Ok(radio) => radio,
            Err(e) => {
                tracing::error!("Failed to open the port called {}: {}", args.port, e);
                return ExitCode::SUCCESS;
            }
        };

    settle(&config);

    let result = run_telemetry(&mut radio, &config, args.frames, |telemetry| {
        println!("Telemetry: {}", telemetry);
    });

    match result {
        Ok(frames) => {
            tracing::info!("Received {} telemetry frames", frames);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Telemetry failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
