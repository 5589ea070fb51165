//! Probe a serial nRF24 bridge.
//!
//! Configures addresses, switches to listening, asks the bridge to dump its
//! settings and reads two 4-byte counters from the remote node.

use std::process::ExitCode;

use clap::Parser;
use rf24_protocol::Rf24Serial;
use rf24_runner::logging::init_logging;
use rf24_runner::session::{run_probe, settle};
use rf24_runner::CommonArgs;

/// Probe a serial nRF24 bridge
#[derive(Parser, Debug)]
#[command(name = "rf24-probe")]
#[command(version)]
struct Args {
    /// Serial port of the bridge (e.g. /dev/ttyUSB0 or COM15)
    port: String,

    /// Number of counters to read
    #[arg(long)]
    reads: Option<usize>,

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
    if let Some(reads) = args.reads {
        config.reads = reads;
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

    match run_probe(&mut radio, &config) {
        Ok(values) => {
            for value in values {
                println!("Read value: {}", value);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Probe failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
