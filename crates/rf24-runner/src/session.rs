//! Fixed command sequences run against a bridge.
//!
//! The sequences are generic over the transport so they run the same way
//! against a serial port and against a scripted bridge.

use std::thread;
use std::time::Duration;

use rf24_protocol::{Confirmation, Rf24Result, Rf24Serial, Telemetry, Transport};
use tracing::{info, warn};

use crate::config::RunnerConfig;
use crate::error::RunnerResult;

/// Wait for the bridge to come out of reset after the port was opened.
pub fn settle(config: &RunnerConfig) {
    if config.settle_ms > 0 {
        info!("Waiting {} ms for the bridge to start", config.settle_ms);
        thread::sleep(Duration::from_millis(config.settle_ms));
    }
}

/// Run one step and warn when the bridge did not confirm it.
fn step(name: &str, result: Rf24Result<Confirmation>) -> RunnerResult<()> {
    match result? {
        Confirmation::Confirmed => info!("{}: OK", name),
        Confirmation::Unconfirmed => warn!("{}: no status received", name),
    }
    Ok(())
}

/// Configure the link, dump settings, then read `config.reads` counters.
///
/// Each counter is a 4-byte little-endian unsigned value.
pub fn run_probe<T: Transport>(
    radio: &mut Rf24Serial<T>,
    config: &RunnerConfig,
) -> RunnerResult<Vec<u32>> {
    step("test", radio.test())?;
    step("test", radio.test())?;
    step("set rx address", radio.set_rx_address(&config.rx_address))?;
    step("set tx address", radio.set_tx_address(&config.tx_address))?;
    step("start listening", radio.start_listening())?;
    step("dump", radio.dump())?;

    let mut values = Vec::with_capacity(config.reads);
    for _ in 0..config.reads {
        let mut data = [0u8; 4];
        step("read", radio.read(&mut data))?;
        values.push(u32::from_le_bytes(data));
    }
    Ok(values)
}

/// Configure the link for telemetry and hand every frame to `on_frame`.
///
/// Runs until `max_frames` frames were read, or forever when `None`.
/// Returns the number of frames read.
pub fn run_telemetry<T, F>(
    radio: &mut Rf24Serial<T>,
    config: &RunnerConfig,
    max_frames: Option<usize>,
    mut on_frame: F,
) -> RunnerResult<usize>
where
    T: Transport,
    F: FnMut(&Telemetry),
{
    step("test", radio.test())?;
    step("set rate", radio.set_rate(config.rate))?;
    step("set rx address", radio.set_rx_address(&config.rx_address))?;
    step("start listening", radio.start_listening())?;

    let mut frames = 0;
    while max_frames.map_or(true, |max| frames < max) {
        let (telemetry, confirmation) = radio.read_telemetry()?;
        if confirmation == Confirmation::Unconfirmed {
            warn!("telemetry frame {} was not confirmed", frames);
        }
        on_frame(&telemetry);
        frames += 1;
    }
    Ok(frames)
}
