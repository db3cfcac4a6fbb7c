//! Console trace demo for the ISA bus bridge.
//!
//! Drives a scripted bus waveform through the clocked core on the main
//! thread while a consumer thread decodes the outbound byte stream and
//! logs one line per transaction.
//!
//! ## Usage
//!
//! ```sh
//! RUST_LOG=debug cargo run -p bridge-core --example trace_console
//! ```

use std::thread;

use bridge_core::{BridgeConfig, BusLines, HostDecoder, IsaBridge, LogSink, StopToken};

use log as _;
use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

const HOLD_TICKS: usize = 6;
const RELEASE_TICKS: usize = 4;

fn pulse(bridge: &mut IsaBridge, lines: BusLines) {
    for _ in 0..HOLD_TICKS {
        bridge.tick(lines);
    }
    for _ in 0..RELEASE_TICKS {
        bridge.tick(BusLines::default());
    }
}

fn main() {
    env_logger::init();

    let (mut bridge, rx) = IsaBridge::with_config(&BridgeConfig::default());
    let stop = StopToken::new();

    let token = stop.clone();
    let consumer = thread::spawn(move || {
        let mut decoder = HostDecoder::new(rx, LogSink);
        decoder.run(&token);
    });

    // Fill every register, then read the file back.
    for addr in 0..8u8 {
        pulse(
            &mut bridge,
            BusLines {
                addr,
                data: 0xA0 | addr,
                cs: true,
                iow_n: false,
                ..BusLines::default()
            },
        );
    }
    for addr in 0..8u8 {
        pulse(
            &mut bridge,
            BusLines {
                addr,
                cs: true,
                ior_n: false,
                ..BusLines::default()
            },
        );
    }

    // Closing the channel ends the consumer's blocking loop.
    drop(bridge);
    consumer.join().expect("consumer thread must not panic");
}
