//! Simulates a capacitor charging at a handful of fixed currents and runs
//! the measurement engine over the resulting timer events.
//!
//! The simulated period for each current comes from the same physics the
//! meter inverts: a current of `value` 0.1 nA units charges the reference
//! capacitor to the comparator threshold in `K / value` clock cycles. The
//! printed estimate should therefore reproduce the input current exactly,
//! and the zero-current pass should time out and report zero.

use capmeter::mock::{MockPin, MockTimer};
use capmeter::prelude::*;
use capmeter::{Config, CurrentMeter, Mode};

/// Simulated currents, in units of 0.1 nA.
const CURRENTS: &[u32] = &[10_000, 1_000, 100, 10, 0];

fn main() {
    let timer = MockTimer::new();
    let pin = MockPin::new();
    let config = Config::new(16.mhz().into());
    let k = config.charge_scale();

    let mut meter = CurrentMeter::new(timer.clone(), pin, config).expect("reference config");
    meter.setup();
    meter.on_overflow();
    assert_eq!(meter.mode(), Mode::Idle);

    println!("simulating with K = {}", k);

    for &current in CURRENTS {
        meter.update();

        if current == 0 {
            // Nothing charges the capacitor; run overflows until the
            // engine gives up on its own.
            let mut overflows = 0u32;
            while meter.mode() == Mode::Charging {
                meter.on_overflow();
                overflows += 1;
            }
            println!(
                "   0.0 nA in: timed out after {} overflows -> value {}",
                overflows,
                meter.value()
            );
        } else {
            let period = k / current as u64;
            for _ in 0..(period >> 16) {
                meter.on_overflow();
            }
            timer.latch(period as u16);
            meter.on_capture();
            println!(
                "{:>4}.{} nA in: period {:>9} cycles -> value {:>6} ({}.{} nA)",
                current / 10,
                current % 10,
                meter.period(),
                meter.value(),
                meter.value() / 10,
                meter.value() % 10
            );
        }

        // Let the discharge cycle finish before the next round.
        meter.on_overflow();
        assert_eq!(meter.mode(), Mode::Idle);
    }
}
