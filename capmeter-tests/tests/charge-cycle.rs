//! Scenario tests for the charge/discharge state machine, driven against
//! the mock hardware.

use capmeter::mock::{MockPin, MockTimer};
use capmeter::prelude::*;
use capmeter::{Config, CurrentMeter, Mode};

const CLOCK_HZ: u32 = 16_000_000;

fn reference_meter() -> (CurrentMeter<MockTimer, MockPin>, MockTimer, MockPin) {
    let timer = MockTimer::new();
    let pin = MockPin::new();
    let config = Config::new(CLOCK_HZ.hz());
    let meter = CurrentMeter::new(timer.clone(), pin.clone(), config).unwrap();
    (meter, timer, pin)
}

/// Runs `meter` through setup and the initial discharge cycle, into `Idle`.
fn setup_and_drain(meter: &mut CurrentMeter<MockTimer, MockPin>) {
    meter.setup();
    meter.on_overflow();
    assert_eq!(meter.mode(), Mode::Idle);
}

#[test]
fn setup_configures_pin_and_starts_discharging() {
    let (mut meter, timer, pin) = reference_meter();
    meter.setup();

    let pin_state = pin.state();
    assert!(pin_state.digital_input_disabled);
    assert!(!pin_state.charging);
    assert_eq!(pin_state.discharges, 1);
    assert!(!pin_state.capture_trigger_enabled);

    let timer_state = timer.state();
    assert_eq!(timer_state.resets, 1);
    assert!(timer_state.overflow_irq_enabled);
    assert!(timer_state.capture_irq_enabled);
    assert!(timer_state.running);
    // 10 us at 16 MHz is 160 cycles, loaded negated.
    assert_eq!(timer_state.counter, 0u16.wrapping_sub(160));

    assert_eq!(meter.mode(), Mode::Discharging);
}

#[test]
fn discharge_overflow_parks_the_meter_idle() {
    let (mut meter, timer, _pin) = reference_meter();
    meter.setup();

    meter.on_overflow();

    assert_eq!(meter.mode(), Mode::Idle);
    assert!(!timer.state().running);
}

#[test]
fn update_starts_exactly_one_charge_cycle() {
    let (mut meter, timer, pin) = reference_meter();
    setup_and_drain(&mut meter);
    let starts_before = timer.state().starts;

    meter.update();

    assert_eq!(meter.mode(), Mode::Charging);
    let timer_state = timer.state();
    assert_eq!(timer_state.starts, starts_before + 1);
    assert!(timer_state.running);
    assert_eq!(timer_state.counter, 0);
    let pin_state = pin.state();
    assert!(pin_state.charging);
    assert!(pin_state.capture_trigger_enabled);
}

#[test]
fn update_is_a_strict_noop_outside_idle() {
    let (mut meter, timer, pin) = reference_meter();
    setup_and_drain(&mut meter);

    meter.update();
    let timer_before = timer.state();
    let pin_before = pin.state();

    // Charging: a second update must not touch anything.
    meter.update();
    assert_eq!(meter.mode(), Mode::Charging);
    let timer_after = timer.state();
    assert_eq!(timer_after.starts, timer_before.starts);
    assert_eq!(timer_after.stops, timer_before.stops);
    assert_eq!(timer_after.loads, timer_before.loads);
    assert_eq!(pin.state().charges, pin_before.charges);
    assert_eq!(pin.state().discharges, pin_before.discharges);

    // Discharging: same.
    timer.latch(500);
    meter.on_capture();
    let timer_before = timer.state();
    let pin_before = pin.state();
    meter.update();
    assert_eq!(meter.mode(), Mode::Discharging);
    assert_eq!(timer.state().starts, timer_before.starts);
    assert_eq!(pin.state().charges, pin_before.charges);
}

#[test]
fn capture_combines_high_and_low_words() {
    let (mut meter, timer, _pin) = reference_meter();
    setup_and_drain(&mut meter);

    meter.update();
    for _ in 0..3 {
        meter.on_overflow();
    }
    timer.latch(0x1234);
    meter.on_capture();

    assert_eq!(meter.period(), (3 << 16) | 0x1234);
    assert_eq!(meter.mode(), Mode::Discharging);
}

#[test]
fn capture_yields_the_exact_reference_value() {
    let (mut meter, timer, _pin) = reference_meter();
    setup_and_drain(&mut meter);

    // 228_800 cycles = 3 overflows plus a low word of 32_192.
    meter.update();
    for _ in 0..3 {
        meter.on_overflow();
    }
    timer.latch(32_192);
    meter.on_capture();

    assert_eq!(meter.period(), 228_800);
    // K = 228_800_000, so 228_800 cycles is 100.0 nA.
    assert_eq!(meter.value(), 1_000);
}

#[test]
fn capture_stops_then_reprograms_the_counter() {
    let (mut meter, timer, pin) = reference_meter();
    setup_and_drain(&mut meter);

    meter.update();
    let before = timer.state();
    timer.latch(42);
    meter.on_capture();

    let after = timer.state();
    assert_eq!(after.stops, before.stops + 1);
    assert_eq!(after.loads, before.loads + 1);
    assert_eq!(after.counter, 0u16.wrapping_sub(160));
    assert!(!pin.state().capture_trigger_enabled);
    assert!(after.running);

    // The discharge-complete overflow returns the meter to idle.
    meter.on_overflow();
    assert_eq!(meter.mode(), Mode::Idle);
    assert!(!timer.state().running);
}

#[test]
fn a_full_round_trip_leaves_counters_consistent() {
    let (mut meter, timer, pin) = reference_meter();
    setup_and_drain(&mut meter);

    for round in 1..=3 {
        meter.update();
        timer.latch(1_000);
        meter.on_capture();
        meter.on_overflow();

        assert_eq!(meter.mode(), Mode::Idle);
        assert_eq!(meter.period(), 1_000);
        assert_eq!(meter.value(), 228_800_000 / 1_000);
        assert_eq!(pin.state().charges, round);
        // Setup's discharge plus one per round.
        assert_eq!(pin.state().discharges, round + 1);
    }
}

#[test]
fn instant_capture_reports_the_sentinel() {
    let (mut meter, timer, _pin) = reference_meter();
    setup_and_drain(&mut meter);

    // A capture in the same instant the counter was cleared: the current
    // is too large to measure.
    meter.update();
    timer.latch(0);
    meter.on_capture();

    assert_eq!(meter.period(), 0);
    assert_eq!(meter.value(), u32::MAX);
}

#[test]
fn free_returns_the_hardware() {
    let (meter, timer, _pin) = reference_meter();
    let (freed_timer, _freed_pin) = meter.free();
    freed_timer.latch(7);
    assert_eq!(timer.state().capture, 7);
}
