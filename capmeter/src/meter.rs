//! Charge/discharge measurement engine.
//!
//! A small current is estimated by letting it charge a known capacitor and
//! timing, to one clock cycle, how long the capacitor voltage takes to cross
//! the comparator's reference. The charge `Q = C * Vref` moved in a period
//! of `p` cycles at clock `f` corresponds to a current `I = C * Vref * f / p`.
//!
//! One measurement is a charge cycle followed by a fixed-length discharge
//! cycle that drains the capacitor for the next round. The engine is driven
//! entirely by the timer's two interrupt events plus a periodic [`update`]
//! call from the host loop; it never blocks and allocates nothing.
//!
//! [`update`]: CurrentMeter::update

use crate::sense::SensePin;
use crate::timer;
use crate::units::{Hertz, MicroSeconds, MilliVolts, PicoFarads, Seconds};

/// Physical constants of one measurement channel.
///
/// `new` fills in the reference design: a 1.3 nF capacitor against a 1.1 V
/// comparator reference, a 20 s measurement timeout and a 10 us discharge.
/// The fields are public and may be adjusted before the meter is built.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// System clock driving the timer, one tick per cycle.
    pub clock: Hertz,
    /// Comparator reference voltage.
    pub ref_voltage: MilliVolts,
    /// Capacitance charged through the measured current.
    pub capacitance: PicoFarads,
    /// Give up on a charge cycle after this long without a capture.
    pub timeout: Seconds,
    /// How long the capacitor is actively drained between cycles.
    pub discharge_time: MicroSeconds,
}

impl Config {
    /// Configuration for the reference design, running at the given clock.
    pub const fn new(clock: Hertz) -> Self {
        Self {
            clock,
            ref_voltage: MilliVolts(1_100),
            capacitance: PicoFarads(1_300),
            timeout: Seconds(20),
            discharge_time: MicroSeconds(10),
        }
    }

    /// The scale constant `K = C * Vref * f * 10`, such that a period of
    /// `p` cycles maps to a current of `K / p` in units of 0.1 nA.
    pub const fn charge_scale(&self) -> u64 {
        let k = self.capacitance.0 as u128 * self.ref_voltage.0 as u128 * self.clock.0 as u128
            * 10
            / 1_000_000;
        if k > u64::MAX as u128 {
            u64::MAX
        } else {
            k as u64
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The timeout threshold `clock * timeout / 65536` does not fit the
    /// 16-bit overflow counter.
    TimeoutOutOfRange,
    /// The discharge duration in clock cycles is zero or does not fit the
    /// 16-bit counter preload.
    DischargeOutOfRange,
}

/// Measurement state.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Between cycles; waiting for `update` to start the next one.
    Idle,
    /// The capacitor is charging through the measured current.
    Charging,
    /// The capacitor is being drained for a fixed duration.
    Discharging,
}

/// Converts a charge period in clock cycles into a current estimate in
/// units of 0.1 nA, given the scale constant from [`Config::charge_scale`].
///
/// A period of zero means the capacitor crossed the reference in the same
/// instant the counter was cleared; the current is too large to measure and
/// the maximum sentinel is returned. For nonzero periods the result is
/// strictly non-increasing in the period.
pub fn calculate_value(k: u64, period: u32) -> u32 {
    if period == 0 {
        return u32::MAX;
    }
    let value = k / period as u64;
    if value > u32::MAX as u64 {
        u32::MAX
    } else {
        value as u32
    }
}

/// The measurement engine: one capture timer, one sense pin, one channel.
///
/// Call [`setup`] exactly once, then [`update`] on every iteration of the
/// host loop; the engine runs one charge/discharge round per `update` from
/// idle and parks itself back in [`Mode::Idle`] when the round completes.
/// The two event entry points must be invoked from the timer's overflow and
/// capture interrupt vectors. Handlers of the same class are assumed never
/// to nest or overlap each other; the engine does not defend against
/// reentrancy the platform already excludes.
///
/// For reads of [`value`]/[`period`] from outside the handlers' context,
/// wrap the meter in a [`SharedMeter`](crate::shared::SharedMeter).
///
/// [`setup`]: CurrentMeter::setup
/// [`update`]: CurrentMeter::update
/// [`value`]: CurrentMeter::value
/// [`period`]: CurrentMeter::period
pub struct CurrentMeter<T, P> {
    timer: T,
    pin: P,
    k: u64,
    timeout_overflows: u16,
    discharge_preload: u16,
    mode: Mode,
    high_count: u16,
    period: u32,
    value: u32,
}

impl<T, P> CurrentMeter<T, P>
where
    T: timer::Instance,
    P: SensePin,
{
    /// Takes ownership of the timer and sense pin, returning an idle meter.
    ///
    /// Fails if the configured timeout or discharge duration cannot be
    /// represented in the 16-bit hardware counter.
    pub fn new(timer: T, pin: P, config: Config) -> Result<Self, Error> {
        let clock = config.clock.0 as u64;

        let timeout_overflows = clock * config.timeout.0 as u64 / 65_536;
        if timeout_overflows >= u16::MAX as u64 {
            return Err(Error::TimeoutOutOfRange);
        }

        let discharge_cycles = config.discharge_time.0 as u64 * clock / 1_000_000;
        if discharge_cycles == 0 || discharge_cycles > u16::MAX as u64 {
            return Err(Error::DischargeOutOfRange);
        }

        Ok(Self {
            timer,
            pin,
            k: config.charge_scale(),
            timeout_overflows: timeout_overflows as u16,
            discharge_preload: (discharge_cycles as u16).wrapping_neg(),
            mode: Mode::Idle,
            high_count: 0,
            period: 0,
            value: 0,
        })
    }

    /// One-time initialization.
    ///
    /// Configures the analog pin and the capture unit, enables both
    /// interrupt sources and starts a discharge cycle so that the capacitor
    /// is in a known, drained state before the first `update`.
    pub fn setup(&mut self) {
        self.pin.disable_digital_input();
        self.timer.reset();
        self.timer.enable_overflow_interrupt();
        self.timer.enable_capture_interrupt();
        self.start_discharge_cycle();
    }

    /// Starts a charge cycle, if one is not running already.
    ///
    /// Safe to call on every host loop iteration; does nothing, including
    /// no hardware access, unless the meter is idle.
    pub fn update(&mut self) {
        if self.mode == Mode::Idle {
            self.start_charge_cycle();
        }
    }

    /// Capture event entry point: the comparator saw the capacitor cross
    /// the reference while charging.
    pub fn on_capture(&mut self) {
        self.timer.stop();
        let low = self.timer.capture();
        self.period = (self.high_count as u32) << 16 | low as u32;
        self.value = calculate_value(self.k, self.period);
        self.start_discharge_cycle();
    }

    /// Overflow event entry point: the hardware counter wrapped.
    pub fn on_overflow(&mut self) {
        if self.mode == Mode::Discharging {
            // The preloaded counter reached zero: the capacitor is drained.
            // Stay off until the next update() call.
            self.timer.stop();
            self.mode = Mode::Idle;
        } else {
            self.high_count += 1;
            if self.high_count > self.timeout_overflows {
                // No capture within the timeout: report zero and retry.
                self.timer.stop();
                self.period = (self.high_count as u32) << 16;
                self.value = 0;
                self.start_discharge_cycle();
            } else {
                // The high word alone bounds the estimate from above at
                // this point of the cycle. Taking the bound when it is
                // lower keeps the response to a sudden drop in current
                // within one overflow period instead of the full timeout.
                let ceiling = calculate_value(self.k, (self.high_count as u32) << 16);
                if self.value > ceiling {
                    self.value = ceiling;
                }
            }
        }
    }

    /// The latest current estimate in units of 0.1 nA.
    ///
    /// `u32::MAX` is the "too large to measure" sentinel. Reading from
    /// outside the handlers' context must happen inside a critical section;
    /// see [`SharedMeter`](crate::shared::SharedMeter).
    pub fn value(&self) -> u32 {
        self.value
    }

    /// The cycle count of the most recent completed charge cycle.
    pub fn period(&self) -> u32 {
        self.period
    }

    /// The current measurement state.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Consumes `self` and returns back the timer and the sense pin.
    pub fn free(self) -> (T, P) {
        (self.timer, self.pin)
    }

    fn start_charge_cycle(&mut self) {
        self.timer.stop();
        self.mode = Mode::Charging;
        self.load_counter(0);
        self.pin.enable_capture_trigger();
        self.pin.charge();
        self.timer.start();
    }

    fn start_discharge_cycle(&mut self) {
        self.mode = Mode::Discharging;
        self.pin.discharge();
        // Preloaded so the counter overflows to zero exactly when the
        // discharge time is up.
        self.load_counter(self.discharge_preload as u32);
        self.pin.disable_capture_trigger();
        self.timer.start();
    }

    /// Loads the simulated 32-bit counter: the low word goes to the
    /// hardware register, the high word to the software counter.
    fn load_counter(&mut self, value: u32) {
        self.timer.set_counter(value as u16);
        self.high_count = (value >> 16) as u16;
    }
}
