#![cfg_attr(not(test), no_std)]

//! Capacitor-charge current metering.
//!
//! Measures a very small current (down to fractions of a nanoamp) by using
//! it to charge a known capacitor and timing, with a hardware timer's
//! input-capture unit, how long the capacitor voltage takes to reach an
//! analog comparator's reference. A controllable discharge path drains the
//! capacitor between measurements.
//!
//! The crate is hardware-agnostic: [`meter::CurrentMeter`] is generic over
//! a [`timer::Instance`] and a [`sense::SensePin`], implemented per
//! platform for the one timer/comparator pair wired to the sense pin. Set
//! the meter up once, call `update()` on it regularly from the host loop,
//! and route the timer's overflow and capture interrupts to the two event
//! entry points; some time after each `update()` (up to the configured
//! timeout), the value returned by `value()` is refreshed. For reading the
//! results from the main loop while the interrupt handlers run, put the
//! meter in a [`shared::SharedMeter`] static.
//!
//! Only one meter per timer/comparator pair makes sense; the engine assumes
//! exclusive use of both.

#[cfg(any(test, feature = "mock"))]
extern crate alloc;

pub mod meter;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod sense;
pub mod shared;
pub mod timer;
pub mod units;

pub mod prelude {
    pub use crate::sense::SensePin;
    pub use crate::timer::Instance;
    pub use crate::units::U32Ext;
}

pub use crate::meter::{calculate_value, Config, CurrentMeter, Error, Mode};
pub use crate::shared::SharedMeter;
