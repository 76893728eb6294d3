//! Sharing a meter between the main loop and the interrupt handlers.
//!
//! The estimate and the period are wider than the platform's atomic write
//! unit, so a read from main-loop context must not race a handler's write.
//! [`SharedMeter`] holds the meter behind a `critical_section::Mutex`; every
//! access runs inside a scoped critical section that is released as soon as
//! the closure returns. On single-core Cortex-M targets the usual provider
//! of that critical section is the `cortex-m` crate's
//! `critical-section-single-core` feature; host tests use the `std`
//! implementation instead.
//!
//! Writes performed inside a handler need no further locking: handlers of
//! the same class never overlap, and the main loop only mutates the meter
//! through the forwarders here.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::meter::CurrentMeter;
use crate::sense::SensePin;
use crate::timer;

/// A meter slot that can live in a `static` and be reached from both the
/// main loop and the interrupt handlers.
///
/// Create the static with [`new`], build the meter at startup and move it
/// in with [`install`], then call [`update`] from the host loop and the two
/// event forwarders from the interrupt vectors.
///
/// [`new`]: SharedMeter::new
/// [`install`]: SharedMeter::install
/// [`update`]: SharedMeter::update
pub struct SharedMeter<T, P> {
    inner: Mutex<RefCell<Option<CurrentMeter<T, P>>>>,
}

impl<T, P> SharedMeter<T, P>
where
    T: timer::Instance,
    P: SensePin,
{
    /// An empty slot.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Moves a meter into the slot, replacing any previous one.
    pub fn install(&self, meter: CurrentMeter<T, P>) {
        critical_section::with(|cs| {
            self.inner.borrow_ref_mut(cs).replace(meter);
        });
    }

    /// Runs `f` on the installed meter inside a critical section.
    pub fn with<R>(&self, f: impl FnOnce(&mut CurrentMeter<T, P>) -> R) -> Option<R> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).as_mut().map(f))
    }

    /// Atomic snapshot of the current estimate in units of 0.1 nA.
    ///
    /// Zero until a meter has been installed.
    pub fn value(&self) -> u32 {
        self.with(|meter| meter.value()).unwrap_or(0)
    }

    /// Atomic snapshot of the most recent charge-cycle length.
    pub fn period(&self) -> u32 {
        self.with(|meter| meter.period()).unwrap_or(0)
    }

    /// Forwarder for the host loop's periodic tick.
    pub fn update(&self) {
        self.with(|meter| meter.update());
    }

    /// Forwarder for the timer overflow interrupt vector.
    pub fn on_overflow(&self) {
        self.with(|meter| meter.on_overflow());
    }

    /// Forwarder for the capture interrupt vector.
    pub fn on_capture(&self) {
        self.with(|meter| meter.on_capture());
    }
}
