//! Hardware timing interface for the measurement clock.
//!
//! The engine needs exclusive use of one free-running hardware timer with an
//! input-capture unit wired to the analog comparator. The counter is assumed
//! to be 16 bits wide and to tick once per system clock cycle while started;
//! the engine maintains the upper half of a simulated 32-bit counter in
//! software from the overflow events.

/// Implemented by the hardware timer driving a measurement.
///
/// The platform must deliver the timer's overflow event and the comparator's
/// capture event to [`CurrentMeter::on_overflow`] and
/// [`CurrentMeter::on_capture`] respectively, typically from the two
/// interrupt vectors of the timer.
///
/// [`CurrentMeter::on_overflow`]: crate::meter::CurrentMeter::on_overflow
/// [`CurrentMeter::on_capture`]: crate::meter::CurrentMeter::on_capture
pub trait Instance {
    /// Starts the counter with a prescaler of 1, one tick per clock cycle.
    fn start(&mut self);

    /// Halts the counter.
    fn stop(&mut self);

    /// Clears any previous timer configuration and arms input capture on
    /// the rising edge of the comparator output.
    fn reset(&mut self);

    /// Loads the hardware counter register.
    fn set_counter(&mut self, low: u16);

    /// Returns the counter value latched at the most recent capture edge.
    fn capture(&mut self) -> u16;

    /// Enables delivery of the counter overflow event.
    fn enable_overflow_interrupt(&mut self);

    /// Enables delivery of the capture event.
    fn enable_capture_interrupt(&mut self);

    /// Disables delivery of the capture event.
    fn disable_capture_interrupt(&mut self);
}
