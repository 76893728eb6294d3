//! Sense pin and comparator trigger control.
//!
//! The capacitor's high side is connected to the current source and to the
//! comparator input. Switching the pin between high-impedance input and
//! driven-low output selects between charging through the measured current
//! and actively draining the capacitor.

/// Implemented by the pin shared between the capacitor and the comparator.
pub trait SensePin {
    /// One-time setup: disables the pin's digital input buffer, since the
    /// pin is used in analog mode.
    fn disable_digital_input(&mut self);

    /// Places the pin in a high-impedance state so that the external
    /// current charges the capacitor.
    fn charge(&mut self);

    /// Drives the pin low to drain the capacitor.
    fn discharge(&mut self);

    /// Lets a comparator transition latch the timer's capture register.
    fn enable_capture_trigger(&mut self);

    /// Stops comparator transitions from producing capture events.
    fn disable_capture_trigger(&mut self);
}
