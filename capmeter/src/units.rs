//! Units for clock rates and physical constants.

/// Hertz.
#[derive(Debug, Clone, Copy)]
pub struct Hertz(pub u32);

/// MegaHertz.
#[derive(Debug, Clone, Copy)]
pub struct MegaHertz(pub u32);

/// Seconds.
#[derive(Debug, Clone, Copy)]
pub struct Seconds(pub u32);

/// Microseconds.
#[derive(Debug, Clone, Copy)]
pub struct MicroSeconds(pub u32);

/// Millivolts.
#[derive(Debug, Clone, Copy)]
pub struct MilliVolts(pub u32);

/// Picofarads.
#[derive(Debug, Clone, Copy)]
pub struct PicoFarads(pub u32);

/// Extension trait that adds convenience methods to the `u32` type.
pub trait U32Ext {
    /// Wrap in `Hertz`.
    fn hz(self) -> Hertz;

    /// Wrap in `MegaHertz`.
    fn mhz(self) -> MegaHertz;

    /// Wrap in `Seconds`.
    fn secs(self) -> Seconds;

    /// Wrap in `MicroSeconds`.
    fn us(self) -> MicroSeconds;

    /// Wrap in `MilliVolts`.
    fn mv(self) -> MilliVolts;

    /// Wrap in `PicoFarads`.
    fn pf(self) -> PicoFarads;
}

impl U32Ext for u32 {
    fn hz(self) -> Hertz {
        Hertz(self)
    }

    fn mhz(self) -> MegaHertz {
        MegaHertz(self)
    }

    fn secs(self) -> Seconds {
        Seconds(self)
    }

    fn us(self) -> MicroSeconds {
        MicroSeconds(self)
    }

    fn mv(self) -> MilliVolts {
        MilliVolts(self)
    }

    fn pf(self) -> PicoFarads {
        PicoFarads(self)
    }
}

impl From<MegaHertz> for Hertz {
    fn from(val: MegaHertz) -> Self {
        Hertz(val.0 * 1_000_000)
    }
}

impl From<Seconds> for MicroSeconds {
    fn from(val: Seconds) -> Self {
        MicroSeconds(val.0 * 1_000_000)
    }
}
