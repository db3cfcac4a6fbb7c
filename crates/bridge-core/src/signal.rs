//! External bus line model and the two-stage input synchronizer.
//!
//! The external bus drives the bridge asynchronously; every line is
//! re-registered through two flip-flop stages before any downstream
//! logic branches on it. Branching on an unregistered line would race
//! address settling against strobe assertion, so raw [`BusLines`]
//! values never reach the cycle decoder directly.

/// Mask selecting the 3 significant address bits.
pub const ADDR_MASK: u8 = 0x07;

/// Snapshot of the externally driven bus line levels for one clock.
///
/// The strobes carry the physical line level: `ior_n`/`iow_n` are
/// active low, so `false` means the strobe is asserted and `true`
/// means it is released. `data` is the level the external master
/// drives onto the shared data lines; it is meaningful only while the
/// bridge's own output driver is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BusLines {
    /// Address lines, 3 significant bits.
    pub addr: u8,
    /// Externally driven data line level.
    pub data: u8,
    /// Chip select, active high.
    pub cs: bool,
    /// Read strobe line level (active low).
    pub ior_n: bool,
    /// Write strobe line level (active low).
    pub iow_n: bool,
    /// First interrupt line, sampled but not acted upon.
    pub irq: bool,
    /// Second interrupt line, sampled but not acted upon.
    pub irq2: bool,
}

impl Default for BusLines {
    /// Idle bus: chip select low, both strobes released.
    fn default() -> Self {
        Self {
            addr: 0,
            data: 0,
            cs: false,
            ior_n: true,
            iow_n: true,
            irq: false,
            irq2: false,
        }
    }
}

impl BusLines {
    /// Returns the line levels with multi-bit fields masked to width.
    #[must_use]
    pub const fn masked(self) -> Self {
        Self {
            addr: self.addr & ADDR_MASK,
            ..self
        }
    }
}

/// Two-stage register synchronizer for every external input line.
///
/// Each call to [`SignalSampler::sample`] models one clock edge: the
/// raw lines enter the first stage, the first stage shifts into the
/// second, and the previous second-stage value becomes the
/// synchronized view. Downstream logic therefore only ever observes
/// levels that are at least two clocks old and stable for a full
/// clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SignalSampler {
    stage1: BusLines,
    stage2: BusLines,
}

impl SignalSampler {
    /// Creates a sampler whose pipeline is filled with idle-bus levels.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shifts the synchronizer one clock and returns the synchronized
    /// line levels for this tick.
    #[allow(clippy::missing_const_for_fn)]
    pub fn sample(&mut self, raw: BusLines) -> BusLines {
        let synced = self.stage2;
        self.stage2 = self.stage1;
        self.stage1 = raw.masked();
        synced
    }

    /// Restores the pipeline to idle-bus levels.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::{BusLines, SignalSampler, ADDR_MASK};

    fn read_request(addr: u8) -> BusLines {
        BusLines {
            addr,
            cs: true,
            ior_n: false,
            ..BusLines::default()
        }
    }

    #[test]
    fn default_lines_are_idle() {
        let lines = BusLines::default();
        assert!(!lines.cs);
        assert!(lines.ior_n);
        assert!(lines.iow_n);
    }

    #[test]
    fn sample_delays_lines_by_two_clocks() {
        let mut sampler = SignalSampler::new();
        let raw = read_request(0b101);

        let t0 = sampler.sample(raw);
        let t1 = sampler.sample(raw);
        let t2 = sampler.sample(raw);

        assert_eq!(t0, BusLines::default());
        assert_eq!(t1, BusLines::default());
        assert_eq!(t2, raw);
    }

    #[test]
    fn sample_masks_address_width_at_pipeline_input() {
        let mut sampler = SignalSampler::new();
        let raw = read_request(0xFF);

        sampler.sample(raw);
        sampler.sample(raw);
        let synced = sampler.sample(raw);

        assert_eq!(synced.addr, ADDR_MASK);
    }

    #[test]
    fn reset_refills_pipeline_with_idle_levels() {
        let mut sampler = SignalSampler::new();
        sampler.sample(read_request(0b010));
        sampler.reset();

        assert_eq!(sampler.sample(BusLines::default()), BusLines::default());
        assert_eq!(sampler.sample(BusLines::default()), BusLines::default());
    }

    #[test]
    fn interrupt_lines_pass_through_the_pipeline() {
        let mut sampler = SignalSampler::new();
        let raw = BusLines {
            irq: true,
            irq2: true,
            ..BusLines::default()
        };

        sampler.sample(raw);
        sampler.sample(raw);
        let synced = sampler.sample(raw);

        assert!(synced.irq);
        assert!(synced.irq2);
    }
}
