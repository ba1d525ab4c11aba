use defmt::Format;

/// Signed 16-bit digital integrator.
/// Saturates at ±32767 instead of wrapping, it is the only overflow protection on the 16-bit signal path.
#[derive(Format, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Integrator(i16);

impl Integrator {
    pub const fn new(level: i16) -> Self {
        Self(level)
    }

    pub fn feed(&mut self, x: i16) -> i16 {
        self.0 = self.0.saturating_add(x).max(-i16::MAX);
        self.0
    }

    pub fn level(&self) -> i16 {
        self.0
    }

    pub fn reset(&mut self) {
        self.0 = 0;
    }
}

/// One-pole low-pass filter built on a leaky [`Integrator`].
///
/// The integrator holds the output with 8 fractional bits:
///
/// ```text
/// integrator += clamp(k * (x - integrator / 256))
/// y = integrator / 256
/// ```
///
/// `k` sets the cutoff, 0 freezes the output and larger values track the input faster.
#[derive(Format, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OnePoleFilter {
    integrator: Integrator,
}

impl OnePoleFilter {
    pub const fn new() -> Self {
        Self {
            integrator: Integrator::new(0),
        }
    }

    pub fn feed(&mut self, k: i8, x: i8) -> i8 {
        let error = x as i32 - self.output() as i32;
        let drive = (error * k as i32).clamp(i16::MIN as i32, i16::MAX as i32) as i16;

        self.integrator.feed(drive);
        self.output()
    }

    /// Integrator level scaled down to the signal range, truncated towards zero
    pub fn output(&self) -> i8 {
        (self.integrator.level() / 256) as i8
    }

    pub fn integrator(&self) -> Integrator {
        self.integrator
    }

    pub fn reset(&mut self) {
        self.integrator.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn integrator_saturates_high() {
        let mut integrator = Integrator::new(i16::MAX - 10);

        assert_eq!(integrator.feed(100), i16::MAX);
        assert_eq!(integrator.feed(i16::MAX), i16::MAX);
    }

    #[test]
    fn integrator_saturates_low() {
        let mut integrator = Integrator::new(-i16::MAX + 10);

        assert_eq!(integrator.feed(-100), -i16::MAX);
        assert_eq!(integrator.feed(i16::MIN), -i16::MAX);
    }

    #[test]
    fn integrator_recovers_from_saturation() {
        let mut integrator = Integrator::new(i16::MAX);

        assert_eq!(integrator.feed(-1), i16::MAX - 1);
    }

    #[test]
    fn filter_rises_towards_constant_input() {
        let mut filter = OnePoleFilter::new();

        let mut previous = filter.output();
        for _ in 0..20 {
            let output = filter.feed(64, 100);
            assert!(output >= previous);
            assert!(output <= 100);
            previous = output;
        }

        // k = 64 closes a quarter of the gap per step
        for _ in 0..200 {
            filter.feed(64, 100);
        }
        assert!((96..=100).contains(&filter.output()));
    }

    #[test]
    fn filter_falls_towards_negative_input() {
        let mut filter = OnePoleFilter::new();

        for _ in 0..200 {
            filter.feed(64, -100);
        }

        assert!((-100..=-96).contains(&filter.output()));
    }

    #[test]
    fn first_step_matches_integrator_formula() {
        let mut filter = OnePoleFilter::new();

        // integrator = 0 + 64 * (100 - 0) = 6400, y = 6400 / 256
        assert_eq!(filter.feed(64, 100), 25);
        assert_eq!(filter.integrator(), Integrator::new(6400));

        // integrator = 6400 + 64 * (100 - 25) = 11200, y = 43
        assert_eq!(filter.feed(64, 100), 43);
    }

    #[test]
    fn output_truncates_towards_zero() {
        let mut filter = OnePoleFilter::new();

        // integrator = 1 * (-1 - 0) = -1, -1 / 256 = 0
        assert_eq!(filter.feed(1, -1), 0);
        assert_eq!(filter.integrator().level(), -1);
    }

    #[test]
    fn zero_coefficient_freezes_output() {
        let mut filter = OnePoleFilter::new();
        filter.feed(64, 100);
        let frozen = filter.output();

        for x in [-128, 0, 127] {
            assert_eq!(filter.feed(0, x), frozen);
        }
    }

    #[test]
    fn large_drive_saturates_instead_of_wrapping() {
        let mut filter = OnePoleFilter::new();

        // 127 * 127 = 16129 per step, wrapping would flip the sign
        for _ in 0..4 {
            filter.feed(127, 127);
        }
        assert!(filter.output() > 0);

        let mut filter = OnePoleFilter::new();
        for _ in 0..4 {
            filter.feed(-128, 127);
        }
        assert!(filter.output() <= 0);
    }

    #[test]
    fn reset_clears_state() {
        let mut filter = OnePoleFilter::new();
        filter.feed(64, 100);

        filter.reset();

        assert_eq!(filter, OnePoleFilter::default());
    }
}
