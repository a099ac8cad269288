//! Block-rate one-pole smoother for control signals.

/*
Velocity Smoothing
==================

The tone filter's cutoff follows how hard the keys are played. Jumping the
cutoff straight to each new velocity would click, so the modulation signal
glides toward its target instead:

    coef  = exp(-block_len / (inertia · sample_rate))
    state = target + (state - target) · coef

`inertia` is the time constant in seconds: after `inertia` seconds the state
has covered ~63% of the distance. Zero inertia jumps straight to the target.

The smoother runs once per render block, not per sample. Its value is read
by every voice during that block, so all voices see the same cutoff.
*/

#[derive(Debug, Clone, Copy)]
pub struct VelocityFilter {
    state: f32,
    target: f32,
}

impl VelocityFilter {
    pub fn new() -> Self {
        Self {
            state: 0.0,
            target: 0.0,
        }
    }

    pub fn set_target(&mut self, target: f32) {
        if target.is_finite() {
            self.target = target;
        }
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Advance by `block_len` samples and return the new state.
    pub fn advance(&mut self, block_len: usize, inertia: f32, sample_rate: f32) -> f32 {
        let time_constant = inertia * sample_rate;
        if !(time_constant.is_finite() && time_constant > 0.0) {
            self.state = self.target;
            return self.state;
        }

        let coef = (-(block_len as f32) / time_constant).exp();
        self.state = self.target + (self.state - self.target) * coef;
        self.state
    }

    pub fn value(&self) -> f32 {
        self.state
    }

    /// Snap the state to a value without gliding.
    pub fn reset(&mut self, value: f32) {
        self.state = value;
        self.target = value;
    }
}

impl Default for VelocityFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;

    #[test]
    fn zero_inertia_jumps_to_target() {
        let mut filter = VelocityFilter::new();
        filter.set_target(0.8);
        assert_eq!(filter.advance(64, 0.0, SAMPLE_RATE), 0.8);
    }

    #[test]
    fn approaches_target_without_overshoot() {
        let mut filter = VelocityFilter::new();
        filter.set_target(1.0);

        let mut previous = filter.value();
        for _ in 0..200 {
            let value = filter.advance(128, 0.1, SAMPLE_RATE);
            assert!(value >= previous && value <= 1.0);
            previous = value;
        }
        assert!(previous > 0.99);
    }

    #[test]
    fn one_time_constant_covers_most_of_the_distance() {
        let mut filter = VelocityFilter::new();
        filter.set_target(1.0);

        // 0.1 s at 48 kHz
        filter.advance(4_800, 0.1, SAMPLE_RATE);
        let expected = 1.0 - (-1.0f32).exp();
        assert!((filter.value() - expected).abs() < 1e-4);
    }

    #[test]
    fn larger_inertia_is_slower() {
        let mut fast = VelocityFilter::new();
        let mut slow = VelocityFilter::new();
        fast.set_target(1.0);
        slow.set_target(1.0);

        fast.advance(512, 0.05, SAMPLE_RATE);
        slow.advance(512, 0.5, SAMPLE_RATE);

        assert!(fast.value() > slow.value());
    }

    #[test]
    fn non_finite_target_is_ignored() {
        let mut filter = VelocityFilter::new();
        filter.set_target(0.3);
        filter.set_target(f32::NAN);
        assert_eq!(filter.target(), 0.3);
    }
}
