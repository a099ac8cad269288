//! Master gain and soft limiting.

/*
Output Stage
============

After all voices are summed, the buffer goes through:

    y = clip · tanh(gain · x / clip)

`gain` is a plain linear multiplier. `clip` is the ceiling: tanh saturates
smoothly toward ±1, so the output approaches ±clip but never crosses it.
Quiet signals pass nearly unchanged (tanh(x) ≈ x for small x), loud chords
round off instead of wrapping or hard-clipping at the converter.
*/

/// Smallest accepted ceiling.
pub const MIN_CLIP: f32 = 1.0e-3;

/// Soft-limit a single sample to ±`ceiling`.
#[inline]
pub fn soft_clip(sample: f32, ceiling: f32) -> f32 {
    let ceiling = ceiling.max(MIN_CLIP);
    ceiling * (sample / ceiling).tanh()
}

/// Apply master gain and the soft limiter in place.
pub fn apply_gain_clip(buffer: &mut [f32], gain: f32, ceiling: f32) {
    for sample in buffer.iter_mut() {
        let driven = *sample * gain;
        *sample = if driven.is_finite() {
            soft_clip(driven, ceiling)
        } else {
            0.0
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_never_exceeds_ceiling() {
        let mut buffer: Vec<f32> = (-100..=100).map(|i| i as f32 * 0.5).collect();
        apply_gain_clip(&mut buffer, 2.0, 0.8);
        assert!(buffer.iter().all(|s| s.abs() <= 0.8));
    }

    #[test]
    fn quiet_signals_pass_nearly_unchanged() {
        let mut buffer = vec![0.01, -0.02, 0.005];
        apply_gain_clip(&mut buffer, 1.0, 1.0);
        assert!((buffer[0] - 0.01).abs() < 1e-5);
        assert!((buffer[1] + 0.02).abs() < 1e-5);
    }

    #[test]
    fn gain_scales_before_clipping() {
        let mut buffer = vec![0.01];
        apply_gain_clip(&mut buffer, 0.5, 1.0);
        assert!((buffer[0] - 0.005).abs() < 1e-6);
    }

    #[test]
    fn non_finite_input_becomes_silence() {
        let mut buffer = vec![f32::NAN, f32::INFINITY];
        apply_gain_clip(&mut buffer, 1.0, 1.0);
        assert_eq!(buffer, vec![0.0, 0.0]);
    }

    #[test]
    fn tiny_ceiling_is_floored() {
        assert!(soft_clip(1.0, 0.0).abs() <= MIN_CLIP);
    }
}
