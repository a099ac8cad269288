use std::f64::consts::{LN_2, PI};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Biquad Filter Section
=====================

A biquad is a second-order recursive filter: two zeros and two poles. Every
higher-order filter in this crate is built by chaining biquads, so this is the
one place where the filter math lives.

Vocabulary
----------

  coefficients  Five numbers (b0, b1, b2, a1, a2) that fully describe the
                filter's response. They are derived from the filter type,
                cutoff, Q and sample rate, and normalised so that a0 = 1.

  history       The previous two inputs (x1, x2) and outputs (y1, y2). This is
                the filter's memory and must survive between render blocks,
                otherwise every block boundary would click.

  Q             How sharp the filter is around its cutoff. 0.707 is the
                flattest lowpass (Butterworth). Larger values ring.

  bandwidth     An alternative to Q for band-shaped filters, measured in
                octaves between the -3 dB points.


The Difference Equation (Direct Form I)
---------------------------------------

    y[n] = b0·x[n] + b1·x[n-1] + b2·x[n-2] - a1·y[n-1] - a2·y[n-2]

Coefficients come from the Audio EQ Cookbook (Robert Bristow-Johnson):

    w0    = 2π · cutoff / sample_rate
    alpha = sin(w0) / (2Q)                                  (Q mode)
    alpha = sin(w0) · sinh(ln2/2 · bw · w0 / sin(w0))       (bandwidth mode)


Degenerate Designs
------------------

A cutoff at or above Nyquist has no digital equivalent. Rather than produce
NaN coefficients, the design collapses to the identity (y = x). Callers that
care about the response clamp the cutoff below Nyquist before designing.
*/

/// Response shape of a biquad section.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiquadType {
    LowPass,
    HighPass,
    /// Constant skirt gain, peak gain = Q.
    BandPassSkirt,
    /// Constant 0 dB peak gain.
    BandPassPeak,
    Notch,
    AllPass,
    Peaking,
    LowShelf,
    HighShelf,
}

/// Normalised biquad coefficients (a0 already divided out).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoeffs {
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
    pub a1: f32,
    pub a2: f32,
}

impl BiquadCoeffs {
    /// Pass-through filter.
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// Design a section from its specification.
    ///
    /// `q_is_bandwidth` selects whether `q` is a classic Q factor or a
    /// bandwidth in octaves. `gain_db` is only used by the peaking and shelf
    /// responses. Invalid input (cutoff outside (0, Nyquist), non-positive Q
    /// or sample rate, non-finite values) yields [`BiquadCoeffs::IDENTITY`].
    pub fn design(
        kind: BiquadType,
        cutoff: f32,
        sample_rate: f32,
        q: f32,
        gain_db: f32,
        q_is_bandwidth: bool,
    ) -> Self {
        let cutoff = cutoff as f64;
        let sample_rate = sample_rate as f64;
        let q = q as f64;
        let gain_db = gain_db as f64;

        let valid = cutoff.is_finite()
            && sample_rate.is_finite()
            && q.is_finite()
            && gain_db.is_finite()
            && sample_rate > 0.0
            && cutoff > 0.0
            && cutoff < sample_rate * 0.5
            && q > 0.0;
        if !valid {
            return Self::IDENTITY;
        }

        let w0 = 2.0 * PI * cutoff / sample_rate;
        let sin_w0 = w0.sin();
        let cos_w0 = w0.cos();
        let alpha = if q_is_bandwidth {
            sin_w0 * (LN_2 / 2.0 * q * w0 / sin_w0).sinh()
        } else {
            sin_w0 / (2.0 * q)
        };

        let (b0, b1, b2, a0, a1, a2) = match kind {
            BiquadType::LowPass => {
                let b1 = 1.0 - cos_w0;
                (b1 / 2.0, b1, b1 / 2.0, 1.0 + alpha, -2.0 * cos_w0, 1.0 - alpha)
            }
            BiquadType::HighPass => {
                let b0 = (1.0 + cos_w0) / 2.0;
                (b0, -(1.0 + cos_w0), b0, 1.0 + alpha, -2.0 * cos_w0, 1.0 - alpha)
            }
            BiquadType::BandPassSkirt => {
                let b0 = sin_w0 / 2.0;
                (b0, 0.0, -b0, 1.0 + alpha, -2.0 * cos_w0, 1.0 - alpha)
            }
            BiquadType::BandPassPeak => {
                (alpha, 0.0, -alpha, 1.0 + alpha, -2.0 * cos_w0, 1.0 - alpha)
            }
            BiquadType::Notch => (
                1.0,
                -2.0 * cos_w0,
                1.0,
                1.0 + alpha,
                -2.0 * cos_w0,
                1.0 - alpha,
            ),
            BiquadType::AllPass => (
                1.0 - alpha,
                -2.0 * cos_w0,
                1.0 + alpha,
                1.0 + alpha,
                -2.0 * cos_w0,
                1.0 - alpha,
            ),
            BiquadType::Peaking => {
                let a = 10.0_f64.powf(gain_db / 40.0);
                (
                    1.0 + alpha * a,
                    -2.0 * cos_w0,
                    1.0 - alpha * a,
                    1.0 + alpha / a,
                    -2.0 * cos_w0,
                    1.0 - alpha / a,
                )
            }
            BiquadType::LowShelf => {
                let a = 10.0_f64.powf(gain_db / 40.0);
                let beta = 2.0 * a.sqrt() * alpha;
                (
                    a * ((a + 1.0) - (a - 1.0) * cos_w0 + beta),
                    2.0 * a * ((a - 1.0) - (a + 1.0) * cos_w0),
                    a * ((a + 1.0) - (a - 1.0) * cos_w0 - beta),
                    (a + 1.0) + (a - 1.0) * cos_w0 + beta,
                    -2.0 * ((a - 1.0) + (a + 1.0) * cos_w0),
                    (a + 1.0) + (a - 1.0) * cos_w0 - beta,
                )
            }
            BiquadType::HighShelf => {
                let a = 10.0_f64.powf(gain_db / 40.0);
                let beta = 2.0 * a.sqrt() * alpha;
                (
                    a * ((a + 1.0) + (a - 1.0) * cos_w0 + beta),
                    -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_w0),
                    a * ((a + 1.0) + (a - 1.0) * cos_w0 - beta),
                    (a + 1.0) - (a - 1.0) * cos_w0 + beta,
                    2.0 * ((a - 1.0) - (a + 1.0) * cos_w0),
                    (a + 1.0) - (a - 1.0) * cos_w0 - beta,
                )
            }
        };

        if a0.abs() < f64::EPSILON {
            return Self::IDENTITY;
        }

        Self {
            b0: (b0 / a0) as f32,
            b1: (b1 / a0) as f32,
            b2: (b2 / a0) as f32,
            a1: (a1 / a0) as f32,
            a2: (a2 / a0) as f32,
        }
    }
}

impl Default for BiquadCoeffs {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// One second-order section with its own history.
#[derive(Debug, Clone, Copy)]
pub struct Biquad {
    coeffs: BiquadCoeffs,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    pub fn new() -> Self {
        Self {
            coeffs: BiquadCoeffs::IDENTITY,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Recompute coefficients in place. History is kept so the change is
    /// continuous.
    pub fn calc_filter_coeffs(
        &mut self,
        kind: BiquadType,
        cutoff: f32,
        sample_rate: f32,
        q: f32,
        gain_db: f32,
        q_is_bandwidth: bool,
    ) {
        self.coeffs = BiquadCoeffs::design(kind, cutoff, sample_rate, q, gain_db, q_is_bandwidth);
    }

    pub fn set_coeffs(&mut self, coeffs: BiquadCoeffs) {
        self.coeffs = coeffs;
    }

    pub fn coeffs(&self) -> BiquadCoeffs {
        self.coeffs
    }

    #[inline]
    pub fn run(&mut self, x: f32) -> f32 {
        let c = &self.coeffs;
        let y = c.b0 * x + c.b1 * self.x1 + c.b2 * self.x2 - c.a1 * self.y1 - c.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        // Flush denormals
        self.y1 = if y.abs() < 1.0e-20 { 0.0 } else { y };

        self.y1
    }

    /// Clear the history. Coefficients are left alone.
    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}

/// `N` biquads in series.
///
/// Stages may share one design ([`BiquadCascade::set_coeffs`]) or be tuned
/// individually through [`BiquadCascade::stage_mut`].
#[derive(Debug, Clone)]
pub struct BiquadCascade<const N: usize> {
    stages: [Biquad; N],
}

impl<const N: usize> BiquadCascade<N> {
    pub fn new() -> Self {
        Self {
            stages: [Biquad::new(); N],
        }
    }

    /// Copy one design into every stage.
    pub fn set_coeffs(&mut self, coeffs: BiquadCoeffs) {
        for stage in &mut self.stages {
            stage.set_coeffs(coeffs);
        }
    }

    pub fn stage(&self, index: usize) -> Option<&Biquad> {
        self.stages.get(index)
    }

    pub fn stage_mut(&mut self, index: usize) -> Option<&mut Biquad> {
        self.stages.get_mut(index)
    }

    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Run a sample through all stages.
    #[inline]
    pub fn run(&mut self, x: f32) -> f32 {
        self.stages.iter_mut().fold(x, |acc, stage| stage.run(acc))
    }

    /// Run a sample through the first `active` stages only. The remaining
    /// stages are bypassed and their history is left as is.
    #[inline]
    pub fn run_active(&mut self, x: f32, active: usize) -> f32 {
        let active = active.min(N);
        self.stages[..active]
            .iter_mut()
            .fold(x, |acc, stage| stage.run(acc))
    }

    pub fn reset(&mut self) {
        for stage in &mut self.stages {
            stage.reset();
        }
    }
}

impl<const N: usize> Default for BiquadCascade<N> {
    fn default() -> Self {
        Self::new()
    }
}
