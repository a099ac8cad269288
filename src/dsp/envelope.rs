/*
ADSR Envelope Implementation
============================

A linear attack/decay/sustain/release amplitude envelope, one per voice.

Vocabulary
----------

  level       The envelope's current output value (0.0 to 1.0). This multiplies
              the voice's signal to shape its amplitude over time.

  stage       Which phase of the envelope we're in: Idle, Attack, Decay,
              Sustain, or Release.

  gate        note_on starts Attack from zero; note_off starts Release from
              wherever the level currently is.


The Shape
---------

  Level
    1.0 ┐     ╱╲
        │    ╱  ╲___________
    S   │   ╱               ╲
        │  ╱                 ╲
    0.0 └─╱───────────────────╲──→ Time
        Attack Decay  Sustain  Release


Stage Timing
------------

Each ramp is stored as a whole number of samples and interpolated from the
level the stage started at:

    level = start + (target - start) · elapsed / total

Each ramp ends exactly on its target. A zero-length stage (`total == 0`)
finishes on the very next sample.

Timing is captured from the parameters when the note starts. A note already
sounding keeps its shape even if the knobs move.
*/

/// The current stage of the envelope state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,    // Gate low, envelope inactive, level = 0
    Attack,  // Gate just went high, ramping up to 1.0
    Decay,   // Reached peak, ramping down to sustain level
    Sustain, // Holding at sustain level while gate is high
    Release, // Gate went low, ramping down to 0
}

pub struct Envelope {
    attack_samples: u32,
    decay_samples: u32,
    sustain_level: f32,
    release_samples: u32,

    stage: EnvelopeState,
    level: f32,

    stage_start_level: f32,
    stage_elapsed: u32,
}

fn seconds_to_samples(seconds: f32, sample_rate: f32) -> u32 {
    let samples = seconds * sample_rate;
    if samples.is_finite() && samples > 0.0 {
        samples.round().min(u32::MAX as f32) as u32
    } else {
        0
    }
}

impl Envelope {
    pub fn new() -> Self {
        Self {
            attack_samples: 0,
            decay_samples: 0,
            sustain_level: 1.0,
            release_samples: 0,

            stage: EnvelopeState::Idle,
            level: 0.0,
            stage_start_level: 0.0,
            stage_elapsed: 0,
        }
    }

    /// Configure stage times (seconds) and sustain level (0..1).
    pub fn set_adsr(
        &mut self,
        sample_rate: f32,
        attack: f32,
        decay: f32,
        sustain: f32,
        release: f32,
    ) {
        self.attack_samples = seconds_to_samples(attack, sample_rate);
        self.decay_samples = seconds_to_samples(decay, sample_rate);
        self.sustain_level = if sustain.is_finite() {
            sustain.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.release_samples = seconds_to_samples(release, sample_rate);
    }

    /// Gate high: start the attack from zero.
    pub fn note_on(&mut self) {
        self.level = 0.0;
        self.enter(EnvelopeState::Attack);
    }

    /// Gate low: start the release from the current level.
    pub fn note_off(&mut self) {
        if matches!(self.stage, EnvelopeState::Idle | EnvelopeState::Release) {
            return;
        }
        self.enter(EnvelopeState::Release);
    }

    /// Advance by one sample and return the new level.
    pub fn next_sample(&mut self) -> f32 {
        match self.stage {
            EnvelopeState::Idle => {
                self.level = 0.0;
            }
            EnvelopeState::Attack => {
                if self.ramp(self.attack_samples, 1.0) {
                    self.enter(EnvelopeState::Decay);
                }
            }
            EnvelopeState::Decay => {
                if self.ramp(self.decay_samples, self.sustain_level) {
                    self.enter(EnvelopeState::Sustain);
                }
            }
            EnvelopeState::Sustain => {
                self.level = self.sustain_level;
            }
            EnvelopeState::Release => {
                if self.ramp(self.release_samples, 0.0) {
                    self.level = 0.0;
                    self.enter(EnvelopeState::Idle);
                }
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
        self.level
    }

    /// Render a block of envelope values into the buffer.
    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }

    /// Returns true if the envelope is producing output (not idle).
    pub fn is_active(&self) -> bool {
        !matches!(self.stage, EnvelopeState::Idle)
    }

    /// Cut to silence immediately.
    pub fn reset(&mut self) {
        self.level = 0.0;
        self.enter(EnvelopeState::Idle);
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn state(&self) -> EnvelopeState {
        self.stage
    }

    fn enter(&mut self, stage: EnvelopeState) {
        self.stage = stage;
        self.stage_start_level = self.level;
        self.stage_elapsed = 0;
    }

    /// Step one sample along the current ramp. Returns true when the ramp is
    /// done, with `level` sitting exactly on `target`.
    #[inline]
    fn ramp(&mut self, total: u32, target: f32) -> bool {
        self.stage_elapsed = self.stage_elapsed.saturating_add(1);
        if self.stage_elapsed >= total {
            self.level = target;
            return true;
        }

        let progress = self.stage_elapsed as f32 / total as f32;
        self.level = (self.stage_start_level + (target - self.stage_start_level) * progress)
            .clamp(0.0, 1.0);
        false
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 1_000.0;

    fn envelope(attack: f32, decay: f32, sustain: f32, release: f32) -> Envelope {
        let mut env = Envelope::new();
        env.set_adsr(SAMPLE_RATE, attack, decay, sustain, release);
        env
    }

    fn render_samples(env: &mut Envelope, samples: usize) -> Vec<(EnvelopeState, f32)> {
        (0..samples)
            .map(|_| {
                let stage = env.state();
                (stage, env.next_sample())
            })
            .collect()
    }

    #[test]
    fn attack_reaches_full_level() {
        let mut env = envelope(0.01, 0.1, 0.7, 0.2);

        env.note_on();
        render_samples(&mut env, 10);

        assert_eq!(env.level(), 1.0);
        assert_eq!(env.state(), EnvelopeState::Decay);
    }

    #[test]
    fn zero_attack_is_full_on_first_sample() {
        let mut env = envelope(0.0, 0.1, 0.5, 0.1);

        env.note_on();
        assert_eq!(env.next_sample(), 1.0);
    }

    #[test]
    fn zero_length_stages_do_not_produce_nan() {
        let mut env = envelope(0.0, 0.0, 0.4, 0.0);

        env.note_on();
        let levels = render_samples(&mut env, 4);
        assert!(levels.iter().all(|(_, l)| l.is_finite()));
        assert_eq!(env.state(), EnvelopeState::Sustain);
        assert_eq!(env.level(), 0.4);

        env.note_off();
        assert_eq!(env.next_sample(), 0.0);
        assert_eq!(env.state(), EnvelopeState::Idle);
    }

    #[test]
    fn sustain_holds_target_level() {
        let sustain = 0.6;
        let mut env = envelope(0.01, 0.05, sustain, 0.2);

        env.note_on();
        render_samples(&mut env, 60);

        assert_eq!(env.state(), EnvelopeState::Sustain);
        let held = render_samples(&mut env, 500);
        assert!(held.iter().all(|&(_, l)| l == sustain));
    }

    #[test]
    fn stages_are_monotonic_and_bounded() {
        let mut env = envelope(0.02, 0.03, 0.3, 0.04);

        env.note_on();
        let mut trace = render_samples(&mut env, 80);
        env.note_off();
        trace.extend(render_samples(&mut env, 60));

        for pair in trace.windows(2) {
            let (stage, prev) = pair[0];
            let (next_stage, next) = pair[1];
            assert!((0.0..=1.0).contains(&next));
            if stage != next_stage {
                continue;
            }
            match next_stage {
                EnvelopeState::Attack => assert!(next >= prev),
                EnvelopeState::Decay | EnvelopeState::Release => assert!(next <= prev),
                EnvelopeState::Sustain => assert_eq!(next, prev),
                EnvelopeState::Idle => assert_eq!(next, 0.0),
            }
        }
    }

    #[test]
    fn release_falls_back_to_idle() {
        let release = 0.03;
        let mut env = envelope(0.01, 0.05, 0.5, release);

        env.note_on();
        render_samples(&mut env, 20);

        env.note_off();
        assert_eq!(env.state(), EnvelopeState::Release);
        render_samples(&mut env, 30);

        assert_eq!(env.level(), 0.0);
        assert_eq!(env.state(), EnvelopeState::Idle);
        assert!(!env.is_active());
    }

    #[test]
    fn release_during_attack_starts_from_current_level() {
        let mut env = envelope(0.1, 0.05, 0.5, 0.1);

        env.note_on();
        render_samples(&mut env, 50);
        let at_release = env.level();
        assert!(at_release > 0.4 && at_release < 0.6);

        env.note_off();
        let first = env.next_sample();
        assert!(first < at_release && first > at_release * 0.9);
    }

    #[test]
    fn note_off_while_idle_is_ignored() {
        let mut env = envelope(0.01, 0.01, 0.5, 0.01);
        env.note_off();
        assert_eq!(env.state(), EnvelopeState::Idle);
        assert_eq!(env.next_sample(), 0.0);
    }

    #[test]
    fn reset_cuts_to_silence() {
        let mut env = envelope(0.0, 0.0, 1.0, 1.0);
        env.note_on();
        env.next_sample();

        env.reset();
        assert_eq!(env.level(), 0.0);
        assert!(!env.is_active());
    }
}
