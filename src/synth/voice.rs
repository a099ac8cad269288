use crate::{
    dsp::{
        envelope::{Envelope, EnvelopeState},
        oscillator::Oscillator,
        tone::{ToneFilter, ToneSettings},
    },
    params::{note_frequency, ParamId, ParamSnapshot},
};

/// Centre position of the 14-bit pitch wheel.
pub const PITCH_WHEEL_CENTRE: u16 = 8192;
const PITCH_WHEEL_MAX: u16 = 16_383;

/// Everything a voice reads from the engine during one block.
///
/// Borrowed for the duration of a render call: voices never own or look up
/// engine state themselves.
pub struct RenderCtx<'a> {
    pub sample_rate: f32,
    pub params: &'a ParamSnapshot,
    pub tone: &'a ToneSettings,
    /// Pitch wheel range in semitones.
    pub pitch_bend_range: f32,
}

/// Per-note lifecycle driven by the voice dispatcher.
pub trait NoteTarget {
    /// Begin a note. `velocity` is 0..1, `pitch_wheel` 0..16383.
    fn start_note(&mut self, note: u8, velocity: f32, pitch_wheel: u16, ctx: &RenderCtx);

    /// End a note, with or without its release tail.
    fn stop_note(&mut self, allow_tail_off: bool);

    /// Add `num_samples` of output into `out[start_sample..]`.
    fn render_next_block(
        &mut self,
        out: &mut [f32],
        start_sample: usize,
        num_samples: usize,
        ctx: &RenderCtx,
    );

    /// False once the voice has gone silent and can be reused.
    fn is_active(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Free,      // Available for allocation
    Active,    // Playing, envelope in attack/decay/sustain
    Releasing, // Key released, envelope in release phase
}

/// Semitone offset of a wheel position, scaled to `range`.
#[inline]
pub fn pitch_bend_ratio(pitch_wheel: u16, range: f32) -> f32 {
    let position = pitch_wheel.min(PITCH_WHEEL_MAX) as f32 - PITCH_WHEEL_CENTRE as f32;
    let semitones = position / PITCH_WHEEL_CENTRE as f32 * range;
    2.0_f32.powf(semitones / 12.0)
}

/// One note's signal path: oscillator → tone filter → envelope · velocity.
pub struct Voice {
    oscillator: Oscillator,
    tone: ToneFilter,
    envelope: Envelope,

    note: u8,
    channel: u8,
    velocity: f32,
    /// Note frequency before pitch bend.
    frequency: f32,
    bend_ratio: f32,

    sample_rate: f32,
    state: VoiceState,
    age: u64,
}

impl Voice {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            oscillator: Oscillator::new(),
            tone: ToneFilter::new(),
            envelope: Envelope::new(),
            note: 0,
            channel: 0,
            velocity: 0.0,
            frequency: 0.0,
            bend_ratio: 1.0,
            sample_rate,
            state: VoiceState::Free,
            age: 0,
        }
    }

    /// Tag the voice with its MIDI channel and allocation age.
    pub fn assign(&mut self, channel: u8, age: u64) {
        self.channel = channel;
        self.age = age;
    }

    /// Re-derive every rate-dependent value. Filter history is kept.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.oscillator
            .set_frequency(sample_rate, self.frequency * self.bend_ratio);
    }

    pub fn pitch_wheel_moved(&mut self, pitch_wheel: u16, range: f32) {
        self.bend_ratio = pitch_bend_ratio(pitch_wheel, range);
        self.oscillator
            .set_frequency(self.sample_rate, self.frequency * self.bend_ratio);
    }

    pub fn is_free(&self) -> bool {
        self.state == VoiceState::Free
    }

    pub fn note(&self) -> u8 {
        self.note
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Target pitch in Hz, including pitch bend.
    pub fn frequency(&self) -> f32 {
        self.frequency * self.bend_ratio
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn envelope_state(&self) -> EnvelopeState {
        self.envelope.state()
    }

    pub fn envelope_level(&self) -> f32 {
        self.envelope.level()
    }

    pub fn oscillator(&self) -> &Oscillator {
        &self.oscillator
    }

    pub fn tone_settings(&self) -> &ToneSettings {
        self.tone.settings()
    }

    fn free(&mut self) {
        self.state = VoiceState::Free;
        self.velocity = 0.0;
    }
}

impl NoteTarget for Voice {
    fn start_note(&mut self, note: u8, velocity: f32, pitch_wheel: u16, ctx: &RenderCtx) {
        let params = ctx.params;

        self.note = note;
        self.velocity = if velocity.is_finite() {
            velocity.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.sample_rate = ctx.sample_rate;
        self.frequency = note_frequency(note, params[ParamId::Tune]);
        self.bend_ratio = pitch_bend_ratio(pitch_wheel, ctx.pitch_bend_range);

        self.oscillator.set_multipliers(
            params[ParamId::Saw],
            params[ParamId::Rect],
            params[ParamId::Tri],
        );
        self.oscillator
            .set_frequency(self.sample_rate, self.frequency * self.bend_ratio);
        self.oscillator.reset();

        self.tone.reset();
        self.tone.apply(ctx.tone);

        self.envelope.set_adsr(
            self.sample_rate,
            params[ParamId::Attack],
            params[ParamId::Decay],
            params[ParamId::Sustain],
            params[ParamId::Release],
        );
        self.envelope.note_on();

        self.state = VoiceState::Active;
    }

    fn stop_note(&mut self, allow_tail_off: bool) {
        if self.state == VoiceState::Free {
            return;
        }

        if allow_tail_off {
            self.envelope.note_off();
            self.state = VoiceState::Releasing;
        } else {
            self.envelope.reset();
            self.free();
        }
    }

    fn render_next_block(
        &mut self,
        out: &mut [f32],
        start_sample: usize,
        num_samples: usize,
        ctx: &RenderCtx,
    ) {
        if self.state == VoiceState::Free {
            return;
        }

        let params = ctx.params;
        self.oscillator.set_multipliers(
            params[ParamId::Saw],
            params[ParamId::Rect],
            params[ParamId::Tri],
        );
        self.tone.apply(ctx.tone);

        let start = start_sample.min(out.len());
        let end = start_sample.saturating_add(num_samples).min(out.len());

        for sample in &mut out[start..end] {
            let raw = self.oscillator.next_sample();
            let shaped = self.tone.run(raw);
            let level = self.envelope.next_sample();
            *sample += shaped * level * self.velocity;
        }

        if !self.envelope.is_active() {
            self.free();
        }
    }

    fn is_active(&self) -> bool {
        matches!(self.state, VoiceState::Active | VoiceState::Releasing)
    }
}
