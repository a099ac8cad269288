use std::sync::Arc;

#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer, RingBuffer};

use crate::{
    dsp::{amplify::apply_gain_clip, smoothing::VelocityFilter, tone::ToneSettings},
    error::WolpResult,
    params::{ParamId, ParamSnapshot, ParamStore},
    synth::{
        config::{validate_sample_rate, SynthConfig},
        message::{MessageReceiver, SynthMessage},
        sound::{AnySound, SoundSelector},
        voice::{NoteTarget, RenderCtx, Voice, VoiceState, PITCH_WHEEL_CENTRE},
    },
    MAX_BLOCK_SIZE,
};

/// Cutoff sweep in octaves at full smoothed velocity.
pub const VELOCITY_SWEEP_OCTAVES: f32 = 4.0;

const MIDI_CHANNELS: usize = 16;

/// Polyphonic engine: a fixed voice pool fed from a message queue.
///
/// Everything the render thread touches is allocated in the constructor.
/// Control threads talk to it through the shared [`ParamStore`] and the
/// message receiver.
pub struct Synth<R: MessageReceiver> {
    config: SynthConfig,
    voices: Vec<Voice>,
    params: Arc<ParamStore>,
    sound: Box<dyn SoundSelector>,
    rx: R,

    velocity: VelocityFilter,
    /// Velocity of the most recently started note, 0..1.
    last_velocity: f32,
    tone: ToneSettings,
    pitch_wheel: [u16; MIDI_CHANNELS],

    scratch: Vec<f32>,
    frame_counter: u64,
    note_counter: u64,
    dropped_notes: u64,
}

impl<R: MessageReceiver> Synth<R> {
    pub fn new(config: SynthConfig, rx: R) -> WolpResult<Self> {
        Self::with_params(config, Arc::new(ParamStore::new()), rx)
    }

    /// Build around an existing parameter store, e.g. one shared with a UI.
    pub fn with_params(config: SynthConfig, params: Arc<ParamStore>, rx: R) -> WolpResult<Self> {
        config.validate().map_err(|err| {
            log::warn!("rejected synth config: {err}");
            err
        })?;

        let voices = (0..config.max_voices)
            .map(|_| Voice::new(config.sample_rate))
            .collect();

        log::info!(
            "synth ready: {} voices at {} Hz",
            config.max_voices,
            config.sample_rate
        );

        let mut synth = Self {
            voices,
            params,
            sound: Box::new(AnySound),
            rx,
            velocity: VelocityFilter::new(),
            last_velocity: 0.0,
            tone: ToneSettings::default(),
            pitch_wheel: [PITCH_WHEEL_CENTRE; MIDI_CHANNELS],
            scratch: vec![0.0; MAX_BLOCK_SIZE],
            frame_counter: 0,
            note_counter: 0,
            dropped_notes: 0,
            config,
        };
        synth.tone = synth.design_tone(&synth.params.snapshot());
        Ok(synth)
    }

    /// Restrict which notes and channels start voices.
    pub fn set_sound(&mut self, sound: impl SoundSelector + 'static) {
        self.sound = Box::new(sound);
    }

    pub fn params(&self) -> &Arc<ParamStore> {
        &self.params
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    pub fn sample_rate(&self) -> f32 {
        self.config.sample_rate
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn active_voice_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    /// Tone design used for the most recent block.
    pub fn tone_settings(&self) -> &ToneSettings {
        &self.tone
    }

    /// Current smoothed velocity modulation, 0..1.
    pub fn velocity_modulation(&self) -> f32 {
        self.velocity.value()
    }

    /// Notes that found no free or releasing voice.
    pub fn dropped_notes(&self) -> u64 {
        self.dropped_notes
    }

    /// Samples rendered since construction.
    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    /// Start a note. `velocity` is 0..1.
    ///
    /// Uses a free voice when there is one, otherwise steals the oldest
    /// releasing voice. With every voice held the note is dropped.
    pub fn note_on(&mut self, channel: u8, note: u8, velocity: f32) {
        if !self.sound.applies_to_channel(channel) || !self.sound.applies_to_note(note) {
            return;
        }

        // Retriggering a held key releases the previous instance first
        for voice in self.voices.iter_mut() {
            if voice.is_active() && voice.note() == note && voice.channel() == channel {
                voice.stop_note(true);
            }
        }

        let Some(index) = self.allocate_voice() else {
            self.dropped_notes += 1;
            return;
        };

        let params = self.params.snapshot();
        let tone = self.design_tone(&params);
        let ctx = RenderCtx {
            sample_rate: self.config.sample_rate,
            params: &params,
            tone: &tone,
            pitch_bend_range: self.config.pitch_bend_range,
        };

        let age = self.note_counter;
        self.note_counter += 1;

        let voice = &mut self.voices[index];
        voice.assign(channel, age);
        voice.start_note(note, velocity, self.pitch_wheel[channel_slot(channel)], &ctx);

        if velocity.is_finite() {
            self.last_velocity = velocity.clamp(0.0, 1.0);
        }
    }

    /// Stop every voice playing `note` on `channel`. No match is a no-op.
    pub fn note_off(&mut self, channel: u8, note: u8, allow_tail_off: bool) {
        for voice in self.voices.iter_mut() {
            if voice.is_active() && voice.note() == note && voice.channel() == channel {
                voice.stop_note(allow_tail_off);
            }
        }
    }

    pub fn all_notes_off(&mut self, allow_tail_off: bool) {
        for voice in self.voices.iter_mut() {
            voice.stop_note(allow_tail_off);
        }
    }

    /// Bend every voice on `channel`; later notes on it start bent too.
    pub fn pitch_wheel_moved(&mut self, channel: u8, value: u16) {
        self.pitch_wheel[channel_slot(channel)] = value;
        for voice in self.voices.iter_mut() {
            if voice.is_active() && voice.channel() == channel {
                voice.pitch_wheel_moved(value, self.config.pitch_bend_range);
            }
        }
    }

    /// Recompute every rate-dependent value. Takes effect on the next block.
    pub fn set_sample_rate(&mut self, sample_rate: f32) -> WolpResult<()> {
        validate_sample_rate(sample_rate)?;

        self.config.sample_rate = sample_rate;
        for voice in self.voices.iter_mut() {
            voice.set_sample_rate(sample_rate);
        }
        self.tone = self.design_tone(&self.params.snapshot());

        log::info!("sample rate set to {} Hz", sample_rate);
        Ok(())
    }

    /// Render `num_samples` into `out[start_sample..]`, adding to what is
    /// already there. Pending messages are applied first.
    ///
    /// The range is clipped to the buffer, and long ranges are processed in
    /// chunks of at most [`MAX_BLOCK_SIZE`] samples.
    pub fn render_next_block(&mut self, out: &mut [f32], start_sample: usize, num_samples: usize) {
        self.process_messages();

        let end = start_sample.saturating_add(num_samples).min(out.len());
        let mut offset = start_sample.min(end);

        while offset < end {
            let len = (end - offset).min(MAX_BLOCK_SIZE);
            self.render_chunk(&mut out[offset..offset + len]);
            offset += len;
        }
    }

    fn render_chunk(&mut self, out: &mut [f32]) {
        let len = out.len();
        let sample_rate = self.config.sample_rate;
        let params = self.params.snapshot();

        self.velocity
            .set_target(self.last_velocity * params[ParamId::Velocity]);
        self.velocity
            .advance(len, params[ParamId::Inertia], sample_rate);
        self.tone = self.design_tone(&params);

        let tone = self.tone;
        let ctx = RenderCtx {
            sample_rate,
            params: &params,
            tone: &tone,
            pitch_bend_range: self.config.pitch_bend_range,
        };

        let scratch = &mut self.scratch[..len];
        scratch.fill(0.0);
        for voice in self.voices.iter_mut().filter(|v| v.is_active()) {
            voice.render_next_block(scratch, 0, len, &ctx);
        }

        apply_gain_clip(scratch, params[ParamId::Gain], params[ParamId::Clip]);

        for (o, s) in out.iter_mut().zip(scratch.iter()) {
            *o += *s;
        }

        self.params.publish(ParamId::CurCutoff, tone.cutoff_hz);
        self.frame_counter += len as u64;
    }

    fn process_messages(&mut self) {
        while let Some(msg) = self.rx.pop() {
            match msg {
                SynthMessage::NoteOn {
                    channel,
                    note,
                    velocity,
                } => {
                    if velocity == 0 {
                        self.note_off(channel, note, true);
                    } else {
                        self.note_on(channel, note, velocity as f32 / 127.0);
                    }
                }
                SynthMessage::NoteOff { channel, note, .. } => {
                    self.note_off(channel, note, true);
                }
                SynthMessage::PitchBend { channel, value } => {
                    self.pitch_wheel_moved(channel, value);
                }
                SynthMessage::AllNotesOff => self.all_notes_off(true),
            }
        }
    }

    fn design_tone(&self, params: &ParamSnapshot) -> ToneSettings {
        ToneSettings::design(
            self.config.sample_rate,
            params[ParamId::Cutoff],
            self.velocity.value() * VELOCITY_SWEEP_OCTAVES,
            params[ParamId::Resonance],
            params[ParamId::Bandwidth],
            params[ParamId::NFilters],
        )
    }

    fn allocate_voice(&self) -> Option<usize> {
        // First pass: find free voice index
        if let Some(idx) = self.voices.iter().position(|v| !v.is_active()) {
            return Some(idx);
        }

        // Second pass: steal oldest releasing voice
        self.voices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.state() == VoiceState::Releasing)
            .min_by_key(|(_, v)| v.age())
            .map(|(idx, _)| idx)
    }
}

#[cfg(feature = "rtrb")]
impl Synth<Consumer<SynthMessage>> {
    /// Build a synth fed by a new rtrb queue of `config.message_capacity`.
    /// The producer goes to the control thread.
    pub fn with_queue(config: SynthConfig) -> WolpResult<(Self, Producer<SynthMessage>)> {
        config.validate()?;
        let (tx, rx) = RingBuffer::new(config.message_capacity);
        Ok((Self::new(config, rx)?, tx))
    }
}

#[inline]
fn channel_slot(channel: u8) -> usize {
    channel as usize % MIDI_CHANNELS
}
