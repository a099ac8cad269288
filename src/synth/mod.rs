// Voice management, polyphony and note dispatch.
// This layer sits above the dsp primitives and owns every voice.

pub mod config;
pub mod message;
pub mod poly;
pub mod sound;
pub mod voice;

pub use config::SynthConfig;
pub use message::{MessageReceiver, NoMessages, SynthMessage};
pub use poly::Synth;
pub use sound::{AnySound, KeyRange, SoundSelector};
pub use voice::{NoteTarget, RenderCtx, Voice, VoiceState};
