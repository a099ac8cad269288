/// Decides which incoming notes the synth responds to.
pub trait SoundSelector: Send {
    fn applies_to_note(&self, note: u8) -> bool;
    fn applies_to_channel(&self, channel: u8) -> bool;
}

/// Plays every note on every channel.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnySound;

impl SoundSelector for AnySound {
    fn applies_to_note(&self, _note: u8) -> bool {
        true
    }

    fn applies_to_channel(&self, _channel: u8) -> bool {
        true
    }
}

/// Plays a key range, optionally on one channel only.
#[derive(Debug, Clone, Copy)]
pub struct KeyRange {
    pub channel: Option<u8>,
    pub low: u8,
    pub high: u8,
}

impl SoundSelector for KeyRange {
    fn applies_to_note(&self, note: u8) -> bool {
        (self.low..=self.high).contains(&note)
    }

    fn applies_to_channel(&self, channel: u8) -> bool {
        self.channel.map_or(true, |c| c == channel)
    }
}
