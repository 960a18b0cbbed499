use serde::{Deserialize, Serialize};

/// Maximum number of simultaneously held notes the arpeggiator tracks.
pub const MAX_HELD_NOTES: usize = 8;

/// Maximum length of a generated arpeggio sequence.
pub const MAX_ARP_STEPS: usize = 64;

/// A single MIDI note: pitch and velocity, both 0..=127.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub pitch: u8,
    pub velocity: u8,
}

impl Note {
    pub fn new(pitch: u8, velocity: u8) -> Self {
        Self { pitch, velocity }
    }

    /// Transpose by a signed semitone offset, clamping to the MIDI range.
    pub fn transposed(self, semitones: i16) -> Note {
        let pitch = (self.pitch as i16 + semitones).clamp(0, 127) as u8;
        Note {
            pitch,
            velocity: self.velocity,
        }
    }
}
