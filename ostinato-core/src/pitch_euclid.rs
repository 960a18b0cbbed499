//! Euclidean pitch trigger: on rhythmic hit steps, walks a cyclic buffer of
//! scale-derived pitch offsets and emits notes with a tick-counted sustain.

use ostinato_types::{random_scale_pitch, EuclideanPattern, Scale};

use crate::midi::MidiOut;

/// Upper bound on the pitch buffer length.
pub const MAX_PITCHES: usize = 32;

/// Velocity of every triggered note.
const TRIGGER_VELOCITY: u8 = 100;

#[derive(Debug, Clone)]
pub struct PitchEuclid {
    pattern: EuclideanPattern,
    scale: Scale,
    pitches: Vec<u8>,
    cursor: usize,
    /// Root the buffered offsets are added to.
    pub base_pitch: u8,
    /// Octave bands the randomized offsets may spread across.
    pub octaves: u8,
    /// Sustain in ticks. 0 disables the engine entirely.
    pub note_length: u8,
    pub channel: u8,
    pub muted: bool,
    sounding: Option<u8>,
    countdown: u8,
    rng_state: u64,
}

impl PitchEuclid {
    pub fn new(channel: u8) -> Self {
        let mut engine = Self {
            pattern: EuclideanPattern::default(),
            scale: Scale::default(),
            pitches: Vec::new(),
            cursor: 0,
            base_pitch: 48,
            octaves: 0,
            note_length: 1,
            channel,
            muted: false,
            sounding: None,
            countdown: 0,
            rng_state: 0x853c49e6748fea9b,
        };
        engine.set_pitch_length(4);
        engine
    }

    pub fn seed_rng(&mut self, seed: u64) {
        self.rng_state = seed | 1;
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    /// Switch the scale used by subsequent randomization. The buffer keeps
    /// its current contents until the next randomize.
    pub fn set_scale(&mut self, scale: Scale) {
        self.scale = scale;
    }

    pub fn pattern(&self) -> &EuclideanPattern {
        &self.pattern
    }

    pub fn set_hits(&mut self, hits: u8) {
        self.pattern.set_hits(hits);
    }

    pub fn set_rotation(&mut self, rotation: u8) {
        self.pattern.set_rotation(rotation);
    }

    /// The current buffer of pitch offsets.
    pub fn pitches(&self) -> &[u8] {
        &self.pitches
    }

    /// Resize the pitch buffer (clamped to 1..=[`MAX_PITCHES`]) and refill
    /// it immediately.
    pub fn set_pitch_length(&mut self, length: usize) {
        self.pitches.resize(length.clamp(1, MAX_PITCHES), 0);
        self.cursor %= self.pitches.len();
        self.randomize_pitches();
    }

    /// Refill the whole buffer with uniform draws from the active scale.
    pub fn randomize_pitches(&mut self) {
        for slot in &mut self.pitches {
            *slot = random_scale_pitch(self.scale, self.octaves, &mut self.rng_state);
        }
    }

    /// 16th-note tick callback. `counter` selects the pattern step.
    pub fn on_tick(&mut self, counter: u32, out: &mut dyn MidiOut) {
        if self.countdown > 0 {
            self.countdown -= 1;
        }

        // Release once the sustain runs out (or immediately when disabled)
        if let Some(pitch) = self.sounding {
            if self.note_length == 0 || self.countdown == 0 {
                out.send_note_off(self.channel, pitch, 0);
                self.sounding = None;
            }
        }

        if self.note_length == 0 {
            return;
        }

        if !self.pattern.is_hit(counter) {
            return;
        }

        if let Some(pitch) = self.sounding.take() {
            out.send_note_off(self.channel, pitch, 0);
        }

        let pitch = self.base_pitch as u16 + self.pitches[self.cursor] as u16;
        if pitch <= 127 && !self.muted {
            out.send_note_on(self.channel, pitch as u8, TRIGGER_VELOCITY);
            self.countdown = self.note_length;
            self.sounding = Some(pitch as u8);
        }
        // The cursor moves whether or not the note sounded, so muting does
        // not stall the melodic cycle
        self.cursor = (self.cursor + 1) % self.pitches.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::test_support::{Emitted, NoteLog};

    fn engine() -> PitchEuclid {
        let mut engine = PitchEuclid::new(2);
        engine.set_hits(16); // hit on every tick for deterministic tests
        engine
    }

    #[test]
    fn disabled_engine_never_emits() {
        let mut engine = engine();
        engine.note_length = 0;
        let mut out = NoteLog::new();
        for tick in 0..32 {
            engine.on_tick(tick, &mut out);
        }
        assert!(out.events.is_empty());
    }

    #[test]
    fn hit_emits_base_plus_offset() {
        let mut engine = engine();
        let expected = engine.base_pitch + engine.pitches()[0];
        let mut out = NoteLog::new();
        engine.on_tick(0, &mut out);
        assert_eq!(
            out.events,
            vec![Emitted::On {
                channel: 2,
                pitch: expected,
                velocity: 100
            }]
        );
    }

    #[test]
    fn sustain_counts_down_to_note_off() {
        let mut engine = engine();
        engine.set_hits(1); // hit only on tick 0 of each bar
        engine.note_length = 2;
        let mut out = NoteLog::new();
        engine.on_tick(0, &mut out); // note-on
        engine.on_tick(1, &mut out); // countdown 2 -> 1, still sounding
        assert_eq!(out.pitches_on().len(), 1);
        assert_eq!(out.events.len(), 1);
        engine.on_tick(2, &mut out); // countdown hits 0 -> note-off
        assert_eq!(out.events.len(), 2);
        assert!(matches!(out.events[1], Emitted::Off { .. }));
    }

    #[test]
    fn rapid_hits_release_before_retrigger() {
        let mut engine = engine();
        engine.note_length = 8; // outlives the gap between hits
        let mut out = NoteLog::new();
        engine.on_tick(0, &mut out);
        engine.on_tick(1, &mut out);
        // second hit must land after the first note's release
        let kinds: Vec<bool> = out
            .events
            .iter()
            .map(|e| matches!(e, Emitted::On { .. }))
            .collect();
        assert_eq!(kinds, vec![true, false, true]);
    }

    #[test]
    fn rest_steps_do_not_emit() {
        let mut engine = engine();
        engine.set_hits(4); // hits on ticks 0, 4, 8, 12
        engine.note_length = 1;
        let mut out = NoteLog::new();
        for tick in 0..16 {
            engine.on_tick(tick, &mut out);
        }
        assert_eq!(out.pitches_on().len(), 4);
    }

    #[test]
    fn muted_advances_the_cursor() {
        let mut engine = engine();
        engine.set_pitch_length(4);
        engine.muted = true;
        let mut out = NoteLog::new();
        for tick in 0..3 {
            engine.on_tick(tick, &mut out);
        }
        assert!(out.events.is_empty());
        engine.muted = false;
        engine.on_tick(3, &mut out);
        let expected = engine.base_pitch + engine.pitches()[3];
        assert_eq!(out.pitches_on(), vec![expected]);
    }

    #[test]
    fn cursor_wraps_the_buffer() {
        let mut engine = engine();
        engine.set_pitch_length(2);
        engine.note_length = 1;
        let mut out = NoteLog::new();
        for tick in 0..4 {
            engine.on_tick(tick, &mut out);
        }
        let offsets: Vec<u8> = out
            .pitches_on()
            .iter()
            .map(|p| p - engine.base_pitch)
            .collect();
        assert_eq!(offsets[0], offsets[2]);
        assert_eq!(offsets[1], offsets[3]);
    }

    #[test]
    fn randomized_offsets_are_scale_members() {
        let mut engine = engine();
        engine.set_scale(Scale::MinorPentatonic);
        engine.octaves = 2;
        for _ in 0..20 {
            engine.randomize_pitches();
            for &offset in engine.pitches() {
                assert!(
                    Scale::MinorPentatonic.contains_offset(offset),
                    "offset {} not in scale",
                    offset
                );
            }
        }
    }

    #[test]
    fn set_pitch_length_resizes_and_refills() {
        let mut engine = engine();
        engine.set_pitch_length(7);
        assert_eq!(engine.pitches().len(), 7);
        for &offset in engine.pitches() {
            assert!(engine.scale().contains_offset(offset));
        }
    }

    #[test]
    fn set_pitch_length_clamps() {
        let mut engine = engine();
        engine.set_pitch_length(0);
        assert_eq!(engine.pitches().len(), 1);
        engine.set_pitch_length(999);
        assert_eq!(engine.pitches().len(), MAX_PITCHES);
    }

    #[test]
    fn out_of_range_pitch_is_skipped_but_cursor_moves() {
        let mut engine = engine();
        engine.base_pitch = 127;
        engine.octaves = 3;
        engine.set_pitch_length(4);
        let mut out = NoteLog::new();
        for tick in 0..4 {
            engine.on_tick(tick, &mut out);
        }
        // whichever offsets exceeded the MIDI range were skipped
        for &pitch in &out.pitches_on() {
            assert!(pitch <= 127);
        }
    }

    #[test]
    fn disabling_mid_note_releases_immediately() {
        let mut engine = engine();
        engine.note_length = 8;
        let mut out = NoteLog::new();
        engine.on_tick(0, &mut out);
        engine.note_length = 0;
        engine.on_tick(1, &mut out);
        assert!(matches!(out.events.last(), Some(Emitted::Off { .. })));
        engine.on_tick(2, &mut out);
        assert_eq!(out.events.len(), 2);
    }
}
