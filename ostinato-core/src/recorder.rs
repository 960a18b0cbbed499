//! Step recorder: captures incoming notes into a fixed-length position
//! buffer for step-sequenced playback. Composed next to an [`Arpeggiator`]
//! rather than derived from it; the driver decides which of the two a tick
//! feeds.
//!
//! [`Arpeggiator`]: crate::arp::Arpeggiator

use ostinato_types::Note;

use crate::midi::MidiOut;

/// Total slots in the ring; the active window is `length` of them.
pub const RECORD_CAPACITY: usize = 64;

/// Default active window length.
pub const DEFAULT_RECORD_LENGTH: usize = 32;

#[derive(Debug, Clone)]
pub struct StepRecorder {
    slots: [Option<Note>; RECORD_CAPACITY],
    length: usize,
    start: usize,
    cursor: usize,
    pub channel: u8,
    sounding: Option<u8>,
}

impl StepRecorder {
    pub fn new(channel: u8) -> Self {
        Self {
            slots: [None; RECORD_CAPACITY],
            length: DEFAULT_RECORD_LENGTH,
            start: 0,
            cursor: 0,
            channel,
            sounding: None,
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Resize the active window; positions keep wrapping modulo the new
    /// length. Clamped to 1..=[`RECORD_CAPACITY`].
    pub fn set_length(&mut self, length: usize) {
        self.length = length.clamp(1, RECORD_CAPACITY);
        self.cursor %= self.length;
    }

    /// Shift where the active window begins within the ring.
    pub fn set_start(&mut self, start: usize) {
        self.start = start % RECORD_CAPACITY;
    }

    fn slot_index(&self, pos: usize) -> usize {
        (self.start + pos % self.length) % RECORD_CAPACITY
    }

    /// The note stored at a window position, if any.
    pub fn slot(&self, pos: usize) -> Option<Note> {
        self.slots[self.slot_index(pos)]
    }

    /// Record a note at a window position, overwriting whatever was there.
    pub fn record_note(&mut self, pos: usize, note: Note) {
        let idx = self.slot_index(pos);
        self.slots[idx] = Some(note);
    }

    /// Chord-capture hook for a second simultaneous note. Each position
    /// holds a single note, so when the slot is already taken the second
    /// note is dropped.
    pub fn record_note_second(&mut self, pos: usize, note: Note) {
        let idx = self.slot_index(pos);
        if self.slots[idx].is_some() {
            log::debug!(
                target: "recorder",
                "slot {} already holds a note, dropping pitch {}",
                idx,
                note.pitch
            );
            return;
        }
        self.slots[idx] = Some(note);
    }

    /// Advance playback one step: release the previous note, emit the slot
    /// under the cursor (empty slots are rests), move the cursor. With
    /// `recording` set, emission is suppressed so a slot being punched in
    /// does not double-trigger against the live input note.
    pub fn play_next(&mut self, out: &mut dyn MidiOut, recording: bool) {
        if let Some(pitch) = self.sounding.take() {
            out.send_note_off(self.channel, pitch, 0);
        }
        let idx = (self.start + self.cursor) % RECORD_CAPACITY;
        if !recording {
            if let Some(note) = self.slots[idx] {
                out.send_note_on(self.channel, note.pitch, note.velocity);
                self.sounding = Some(note.pitch);
            }
        }
        self.cursor = (self.cursor + 1) % self.length;
    }

    /// Forget all recorded steps and rewind.
    pub fn clear(&mut self) {
        self.slots = [None; RECORD_CAPACITY];
        self.cursor = 0;
        self.sounding = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::test_support::{Emitted, NoteLog};

    #[test]
    fn records_and_plays_back_in_position_order() {
        let mut rec = StepRecorder::new(0);
        rec.set_length(4);
        rec.record_note(0, Note::new(60, 100));
        rec.record_note(2, Note::new(64, 90));
        let mut out = NoteLog::new();
        for _ in 0..4 {
            rec.play_next(&mut out, false);
        }
        assert_eq!(out.pitches_on(), vec![60, 64]);
    }

    #[test]
    fn playback_wraps_at_length() {
        let mut rec = StepRecorder::new(0);
        rec.set_length(2);
        rec.record_note(0, Note::new(60, 100));
        let mut out = NoteLog::new();
        for _ in 0..6 {
            rec.play_next(&mut out, false);
        }
        assert_eq!(out.pitches_on(), vec![60, 60, 60]);
    }

    #[test]
    fn positions_wrap_modulo_length() {
        let mut rec = StepRecorder::new(0);
        rec.set_length(4);
        rec.record_note(5, Note::new(62, 100)); // lands on position 1
        assert_eq!(rec.slot(1), Some(Note::new(62, 100)));
    }

    #[test]
    fn second_note_on_occupied_slot_is_dropped() {
        let mut rec = StepRecorder::new(0);
        rec.record_note(3, Note::new(60, 100));
        rec.record_note_second(3, Note::new(64, 100));
        assert_eq!(rec.slot(3), Some(Note::new(60, 100)));
    }

    #[test]
    fn second_note_on_empty_slot_is_kept() {
        let mut rec = StepRecorder::new(0);
        rec.record_note_second(3, Note::new(64, 100));
        assert_eq!(rec.slot(3), Some(Note::new(64, 100)));
    }

    #[test]
    fn record_note_overwrites() {
        let mut rec = StepRecorder::new(0);
        rec.record_note(3, Note::new(60, 100));
        rec.record_note(3, Note::new(72, 100));
        assert_eq!(rec.slot(3), Some(Note::new(72, 100)));
    }

    #[test]
    fn note_off_emitted_before_next_slot() {
        let mut rec = StepRecorder::new(1);
        rec.set_length(2);
        rec.record_note(0, Note::new(60, 100));
        rec.record_note(1, Note::new(64, 100));
        let mut out = NoteLog::new();
        rec.play_next(&mut out, false);
        rec.play_next(&mut out, false);
        assert_eq!(
            out.events,
            vec![
                Emitted::On {
                    channel: 1,
                    pitch: 60,
                    velocity: 100
                },
                Emitted::Off {
                    channel: 1,
                    pitch: 60
                },
                Emitted::On {
                    channel: 1,
                    pitch: 64,
                    velocity: 100
                },
            ]
        );
    }

    #[test]
    fn recording_pass_suppresses_emission() {
        let mut rec = StepRecorder::new(0);
        rec.set_length(2);
        rec.record_note(0, Note::new(60, 100));
        let mut out = NoteLog::new();
        rec.play_next(&mut out, true);
        rec.play_next(&mut out, true);
        assert!(out.events.is_empty());
    }

    #[test]
    fn rest_slots_release_but_stay_silent() {
        let mut rec = StepRecorder::new(0);
        rec.set_length(3);
        rec.record_note(0, Note::new(60, 100));
        let mut out = NoteLog::new();
        rec.play_next(&mut out, false);
        rec.play_next(&mut out, false); // rest: releases 60, emits nothing
        assert_eq!(
            out.events.last(),
            Some(&Emitted::Off {
                channel: 0,
                pitch: 60
            })
        );
        rec.play_next(&mut out, false);
        assert_eq!(out.pitches_on(), vec![60]);
    }

    #[test]
    fn start_offset_shifts_the_window() {
        let mut rec = StepRecorder::new(0);
        rec.set_length(4);
        rec.set_start(8);
        rec.record_note(0, Note::new(60, 100));
        // Window lives at ring slots 8..12; position 0 is untouched at 0
        assert_eq!(rec.slot(0), Some(Note::new(60, 100)));
        rec.set_start(0);
        assert_eq!(rec.slot(0), None);
    }

    #[test]
    fn clear_rewinds_and_silences() {
        let mut rec = StepRecorder::new(0);
        rec.set_length(2);
        rec.record_note(0, Note::new(60, 100));
        let mut out = NoteLog::new();
        rec.play_next(&mut out, false);
        rec.clear();
        assert_eq!(rec.slot(0), None);
        let mut out2 = NoteLog::new();
        rec.play_next(&mut out2, false);
        assert!(out2.events.is_empty());
    }
}
