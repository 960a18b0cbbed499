//! The arpeggiator: style sequence generation plus the tick-driven playback
//! scheduler that walks the generated sequence.

use ostinato_types::{ArpStyle, Note, RetrigMode, MAX_ARP_STEPS};

use crate::midi::MidiOut;
use crate::note_set::NoteSet;

/// Repeat `notes` once per octave block, each block transposed up 12
/// semitones from the previous. `octaves == 0` yields the notes unchanged.
fn expanded(notes: &[Note], octaves: u8) -> Vec<Note> {
    let mut seq = Vec::with_capacity(notes.len() * (octaves as usize + 1));
    for oct in 0..=octaves {
        for &note in notes {
            seq.push(note.transposed(12 * oct as i16));
        }
    }
    seq
}

fn reversed(mut seq: Vec<Note>) -> Vec<Note> {
    seq.reverse();
    seq
}

/// A pass followed by its reverse, with both turnaround notes omitted:
/// [a b c] becomes [a b c b].
fn turnaround_exclusive(pass: &[Note]) -> Vec<Note> {
    let mut seq = pass.to_vec();
    if pass.len() > 2 {
        seq.extend(pass[1..pass.len() - 1].iter().rev());
    }
    seq
}

/// Outer-in alternation: lowest, highest, second-lowest, second-highest, …
/// An odd-length input emits its middle note once, last.
fn converge(pass: &[Note]) -> Vec<Note> {
    let mut seq = Vec::with_capacity(pass.len());
    let (mut lo, mut hi) = (0, pass.len() - 1);
    while lo < hi {
        seq.push(pass[lo]);
        seq.push(pass[hi]);
        lo += 1;
        hi -= 1;
    }
    if lo == hi {
        seq.push(pass[lo]);
    }
    seq
}

/// Interleave a traversal of the block's lower notes with its top note:
/// [a b c] becomes [a c b c]. A single-note block emits that note once.
fn pinky_block(block: &[Note], updown: bool) -> Vec<Note> {
    let Some((&top, rest)) = block.split_last() else {
        return Vec::new();
    };
    if rest.is_empty() {
        return vec![top];
    }
    let traversal = if updown {
        turnaround_exclusive(rest)
    } else {
        rest.to_vec()
    };
    let mut seq = Vec::with_capacity(traversal.len() * 2);
    for note in traversal {
        seq.push(note);
        seq.push(top);
    }
    seq
}

/// Mirror of [`pinky_block`]: the block's bottom note before each step of a
/// traversal of the upper notes: [a b c] becomes [a b a c].
fn thumb_block(block: &[Note], updown: bool) -> Vec<Note> {
    let Some((&bottom, rest)) = block.split_first() else {
        return Vec::new();
    };
    if rest.is_empty() {
        return vec![bottom];
    }
    let traversal = if updown {
        turnaround_exclusive(rest)
    } else {
        rest.to_vec()
    };
    let mut seq = Vec::with_capacity(traversal.len() * 2);
    for note in traversal {
        seq.push(bottom);
        seq.push(note);
    }
    seq
}

/// Apply a per-octave-block constructor across the expansion range.
fn per_block(notes: &[Note], octaves: u8, build: impl Fn(&[Note]) -> Vec<Note>) -> Vec<Note> {
    let mut seq = Vec::new();
    for oct in 0..=octaves {
        let block: Vec<Note> = notes.iter().map(|n| n.transposed(12 * oct as i16)).collect();
        seq.extend(build(&block));
    }
    seq
}

fn next_index(rng_state: &mut u64, len: usize) -> usize {
    *rng_state = rng_state
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    ((*rng_state >> 33) as usize) % len
}

/// Expand the held chord into the style's playback sequence, capped at
/// [`MAX_ARP_STEPS`]. `ordered` must be sorted ascending by pitch; `played`
/// is insertion order (used by [`ArpStyle::Order`]).
pub fn build_sequence(
    ordered: &[Note],
    played: &[Note],
    style: ArpStyle,
    octaves: u8,
    rng_state: &mut u64,
) -> Vec<Note> {
    if ordered.is_empty() {
        return Vec::new();
    }
    let up = expanded(ordered, octaves);
    let mut seq = match style {
        ArpStyle::Up => up,
        ArpStyle::Down => reversed(up),
        ArpStyle::UpDown => turnaround_exclusive(&up),
        ArpStyle::DownUp => turnaround_exclusive(&reversed(up)),
        ArpStyle::UpAndDown => {
            let mut seq = up.clone();
            seq.extend(up.iter().rev());
            seq
        }
        ArpStyle::DownAndUp => {
            let down = reversed(up);
            let mut seq = down.clone();
            seq.extend(down.iter().rev());
            seq
        }
        ArpStyle::Converge => converge(&up),
        ArpStyle::Diverge => reversed(converge(&up)),
        ArpStyle::ConAndDiverge => {
            let con = converge(&up);
            let mut seq = con.clone();
            seq.extend(con.iter().rev());
            seq
        }
        ArpStyle::PinkyUp => per_block(ordered, octaves, |b| pinky_block(b, false)),
        ArpStyle::PinkyUpDown => per_block(ordered, octaves, |b| pinky_block(b, true)),
        ArpStyle::ThumbUp => per_block(ordered, octaves, |b| thumb_block(b, false)),
        ArpStyle::ThumbUpDown => per_block(ordered, octaves, |b| thumb_block(b, true)),
        ArpStyle::Random => {
            let len = up.len().min(MAX_ARP_STEPS);
            (0..len).map(|_| up[next_index(rng_state, up.len())]).collect()
        }
        ArpStyle::RandomOnce => {
            let mut seq = up;
            // Fisher-Yates
            for i in (1..seq.len()).rev() {
                seq.swap(i, next_index(rng_state, i + 1));
            }
            seq
        }
        ArpStyle::Order => expanded(played, octaves),
    };
    seq.truncate(MAX_ARP_STEPS);
    seq
}

/// The arpeggiator engine: held-note capture, sequence regeneration, and
/// the clock-driven scheduler. One instance per output channel.
#[derive(Debug, Clone)]
pub struct Arpeggiator {
    notes: NoteSet,
    sequence: Vec<Note>,
    style: ArpStyle,
    octaves: u8,
    /// Ticks between steps; 1 plays every 16th.
    pub speed: u8,
    /// Full traversals before the engine goes idle; 0 repeats forever.
    pub times: u8,
    pub retrig: RetrigMode,
    pub channel: u8,
    /// Silences emission without halting state advance.
    pub muted: bool,
    step: usize,
    cycles: u32,
    speed_counter: u8,
    sounding: Option<u8>,
    rng_state: u64,
}

impl Arpeggiator {
    pub fn new(channel: u8) -> Self {
        Self {
            notes: NoteSet::new(),
            sequence: Vec::new(),
            style: ArpStyle::Up,
            octaves: 0,
            speed: 1,
            times: 0,
            retrig: RetrigMode::Off,
            channel,
            muted: false,
            step: 0,
            cycles: 0,
            speed_counter: 0,
            sounding: None,
            rng_state: 0x9e3779b97f4a7c15,
        }
    }

    pub fn seed_rng(&mut self, seed: u64) {
        self.rng_state = seed | 1;
    }

    pub fn style(&self) -> ArpStyle {
        self.style
    }

    pub fn set_style(&mut self, style: ArpStyle) {
        self.style = style;
        self.recalculate();
    }

    pub fn octaves(&self) -> u8 {
        self.octaves
    }

    pub fn set_octaves(&mut self, octaves: u8) {
        self.octaves = octaves;
        self.recalculate();
    }

    /// The current playback sequence.
    pub fn sequence(&self) -> &[Note] {
        &self.sequence
    }

    pub fn held_notes(&self) -> &NoteSet {
        &self.notes
    }

    /// An incoming note-on: capture it and regenerate the sequence.
    pub fn note_on(&mut self, pitch: u8, velocity: u8) {
        self.notes.add(Note::new(pitch, velocity));
        self.recalculate();
        if self.retrig == RetrigMode::Note {
            self.retrigger();
        }
    }

    /// An incoming note-off: release the held note and regenerate.
    pub fn note_off(&mut self, pitch: u8) {
        if self.notes.remove(pitch) {
            self.recalculate();
        }
    }

    /// Snap playback back to the start of the sequence.
    pub fn retrigger(&mut self) {
        self.step = 0;
        self.cycles = 0;
        self.speed_counter = 0;
    }

    /// Beat-boundary callback; retriggers when the mode asks for it.
    pub fn on_beat(&mut self) {
        if self.retrig == RetrigMode::Beat {
            self.retrigger();
        }
    }

    /// 16th-note tick callback. Note-off for the previous step always
    /// precedes note-on for the next.
    pub fn on_tick(&mut self, out: &mut dyn MidiOut) {
        if self.sequence.is_empty() || self.exhausted() {
            self.release(out);
            return;
        }

        self.speed_counter += 1;
        if self.speed_counter < self.speed.max(1) {
            return;
        }
        self.speed_counter = 0;

        self.release(out);
        let note = self.sequence[self.step];
        if !self.muted {
            out.send_note_on(self.channel, note.pitch, note.velocity);
            self.sounding = Some(note.pitch);
        }

        self.step += 1;
        if self.step >= self.sequence.len() {
            self.step = 0;
            self.cycles += 1;
            // Random picks a fresh sequence every cycle through
            if self.style == ArpStyle::Random {
                self.recalculate();
            }
        }
    }

    fn exhausted(&self) -> bool {
        self.times > 0 && self.cycles >= self.times as u32
    }

    fn release(&mut self, out: &mut dyn MidiOut) {
        if let Some(pitch) = self.sounding.take() {
            out.send_note_off(self.channel, pitch, 0);
        }
    }

    fn recalculate(&mut self) {
        self.sequence = build_sequence(
            self.notes.ordered(),
            self.notes.played(),
            self.style,
            self.octaves,
            &mut self.rng_state,
        );
        if self.step >= self.sequence.len() {
            self.step = 0;
        }
    }
}
