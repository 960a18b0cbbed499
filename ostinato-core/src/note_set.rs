use ostinato_types::{Note, MAX_HELD_NOTES};

/// The currently-held chord: up to [`MAX_HELD_NOTES`] notes in insertion
/// order, plus a derived view sorted ascending by pitch (stable, so equal
/// pitches keep their played order). The ordered view is recomputed on
/// every add/remove.
#[derive(Debug, Clone, Default)]
pub struct NoteSet {
    held: Vec<Note>,
    ordered: Vec<Note>,
}

impl NoteSet {
    pub fn new() -> Self {
        Self {
            held: Vec::with_capacity(MAX_HELD_NOTES),
            ordered: Vec::with_capacity(MAX_HELD_NOTES),
        }
    }

    /// Insert a note. Returns false when the set is full; the note is
    /// rejected, never overwritten onto an existing slot.
    pub fn add(&mut self, note: Note) -> bool {
        if self.held.len() >= MAX_HELD_NOTES {
            log::debug!(target: "arp", "note set full, rejecting pitch {}", note.pitch);
            return false;
        }
        self.held.push(note);
        self.reorder();
        true
    }

    /// Remove the first held note matching `pitch`. No-op if absent.
    pub fn remove(&mut self, pitch: u8) -> bool {
        match self.held.iter().position(|n| n.pitch == pitch) {
            Some(idx) => {
                self.held.remove(idx);
                self.reorder();
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.held.clear();
        self.ordered.clear();
    }

    pub fn len(&self) -> usize {
        self.held.len()
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    /// Notes sorted ascending by pitch.
    pub fn ordered(&self) -> &[Note] {
        &self.ordered
    }

    /// Notes in the order they were played.
    pub fn played(&self) -> &[Note] {
        &self.held
    }

    fn reorder(&mut self) {
        self.ordered.clear();
        self.ordered.extend_from_slice(&self.held);
        // Vec::sort_by_key is stable: ties stay in insertion order
        self.ordered.sort_by_key(|n| n.pitch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pitches(notes: &[Note]) -> Vec<u8> {
        notes.iter().map(|n| n.pitch).collect()
    }

    #[test]
    fn add_keeps_ordered_view_sorted() {
        let mut set = NoteSet::new();
        set.add(Note::new(67, 100));
        set.add(Note::new(60, 100));
        set.add(Note::new(64, 100));
        assert_eq!(pitches(set.ordered()), vec![60, 64, 67]);
        assert_eq!(pitches(set.played()), vec![67, 60, 64]);
    }

    #[test]
    fn reject_when_full() {
        let mut set = NoteSet::new();
        for pitch in 0..MAX_HELD_NOTES as u8 {
            assert!(set.add(Note::new(pitch, 100)));
        }
        assert!(!set.add(Note::new(100, 100)));
        assert_eq!(set.len(), MAX_HELD_NOTES);
        assert!(!pitches(set.ordered()).contains(&100));
    }

    #[test]
    fn remove_first_match_only() {
        let mut set = NoteSet::new();
        set.add(Note::new(60, 100));
        set.add(Note::new(60, 80));
        assert!(set.remove(60));
        assert_eq!(set.len(), 1);
        assert_eq!(set.ordered()[0].velocity, 80);
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut set = NoteSet::new();
        set.add(Note::new(60, 100));
        assert!(!set.remove(61));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn equal_pitches_keep_played_order() {
        let mut set = NoteSet::new();
        set.add(Note::new(60, 1));
        set.add(Note::new(60, 2));
        set.add(Note::new(60, 3));
        let velocities: Vec<u8> = set.ordered().iter().map(|n| n.velocity).collect();
        assert_eq!(velocities, vec![1, 2, 3]);
    }

    #[test]
    fn velocities_travel_with_pitches() {
        let mut set = NoteSet::new();
        set.add(Note::new(67, 90));
        set.add(Note::new(60, 110));
        assert_eq!(set.ordered()[0], Note::new(60, 110));
        assert_eq!(set.ordered()[1], Note::new(67, 90));
    }
}
