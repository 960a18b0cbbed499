//! Parameter randomizer: bounded random perturbation of a track's
//! 24-parameter vector under a named selection group, with single-level
//! undo. Every mutation is written through to the device layer.

use ostinato_types::{ParamGroup, ParamId, NUM_PARAMS};

use crate::midi::ParamWriter;

/// Addressable device tracks.
pub const NUM_TRACKS: usize = 16;

/// Holds at most one prior parameter snapshot. Pushing overwrites any
/// earlier snapshot; popping restores and clears. A second randomize before
/// an undo therefore discards the older state for good.
#[derive(Debug, Clone, Copy, Default)]
pub struct UndoSlot {
    snapshot: Option<[u8; NUM_PARAMS]>,
}

impl UndoSlot {
    pub fn push(&mut self, params: &[u8; NUM_PARAMS]) {
        self.snapshot = Some(*params);
    }

    pub fn pop(&mut self) -> Option<[u8; NUM_PARAMS]> {
        self.snapshot.take()
    }

    pub fn reset(&mut self) {
        self.snapshot = None;
    }

    pub fn is_armed(&self) -> bool {
        self.snapshot.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct ParamRandomizer {
    tracks: [[u8; NUM_PARAMS]; NUM_TRACKS],
    track: usize,
    undo: UndoSlot,
    rng_state: u64,
}

impl ParamRandomizer {
    pub fn new() -> Self {
        Self {
            tracks: [[64; NUM_PARAMS]; NUM_TRACKS],
            track: 0,
            undo: UndoSlot::default(),
            rng_state: 0xda3e39cb94b95bdb,
        }
    }

    pub fn seed_rng(&mut self, seed: u64) {
        self.rng_state = seed | 1;
    }

    pub fn track(&self) -> u8 {
        self.track as u8
    }

    /// Switch the target track. Any pending undo state belongs to the old
    /// track and is discarded.
    pub fn set_track(&mut self, track: u8) {
        self.track = track as usize % NUM_TRACKS;
        self.undo.reset();
    }

    /// The active track's parameter vector.
    pub fn params(&self) -> &[u8; NUM_PARAMS] {
        &self.tracks[self.track]
    }

    /// Seed one in-memory value from the device (e.g. after a kit load).
    /// Does not write through and does not touch the undo slot.
    pub fn set_param(&mut self, param: ParamId, value: u8) {
        self.tracks[self.track][param.index()] = value.min(127);
    }

    pub fn can_undo(&self) -> bool {
        self.undo.is_armed()
    }

    /// Add a uniform draw from [-amount, amount] to every parameter in the
    /// group, clamped to 0..=127, writing each result through. The prior
    /// vector is snapshotted first. `amount == 0` is a complete no-op.
    pub fn randomize(&mut self, amount: u8, group: ParamGroup, writer: &mut dyn ParamWriter) {
        if amount == 0 {
            return;
        }
        self.undo.push(&self.tracks[self.track]);

        let span = 2 * amount as i64 + 1;
        for param in group.params().iter() {
            self.rng_state = self
                .rng_state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let delta = ((self.rng_state >> 33) as i64 % span) - amount as i64;

            let idx = param.index();
            let value = (self.tracks[self.track][idx] as i64 + delta).clamp(0, 127) as u8;
            self.tracks[self.track][idx] = value;
            writer.set_track_param(self.track as u8, param, value);
        }
        log::debug!(
            target: "randomizer",
            "randomized {} params on track {} (amount {})",
            group.params().len(),
            self.track,
            amount
        );
    }

    /// Restore the snapshotted vector and push every parameter back to the
    /// device. Returns false (and changes nothing) when there is no
    /// snapshot to restore.
    pub fn undo(&mut self, writer: &mut dyn ParamWriter) -> bool {
        match self.undo.pop() {
            Some(snapshot) => {
                self.tracks[self.track] = snapshot;
                for param in ParamId::ALL {
                    writer.set_track_param(self.track as u8, param, snapshot[param.index()]);
                }
                true
            }
            None => {
                log::debug!(target: "randomizer", "undo with nothing to restore");
                false
            }
        }
    }
}

impl Default for ParamRandomizer {
    fn default() -> Self {
        Self::new()
    }
}
