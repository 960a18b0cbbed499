use serde::{Deserialize, Serialize};

/// Step count of every rhythm pattern. One step per 16th-note tick, so a
/// pattern spans one bar of 4/4.
pub const PATTERN_STEPS: usize = 16;

/// Generate a Euclidean rhythm using Bjorklund's algorithm: `pulses` hits
/// distributed as evenly as possible across `steps` slots, rotated right by
/// `rotation`.
pub fn euclidean_rhythm(pulses: usize, steps: usize, rotation: usize) -> Vec<bool> {
    if steps == 0 {
        return vec![];
    }
    let pulses = pulses.min(steps);
    if pulses == 0 {
        return vec![false; steps];
    }

    // Bjorklund: repeatedly fold the remainder groups into the pattern
    // groups until at most one remainder group is left.
    let mut groups: Vec<Vec<bool>> = (0..pulses).map(|_| vec![true]).collect();
    let mut remainder: Vec<Vec<bool>> = (0..steps - pulses).map(|_| vec![false]).collect();

    while remainder.len() > 1 {
        let take = groups.len().min(remainder.len());
        let mut folded: Vec<Vec<bool>> = Vec::with_capacity(take);
        for (group, rem) in groups.iter().zip(remainder.iter()) {
            let mut combined = group.clone();
            combined.extend_from_slice(rem);
            folded.push(combined);
        }
        let leftover_groups = groups.split_off(take);
        let leftover_remainder = remainder.split_off(take);
        groups = folded;
        remainder = if leftover_groups.is_empty() {
            leftover_remainder
        } else {
            leftover_groups
        };
    }

    let mut result: Vec<bool> = groups.into_iter().flatten().collect();
    result.extend(remainder.into_iter().flatten());
    result.truncate(steps);

    if rotation > 0 {
        let rot = rotation % result.len();
        result.rotate_right(rot);
    }
    result
}

/// A 16-step Euclidean hit pattern with a configurable hit count and
/// rotation. Queried per clock tick; ticks wrap modulo the step count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EuclideanPattern {
    hits: u8,
    rotation: u8,
    steps: Vec<bool>,
}

impl EuclideanPattern {
    pub fn new(hits: u8, rotation: u8) -> Self {
        let hits = hits.min(PATTERN_STEPS as u8);
        let rotation = rotation % PATTERN_STEPS as u8;
        let steps = euclidean_rhythm(hits as usize, PATTERN_STEPS, rotation as usize);
        Self {
            hits,
            rotation,
            steps,
        }
    }

    pub fn hits(&self) -> u8 {
        self.hits
    }

    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    pub fn set_hits(&mut self, hits: u8) {
        *self = Self::new(hits, self.rotation);
    }

    pub fn set_rotation(&mut self, rotation: u8) {
        *self = Self::new(self.hits, rotation);
    }

    /// Whether the given tick counter lands on a hit step.
    pub fn is_hit(&self, tick: u32) -> bool {
        self.steps[tick as usize % PATTERN_STEPS]
    }
}

impl Default for EuclideanPattern {
    fn default() -> Self {
        Self::new(4, 0)
    }
}
