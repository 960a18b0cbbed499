//! # ostinato-core
//!
//! Engine library for the ostinato sequencer core: the arpeggiator, the
//! Euclidean pitch trigger, and the parameter randomizer, plus the narrow
//! seams they talk through (MIDI transport, device parameter writes, the
//! 16th-note clock). All engines are single-threaded state machines driven
//! by explicit method calls; an external loop owns the clock and the MIDI
//! ports (see `ostinato-cli`).
//!
//! - [`note_set`] — held-note capture with a derived pitch ordering
//! - [`arp`] — style sequence generation + tick-driven playback scheduler
//! - [`recorder`] — fixed-length step capture buffer
//! - [`pitch_euclid`] — Euclidean-rhythm note trigger over a scale
//! - [`randomizer`] — bounded parameter perturbation with one-level undo
//! - [`midi`] — transport/device traits and midir-backed plumbing
//! - [`clock`] — wall-time to 16th-tick accumulator
//! - [`config`] — TOML defaults (embedded + user override)

pub mod arp;
pub mod clock;
pub mod config;
pub mod midi;
pub mod note_set;
pub mod pitch_euclid;
pub mod randomizer;
pub mod recorder;

pub use arp::Arpeggiator;
pub use clock::TickClock;
pub use config::Config;
pub use midi::{MidiOut, ParamWriter};
pub use note_set::NoteSet;
pub use pitch_euclid::PitchEuclid;
pub use randomizer::ParamRandomizer;
pub use recorder::StepRecorder;
