//! # ostinato-types
//!
//! Shared type definitions and static musical tables for the ostinato
//! engines. This crate is pure data: note and parameter types, style and
//! scale tables, and the Euclidean pattern builder — no I/O, no clocks.

pub mod arp;
pub mod euclid;
pub mod note;
pub mod param;
pub mod scale;

pub use arp::{ArpStyle, RetrigMode};
pub use euclid::{euclidean_rhythm, EuclideanPattern, PATTERN_STEPS};
pub use note::{Note, MAX_ARP_STEPS, MAX_HELD_NOTES};
pub use param::{ParamGroup, ParamId, ParamSet, NUM_PARAMS};
pub use scale::{random_scale_pitch, Scale};
