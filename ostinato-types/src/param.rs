//! Track parameter identifiers and the named selection groups the
//! randomizer operates over. The group membership tables are transcriptions
//! of the device's fixed parameter page layout, not derived data.

use serde::{Deserialize, Serialize};

/// Number of randomizable parameters per track.
pub const NUM_PARAMS: usize = 24;

/// One slot in a track's 24-parameter vector.
///
/// `P1`..`P8` are the machine-model synthesis parameters; the rest are the
/// fixed effect and routing rows every track shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamId {
    P1,
    P2,
    P3,
    P4,
    P5,
    P6,
    P7,
    P8,
    AmDepth,
    AmFreq,
    EqFreq,
    EqGain,
    FilterFreq,
    FilterWidth,
    FilterQ,
    SampleRateReduce,
    Distortion,
    Volume,
    Pan,
    Delay,
    Reverb,
    LfoSpeed,
    LfoDepth,
    LfoMix,
}

impl ParamId {
    pub const ALL: [ParamId; NUM_PARAMS] = [
        ParamId::P1,
        ParamId::P2,
        ParamId::P3,
        ParamId::P4,
        ParamId::P5,
        ParamId::P6,
        ParamId::P7,
        ParamId::P8,
        ParamId::AmDepth,
        ParamId::AmFreq,
        ParamId::EqFreq,
        ParamId::EqGain,
        ParamId::FilterFreq,
        ParamId::FilterWidth,
        ParamId::FilterQ,
        ParamId::SampleRateReduce,
        ParamId::Distortion,
        ParamId::Volume,
        ParamId::Pan,
        ParamId::Delay,
        ParamId::Reverb,
        ParamId::LfoSpeed,
        ParamId::LfoDepth,
        ParamId::LfoMix,
    ];

    /// Position of this parameter in a track's parameter vector.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<ParamId> {
        Self::ALL.get(index).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            ParamId::P1 => "P1",
            ParamId::P2 => "P2",
            ParamId::P3 => "P3",
            ParamId::P4 => "P4",
            ParamId::P5 => "P5",
            ParamId::P6 => "P6",
            ParamId::P7 => "P7",
            ParamId::P8 => "P8",
            ParamId::AmDepth => "AMD",
            ParamId::AmFreq => "AMF",
            ParamId::EqFreq => "EQF",
            ParamId::EqGain => "EQG",
            ParamId::FilterFreq => "FLTF",
            ParamId::FilterWidth => "FLTW",
            ParamId::FilterQ => "FLTQ",
            ParamId::SampleRateReduce => "SRR",
            ParamId::Distortion => "DIST",
            ParamId::Volume => "VOL",
            ParamId::Pan => "PAN",
            ParamId::Delay => "DEL",
            ParamId::Reverb => "REV",
            ParamId::LfoSpeed => "LFOS",
            ParamId::LfoDepth => "LFOD",
            ParamId::LfoMix => "LFOM",
        }
    }
}

/// A fixed-size set of [`ParamId`]s, `Copy` and branch-free to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamSet(u32);

impl ParamSet {
    pub const EMPTY: ParamSet = ParamSet(0);

    pub const fn with(self, param: ParamId) -> ParamSet {
        ParamSet(self.0 | 1 << param as u32)
    }

    pub const fn union(self, other: ParamSet) -> ParamSet {
        ParamSet(self.0 | other.0)
    }

    pub const fn contains(self, param: ParamId) -> bool {
        self.0 & (1 << param as u32) != 0
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = ParamId> {
        ParamId::ALL.into_iter().filter(move |p| self.contains(*p))
    }
}

impl FromIterator<ParamId> for ParamSet {
    fn from_iter<I: IntoIterator<Item = ParamId>>(iter: I) -> Self {
        iter.into_iter().fold(ParamSet::EMPTY, ParamSet::with)
    }
}

const FILTER_SET: ParamSet = ParamSet::EMPTY
    .with(ParamId::FilterFreq)
    .with(ParamId::FilterWidth)
    .with(ParamId::FilterQ);

const AM_SET: ParamSet = ParamSet::EMPTY.with(ParamId::AmDepth).with(ParamId::AmFreq);

const EQ_SET: ParamSet = ParamSet::EMPTY.with(ParamId::EqFreq).with(ParamId::EqGain);

const EFFECT_SET: ParamSet = AM_SET.union(EQ_SET).union(FILTER_SET);

const LOW_SYN_SET: ParamSet = ParamSet::EMPTY
    .with(ParamId::P5)
    .with(ParamId::P6)
    .with(ParamId::P7)
    .with(ParamId::P8);

const UP_SYN_SET: ParamSet = ParamSet::EMPTY
    .with(ParamId::P2)
    .with(ParamId::P3)
    .with(ParamId::P4);

const SYN_SET: ParamSet = UP_SYN_SET.union(LOW_SYN_SET);

const LFO_SET: ParamSet = ParamSet::EMPTY
    .with(ParamId::LfoSpeed)
    .with(ParamId::LfoDepth)
    .with(ParamId::LfoMix);

const SENDS_SET: ParamSet = ParamSet::EMPTY.with(ParamId::Delay).with(ParamId::Reverb);

const DIST_SET: ParamSet = ParamSet::EMPTY
    .with(ParamId::SampleRateReduce)
    .with(ParamId::Distortion);

const FX_LOW_SYN_SET: ParamSet = EFFECT_SET.union(LOW_SYN_SET);

const FX_SYN_SET: ParamSet = EFFECT_SET.union(SYN_SET);

const ALL_SET: ParamSet = EFFECT_SET
    .union(SYN_SET)
    .union(LFO_SET)
    .union(SENDS_SET)
    .union(DIST_SET)
    .with(ParamId::P1)
    .with(ParamId::Volume)
    .with(ParamId::Pan);

/// The 13 named selection groups a randomize command can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamGroup {
    Filter,
    Am,
    Eq,
    Effect,
    LowSyn,
    UpSyn,
    Syn,
    Lfo,
    Sends,
    Dist,
    FxLowSyn,
    FxSyn,
    All,
}

impl ParamGroup {
    pub const ALL: [ParamGroup; 13] = [
        ParamGroup::Filter,
        ParamGroup::Am,
        ParamGroup::Eq,
        ParamGroup::Effect,
        ParamGroup::LowSyn,
        ParamGroup::UpSyn,
        ParamGroup::Syn,
        ParamGroup::Lfo,
        ParamGroup::Sends,
        ParamGroup::Dist,
        ParamGroup::FxLowSyn,
        ParamGroup::FxSyn,
        ParamGroup::All,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ParamGroup::Filter => "FILTER",
            ParamGroup::Am => "AMD",
            ParamGroup::Eq => "EQ",
            ParamGroup::Effect => "EFFECT",
            ParamGroup::LowSyn => "LOWSYN",
            ParamGroup::UpSyn => "UP SYN",
            ParamGroup::Syn => "SYN",
            ParamGroup::Lfo => "LFO",
            ParamGroup::Sends => "SENDS",
            ParamGroup::Dist => "DIST",
            ParamGroup::FxLowSyn => "FX LOW",
            ParamGroup::FxSyn => "FX SYN",
            ParamGroup::All => "ALL",
        }
    }

    /// Membership table for this group.
    pub fn params(&self) -> ParamSet {
        match self {
            ParamGroup::Filter => FILTER_SET,
            ParamGroup::Am => AM_SET,
            ParamGroup::Eq => EQ_SET,
            ParamGroup::Effect => EFFECT_SET,
            ParamGroup::LowSyn => LOW_SYN_SET,
            ParamGroup::UpSyn => UP_SYN_SET,
            ParamGroup::Syn => SYN_SET,
            ParamGroup::Lfo => LFO_SET,
            ParamGroup::Sends => SENDS_SET,
            ParamGroup::Dist => DIST_SET,
            ParamGroup::FxLowSyn => FX_LOW_SYN_SET,
            ParamGroup::FxSyn => FX_SYN_SET,
            ParamGroup::All => ALL_SET,
        }
    }

    pub fn next(&self) -> ParamGroup {
        let idx = Self::ALL.iter().position(|g| g == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> ParamGroup {
        let idx = Self::ALL.iter().position(|g| g == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}
