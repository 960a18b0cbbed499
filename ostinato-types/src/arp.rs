use serde::{Deserialize, Serialize};

/// Traversal style used to turn a held chord into an arpeggio sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArpStyle {
    Up,
    Down,
    UpDown,
    DownUp,
    UpAndDown,
    DownAndUp,
    Converge,
    Diverge,
    ConAndDiverge,
    PinkyUp,
    PinkyUpDown,
    ThumbUp,
    ThumbUpDown,
    Random,
    RandomOnce,
    Order,
}

impl ArpStyle {
    pub const ALL: [ArpStyle; 16] = [
        ArpStyle::Up,
        ArpStyle::Down,
        ArpStyle::UpDown,
        ArpStyle::DownUp,
        ArpStyle::UpAndDown,
        ArpStyle::DownAndUp,
        ArpStyle::Converge,
        ArpStyle::Diverge,
        ArpStyle::ConAndDiverge,
        ArpStyle::PinkyUp,
        ArpStyle::PinkyUpDown,
        ArpStyle::ThumbUp,
        ArpStyle::ThumbUpDown,
        ArpStyle::Random,
        ArpStyle::RandomOnce,
        ArpStyle::Order,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ArpStyle::Up => "Up",
            ArpStyle::Down => "Down",
            ArpStyle::UpDown => "Up/Down",
            ArpStyle::DownUp => "Down/Up",
            ArpStyle::UpAndDown => "Up & Down",
            ArpStyle::DownAndUp => "Down & Up",
            ArpStyle::Converge => "Converge",
            ArpStyle::Diverge => "Diverge",
            ArpStyle::ConAndDiverge => "Con & Div",
            ArpStyle::PinkyUp => "Pinky Up",
            ArpStyle::PinkyUpDown => "Pinky U/D",
            ArpStyle::ThumbUp => "Thumb Up",
            ArpStyle::ThumbUpDown => "Thumb U/D",
            ArpStyle::Random => "Random",
            ArpStyle::RandomOnce => "Rnd Once",
            ArpStyle::Order => "Order",
        }
    }

    pub fn next(&self) -> ArpStyle {
        let idx = Self::ALL.iter().position(|s| s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> ArpStyle {
        let idx = Self::ALL.iter().position(|s| s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// When the playback position snaps back to the start of the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetrigMode {
    /// Never reset; the sequence free-runs.
    Off,
    /// Reset whenever a new note is added to the held set.
    Note,
    /// Reset on every beat boundary.
    Beat,
}

impl RetrigMode {
    pub const ALL: [RetrigMode; 3] = [RetrigMode::Off, RetrigMode::Note, RetrigMode::Beat];

    pub fn name(&self) -> &'static str {
        match self {
            RetrigMode::Off => "Off",
            RetrigMode::Note => "Note",
            RetrigMode::Beat => "Beat",
        }
    }

    pub fn next(&self) -> RetrigMode {
        match self {
            RetrigMode::Off => RetrigMode::Note,
            RetrigMode::Note => RetrigMode::Beat,
            RetrigMode::Beat => RetrigMode::Off,
        }
    }

    pub fn prev(&self) -> RetrigMode {
        match self {
            RetrigMode::Off => RetrigMode::Beat,
            RetrigMode::Note => RetrigMode::Off,
            RetrigMode::Beat => RetrigMode::Note,
        }
    }
}
