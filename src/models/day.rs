use std::fmt;

use serde::{Deserialize, Serialize};

/// A festival day.
///
/// Each day shows an ordered selection of blocks, see [`DayCode::blocks`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DayCode {
    #[default]
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl DayCode {
    pub const ALL: [DayCode; 7] = [
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::F,
        Self::G,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
            Self::G => "G",
        }
    }

    /// Parse a day code, ignoring surrounding whitespace and case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            "D" => Some(Self::D),
            "E" => Some(Self::E),
            "F" => Some(Self::F),
            "G" => Some(Self::G),
            _ => None,
        }
    }

    /// Parse a day code, falling back to the default day for anything unrecognized.
    pub fn resolve(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }

    /// The day's schedule as 1-based block numbers, in display order.
    ///
    /// Block `n` is the item at index `n - 1` of the aggregated list. Lengths
    /// happen to be equal today but callers must not rely on it.
    pub fn blocks(&self) -> &'static [usize] {
        match self {
            Self::A => &[1, 2, 3, 5, 6],
            Self::B => &[4, 1, 2, 7, 5],
            Self::C => &[3, 4, 1, 6, 7],
            Self::D => &[2, 3, 4, 5, 6],
            Self::E => &[1, 2, 3, 7, 5],
            Self::F => &[4, 1, 2, 6, 7],
            Self::G => &[3, 4, 7, 5, 6],
        }
    }
}

impl fmt::Display for DayCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the schedule table, as exposed by the API and `blocks days`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub day: DayCode,
    pub blocks: Vec<usize>,
}

/// The full schedule table in day order.
pub fn schedule_table() -> Vec<DaySchedule> {
    DayCode::ALL
        .iter()
        .map(|day| DaySchedule {
            day: *day,
            blocks: day.blocks().to_vec(),
        })
        .collect()
}
