//! Severity levels and the allowed-level set.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::LogError;

/// Log severity, most severe first.
///
/// The numeric order is part of the contract: a threshold of `Info` admits
/// every level with a smaller or equal discriminant (`Fatal..=Info`). The
/// level/name mapping is bijective and fixed.
#[repr(u8)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Fatal = 0,
    Panic = 1,
    Error = 2,
    Warning = 3,
    Notice = 4,
    Info = 5,
    Trace = 6,
    #[default]
    Debug = 7,
}

impl Level {
    /// Every level, most severe first.
    pub const ALL: [Level; 8] = [
        Level::Fatal,
        Level::Panic,
        Level::Error,
        Level::Warning,
        Level::Notice,
        Level::Info,
        Level::Trace,
        Level::Debug,
    ];

    /// Canonical uppercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Fatal => "FATAL",
            Level::Panic => "PANIC",
            Level::Error => "ERROR",
            Level::Warning => "WARNING",
            Level::Notice => "NOTICE",
            Level::Info => "INFO",
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
        }
    }

    /// Level for a numeric discriminant, `None` when out of range.
    pub fn from_index(index: u8) -> Option<Level> {
        Level::ALL.get(index as usize).copied()
    }

    /// Case-insensitive lookup by canonical name.
    pub fn from_name(name: &str) -> Option<Level> {
        let upper = name.to_ascii_uppercase();
        Level::ALL.into_iter().find(|level| level.as_str() == upper)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::from_name(s)
            .ok_or_else(|| LogError::config_parse(format!("unknown log level: {s:?}")))
    }
}

/// Set of allowed levels with O(1) membership, one bit per level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LevelSet(u8);

impl LevelSet {
    /// The empty set.
    pub const fn empty() -> Self {
        LevelSet(0)
    }

    /// Every level at least as severe as `threshold` (numerically `<=`).
    pub fn from_threshold(threshold: Level) -> Self {
        Level::ALL
            .into_iter()
            .filter(|level| *level <= threshold)
            .collect()
    }

    pub fn insert(&mut self, level: Level) {
        self.0 |= 1 << level as u8;
    }

    pub fn contains(self, level: Level) -> bool {
        self.0 & (1 << level as u8) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members, most severe first.
    pub fn iter(self) -> impl Iterator<Item = Level> {
        Level::ALL.into_iter().filter(move |l| self.contains(*l))
    }
}

impl FromIterator<Level> for LevelSet {
    fn from_iter<I: IntoIterator<Item = Level>>(iter: I) -> Self {
        let mut set = LevelSet::empty();
        for level in iter {
            set.insert(level);
        }
        set
    }
}
