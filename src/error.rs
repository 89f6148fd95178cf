//! Errors raised while building or driving a fishing session

use std::fmt;

/// A session could not be configured. Raised before the first tick.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    UnknownFish { id: String },
    MalformedFish { id: String, reason: String },
    InvertedSizeRange { min: i32, max: i32 },
    DifficultyOutOfRange { difficulty: f32 },
    BarTooTall { bar_height: i32 },
    /// A tuning value that is NaN, infinite or outside its range
    InvalidModifier { name: &'static str, value: f32 },
    UnknownTackle { id: String },
    Registry(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownFish { id } => write!(f, "unknown fish id: {id}"),
            Self::MalformedFish { id, reason } => {
                write!(f, "malformed fish entry {id}: {reason}")
            }
            Self::InvertedSizeRange { min, max } => {
                write!(f, "inverted fish size range: min {min} > max {max}")
            }
            Self::DifficultyOutOfRange { difficulty } => {
                write!(f, "difficulty out of range: {difficulty} (allowed 0..=100)")
            }
            Self::BarTooTall { bar_height } => write!(
                f,
                "catch bar height {bar_height} does not fit the track ({})",
                crate::consts::TRACK_HEIGHT
            ),
            Self::InvalidModifier { name, value } => write!(f, "invalid {name}: {value}"),
            Self::UnknownTackle { id } => write!(f, "unknown tackle id: {id}"),
            Self::Registry(msg) => write!(f, "fish registry error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Registry(err.to_string())
    }
}

/// Misuse of a running session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionError {
    /// The session already produced its outcome
    AlreadyFinished,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyFinished => write!(f, "fishing session already finished"),
        }
    }
}

impl std::error::Error for SessionError {}
