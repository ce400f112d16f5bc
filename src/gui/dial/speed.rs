use serde_with::{DeserializeFromStr, SerializeDisplay};
use strum::{Display as StrumDisplay, EnumIter, EnumString, FromRepr};

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    SerializeDisplay,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    FromRepr,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "UPPERCASE")]
pub enum FanSpeed {
    #[default]
    Off,
    Low,
    Medium,
    High,
}

impl FanSpeed {
    pub fn ordinal(&self) -> usize {
        *self as usize
    }

    /// Anything outside `0..=3` falls back to `Off`.
    pub fn from_ordinal(n: i64) -> Self {
        usize::try_from(n)
            .ok()
            .and_then(Self::from_repr)
            .unwrap_or_default()
    }

    pub fn next(&self) -> Self {
        match self {
            Self::Off => Self::Low,
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High => Self::Off,
        }
    }

    /// What activating the dial would do from this speed.
    pub fn next_action(&self) -> DialAction {
        match self {
            Self::High => DialAction::Reset,
            _ => DialAction::Change,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum DialAction {
    Change,
    Reset,
}
