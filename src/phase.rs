//! Traffic light phase
//!
//! A light is either stopped or letting traffic go. Nothing else is valid.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Visible signal of a traffic light
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Traffic must wait
    #[default]
    Stopped,
    /// Traffic may cross
    Go,
}

impl Phase {
    /// The phase a light switches to from this one
    pub fn toggled(self) -> Self {
        match self {
            Phase::Stopped => Phase::Go,
            Phase::Go => Phase::Stopped,
        }
    }

    /// Whether traffic may cross
    pub fn is_go(self) -> bool {
        self == Phase::Go
    }

    /// Compact encoding used for lock-free storage
    pub(crate) fn as_u8(self) -> u8 {
        match self {
            Phase::Stopped => 0,
            Phase::Go => 1,
        }
    }

    /// Decode a value written by [`Phase::as_u8`]. Anything non-zero reads as `Go`.
    pub(crate) fn from_u8(value: u8) -> Self {
        if value == 0 { Phase::Stopped } else { Phase::Go }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Stopped => write!(f, "stopped"),
            Phase::Go => write!(f, "go"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_stopped() {
        assert_eq!(Phase::default(), Phase::Stopped);
    }

    #[test]
    fn test_toggled_alternates() {
        assert_eq!(Phase::Stopped.toggled(), Phase::Go);
        assert_eq!(Phase::Go.toggled(), Phase::Stopped);
        assert_eq!(Phase::Go.toggled().toggled(), Phase::Go);
    }

    #[test]
    fn test_is_go() {
        assert!(Phase::Go.is_go());
        assert!(!Phase::Stopped.is_go());
    }

    #[test]
    fn test_u8_encoding() {
        assert_eq!(Phase::from_u8(Phase::Stopped.as_u8()), Phase::Stopped);
        assert_eq!(Phase::from_u8(Phase::Go.as_u8()), Phase::Go);
    }

    #[test]
    fn test_serde_names_match_display() {
        assert_eq!(serde_yaml::to_string(&Phase::Go).unwrap().trim(), "go");
        assert_eq!(serde_yaml::to_string(&Phase::Stopped).unwrap().trim(), "stopped");
        assert_eq!(serde_yaml::from_str::<Phase>("go").unwrap(), Phase::Go);
        assert_eq!(serde_yaml::from_str::<Phase>("stopped").unwrap(), Phase::Stopped);
        assert!(serde_yaml::from_str::<Phase>("amber").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Phase::Stopped.to_string(), "stopped");
        assert_eq!(Phase::Go.to_string(), "go");
    }
}
