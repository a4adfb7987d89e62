//! Open/Close State Machine
//!
//! ```text
//! Open  --close()-->  Closed
//! Closed --open()-->  Open
//! ```
//!
//! Transitions are never rejected: re-entering the current state is allowed
//! and still counts as a transition for notification purposes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenState {
    /// Widget slid out, content visible
    Open,
    /// Widget slid in, only the nav strip visible
    Closed,
}

impl OpenState {
    pub fn from_flag(open: bool) -> Self {
        if open {
            OpenState::Open
        } else {
            OpenState::Closed
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, OpenState::Open)
    }

    pub fn toggled(&self) -> Self {
        match self {
            OpenState::Open => OpenState::Closed,
            OpenState::Closed => OpenState::Open,
        }
    }

    /// Class carried by the widget root while in this state
    pub fn marker(&self) -> &'static str {
        self.as_str()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OpenState::Open => "open",
            OpenState::Closed => "closed",
        }
    }
}

impl std::fmt::Display for OpenState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OpenState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(OpenState::Open),
            "closed" => Ok(OpenState::Closed),
            _ => Err(format!("Unknown open state: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        assert_eq!(OpenState::Open.toggled(), OpenState::Closed);
        assert_eq!(OpenState::Closed.toggled(), OpenState::Open);
        assert_eq!(OpenState::from_flag(true), OpenState::Open);
        assert!(!OpenState::from_flag(false).is_open());
    }

    #[test]
    fn test_markers_round_trip() {
        assert_eq!(OpenState::Open.marker(), "open");
        assert_eq!(OpenState::Closed.marker(), "closed");
        assert_eq!("CLOSED".parse::<OpenState>().unwrap(), OpenState::Closed);
        assert!("ajar".parse::<OpenState>().is_err());
    }
}
