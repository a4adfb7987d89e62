//! Animation specs
//!
//! A spec string reads `"<type> <speed> <easing>"`, e.g. `"slide 0.5s ease"`.
//! The widget only wires transition timing; the motion itself comes from
//! host CSS keyed on the type class.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnimationError {
    #[error("Animation spec is empty")]
    Empty,

    #[error("Unknown animation type: {0}")]
    UnknownKind(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationKind {
    Slide,
    Crossfade,
    Slidefade,
}

impl AnimationKind {
    /// Style properties the transition applies to
    pub fn properties(&self) -> &'static [&'static str] {
        match self {
            AnimationKind::Slide => &["transform"],
            AnimationKind::Crossfade => &["opacity"],
            AnimationKind::Slidefade => &["opacity", "transform"],
        }
    }

    /// Class added to animated panels so host CSS can pick the motion
    pub fn class_name(&self) -> &'static str {
        self.as_str()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationKind::Slide => "slide",
            AnimationKind::Crossfade => "crossfade",
            AnimationKind::Slidefade => "slidefade",
        }
    }
}

impl std::fmt::Display for AnimationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AnimationKind {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "slide" => Ok(AnimationKind::Slide),
            "crossfade" => Ok(AnimationKind::Crossfade),
            "slidefade" => Ok(AnimationKind::Slidefade),
            _ => Err(AnimationError::UnknownKind(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animation {
    pub kind: AnimationKind,
    pub speed: Option<String>,
    pub easing: Option<String>,
}

impl Animation {
    pub fn parse(input: &str) -> Result<Self, AnimationError> {
        let mut parts = input.split_whitespace();
        let kind = parts
            .next()
            .ok_or(AnimationError::Empty)?
            .parse::<AnimationKind>()?;

        Ok(Self {
            kind,
            speed: parts.next().map(str::to_string),
            easing: parts.next().map(str::to_string),
        })
    }

    /// CSS `transition` value, e.g. `"opacity 0.5s ease, transform 0.5s ease"`
    pub fn transition(&self) -> String {
        self.kind
            .properties()
            .iter()
            .map(|property| {
                std::iter::once(*property)
                    .chain(self.speed.as_deref())
                    .chain(self.easing.as_deref())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::str::FromStr for Animation {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Animation::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_spec() {
        let animation = Animation::parse("crossfade 0.3s linear").unwrap();
        assert_eq!(animation.kind, AnimationKind::Crossfade);
        assert_eq!(animation.speed.as_deref(), Some("0.3s"));
        assert_eq!(animation.easing.as_deref(), Some("linear"));
        assert_eq!(animation.transition(), "opacity 0.3s linear");
    }

    #[test]
    fn test_transition_per_kind() {
        assert_eq!(
            Animation::parse("slide 0.5s ease").unwrap().transition(),
            "transform 0.5s ease"
        );
        assert_eq!(
            Animation::parse("slidefade 1s ease-in").unwrap().transition(),
            "opacity 1s ease-in, transform 1s ease-in"
        );
    }

    #[test]
    fn test_partial_spec_omits_missing_parts() {
        assert_eq!(Animation::parse("slide").unwrap().transition(), "transform");
        assert_eq!(
            Animation::parse("  crossfade   2s ").unwrap().transition(),
            "opacity 2s"
        );
    }

    #[test]
    fn test_invalid_specs() {
        assert_eq!(Animation::parse("   "), Err(AnimationError::Empty));
        assert_eq!(
            Animation::parse("wobble 1s"),
            Err(AnimationError::UnknownKind("wobble".to_string()))
        );
    }
}
