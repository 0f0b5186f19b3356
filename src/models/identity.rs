//! Player identity types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while building a [`RiotId`] from user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("Username is required")]
    MissingName,

    #[error("Tag is required")]
    MissingTag,

    #[error("Expected \"name#tag\", got \"{0}\"")]
    BadFormat(String),
}

/// Human-readable player handle: display name plus tag line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RiotId {
    pub game_name: String,
    pub tag_line: String,
}

impl RiotId {
    /// Build an identity from separate form fields, trimming both parts.
    pub fn new(game_name: &str, tag_line: &str) -> Result<Self, IdentityError> {
        let game_name = game_name.trim();
        // Users frequently paste the tag with its leading '#'
        let tag_line = tag_line.trim().trim_start_matches('#').trim();

        if game_name.is_empty() {
            return Err(IdentityError::MissingName);
        }
        if tag_line.is_empty() {
            return Err(IdentityError::MissingTag);
        }

        Ok(Self {
            game_name: game_name.to_string(),
            tag_line: tag_line.to_string(),
        })
    }
}

impl FromStr for RiotId {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, tag) = s
            .rsplit_once('#')
            .ok_or_else(|| IdentityError::BadFormat(s.to_string()))?;
        Self::new(name, tag)
    }
}

impl fmt::Display for RiotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.game_name, self.tag_line)
    }
}

/// Opaque player identifier returned by the identity service.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Puuid(String);

impl Puuid {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Puuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Puuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Puuid({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_riot_id_trims_input() {
        let id = RiotId::new("  Player One ", " EUW ").unwrap();
        assert_eq!(id.game_name, "Player One");
        assert_eq!(id.tag_line, "EUW");
    }

    #[test]
    fn test_riot_id_strips_hash_from_tag() {
        let id = RiotId::new("Player", "#1234").unwrap();
        assert_eq!(id.tag_line, "1234");
    }

    #[test]
    fn test_riot_id_requires_name() {
        assert_eq!(RiotId::new("   ", "EUW"), Err(IdentityError::MissingName));
    }

    #[test]
    fn test_riot_id_requires_tag() {
        assert_eq!(RiotId::new("Player", ""), Err(IdentityError::MissingTag));
        assert_eq!(RiotId::new("Player", "#"), Err(IdentityError::MissingTag));
    }

    #[test]
    fn test_riot_id_from_str() {
        let id: RiotId = "Some Name#NA1".parse().unwrap();
        assert_eq!(id.game_name, "Some Name");
        assert_eq!(id.tag_line, "NA1");
        assert_eq!(id.to_string(), "Some Name#NA1");
    }

    #[test]
    fn test_riot_id_from_str_without_tag() {
        assert!(matches!(
            "nohash".parse::<RiotId>(),
            Err(IdentityError::BadFormat(_))
        ));
    }

    #[test]
    fn test_puuid_serializes_transparently() {
        let puuid = Puuid::new("abc123");
        assert_eq!(serde_json::to_string(&puuid).unwrap(), "\"abc123\"");
        assert_eq!(format!("{:?}", puuid), "Puuid(abc123)");
    }
}
