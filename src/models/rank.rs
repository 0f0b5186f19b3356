//! Rank records: the raw upstream payload and its normalized form.

use serde::{Serialize, Serializer};
use std::fmt;
use url::Url;

/// Display tier used whenever upstream reports no tier at all.
pub const UNRANKED_TIER: &str = "Unranked";

/// A numeric field as reported by upstream.
///
/// `Unknown` means the field was absent from the response; `Known(0)` means
/// upstream reported zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stat {
    Known(i64),
    #[default]
    Unknown,
}

impl Stat {
    pub fn known(&self) -> Option<i64> {
        match self {
            Stat::Known(v) => Some(*v),
            Stat::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Stat::Unknown)
    }
}

impl From<Option<i64>> for Stat {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Stat::Unknown, Stat::Known)
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stat::Known(v) => write!(f, "{}", v),
            Stat::Unknown => write!(f, "--"),
        }
    }
}

impl Serialize for Stat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Stat::Known(v) => serializer.serialize_i64(*v),
            Stat::Unknown => serializer.serialize_str("unknown"),
        }
    }
}

/// Rank payload exactly as the upstream rank endpoint returned it.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRankResponse {
    /// Upstream answered 404/204: the player has no competitive record.
    NotRanked,
    /// Uninterpreted JSON body.
    Body(serde_json::Value),
}

/// The stable rank record handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedRank {
    /// Display tier, e.g. "Diamond 2". Never empty.
    pub tier: String,
    /// Tier without its division suffix, e.g. "Diamond".
    pub tier_base: String,
    /// Division suffix, e.g. "2"; empty when the tier has none.
    pub division: String,
    pub rating_points: Stat,
    pub wins: Stat,
    pub losses: Stat,
    pub icon_url: Option<Url>,
}

impl NormalizedRank {
    /// The record produced when upstream has nothing to say about a player.
    pub fn unranked() -> Self {
        Self {
            tier: UNRANKED_TIER.to_string(),
            tier_base: UNRANKED_TIER.to_string(),
            division: String::new(),
            rating_points: Stat::Unknown,
            wins: Stat::Unknown,
            losses: Stat::Unknown,
            icon_url: None,
        }
    }

    /// True when this record carries no information beyond the defaults.
    pub fn is_unranked(&self) -> bool {
        *self == Self::unranked()
    }

    /// Win percentage, when both wins and losses are known and non-zero in sum.
    pub fn win_rate(&self) -> Option<f64> {
        let wins = self.wins.known()?;
        let losses = self.losses.known()?;
        let total = wins + losses;
        if total <= 0 {
            return None;
        }
        Some(wins as f64 * 100.0 / total as f64)
    }
}

impl Default for NormalizedRank {
    fn default() -> Self {
        Self::unranked()
    }
}
