//! Upstream region codes.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown region \"{given}\" (expected one of: {})", .allowed.join(", "))]
pub struct RegionError {
    pub given: String,
    pub allowed: Vec<String>,
}

/// A region code accepted by the upstream API, stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Region(String);

impl Region {
    /// Accept `code` only if it is one of `allowed` (case-insensitive).
    pub fn parse(code: &str, allowed: &[String]) -> Result<Self, RegionError> {
        let code = code.trim().to_lowercase();
        if allowed.iter().any(|a| a.eq_ignore_ascii_case(&code)) {
            Ok(Self(code))
        } else {
            Err(RegionError {
                given: code,
                allowed: allowed.to_vec(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
