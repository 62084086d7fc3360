//! Host server version, used to gate features that only newer servers have.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TagError;

/// A `major.minor.patch` server version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ServerVersion {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
}

impl ServerVersion {
    /// First version with pointed dripstone.
    pub const V1_17: ServerVersion = ServerVersion::new(1, 17, 0);

    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    pub fn is_at_least(&self, other: ServerVersion) -> bool {
        *self >= other
    }
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for ServerVersion {
    type Err = TagError;

    /// Parses `1.21`, `1.21.4` or `v1.21.4`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
        let parts: Vec<&str> = trimmed.split('.').collect();
        if !(2..=3).contains(&parts.len()) {
            return Err(TagError::parse(format!("Invalid server version: '{}'", s)));
        }
        let number = |part: &str| {
            part.parse::<u16>()
                .map_err(|_| TagError::parse(format!("Invalid server version: '{}'", s)))
        };
        Ok(Self {
            major: number(parts[0])?,
            minor: number(parts[1])?,
            patch: parts.get(2).map(|p| number(p)).transpose()?.unwrap_or(0),
        })
    }
}
