//! Player profiles and ban list entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::PlayerId;

/// A known player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub id: PlayerId,
    pub name: String,
}

/// An entry on the host's profile ban list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanEntry {
    pub reason: Option<String>,
    /// Who issued the ban (a player name, `Server`, a plugin)
    pub source: Option<String>,
    pub created: DateTime<Utc>,
    /// `None` for permanent bans
    pub expiration: Option<DateTime<Utc>>,
}

impl BanEntry {
    pub fn is_permanent(&self) -> bool {
        self.expiration.is_none()
    }

    /// `permanent` or `temporary`, as scripts see it.
    pub fn duration_label(&self) -> &'static str {
        if self.is_permanent() {
            "permanent"
        } else {
            "temporary"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn duration_label_follows_expiration() {
        let now = Utc::now();
        let mut entry = BanEntry {
            reason: Some("Griefing".into()),
            source: Some("Console".into()),
            created: now,
            expiration: None,
        };
        assert_eq!(entry.duration_label(), "permanent");
        entry.expiration = Some(now + Duration::days(1));
        assert_eq!(entry.duration_label(), "temporary");
    }
}
