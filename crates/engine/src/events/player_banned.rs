//! `player banned`
//!
//! The host has no ban event, only a kick. A kick counts as a ban when the
//! player's ban entry was created less than the correlation window before
//! now. This is a heuristic: a ban issued just before an unrelated kick is
//! indistinguishable from a ban that caused it.
//!
//! Context: `reason`, `duration` (`permanent` / `temporary`), `source`,
//! `expiration` (temporary bans only, RFC 3339), `kick_message`, `player`.
//!
//! Determinations: `REASON:<text>`, `MESSAGE:<text>`, `CANCELLED`.

use chrono::Duration;
use tracing::{debug, info};

use mechanist_domain::common::strip_prefix_ignore_case;
use mechanist_domain::{
    BanEntry, ObjectTag, PlayerId, PlayerKickEvent, PlayerTag, TagError, TagValue,
};

use super::{EventDispatcher, EventPhase, EventState, ScriptEvent};
use crate::engine::Engine;
use crate::host::Host;

/// What reconciliation did to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BanResolution {
    /// The ban was lifted and the kick cancelled
    Pardoned,
    Upheld {
        reason_changed: bool,
        message_changed: bool,
    },
}

#[derive(Debug, Clone)]
pub struct PlayerBannedEvent {
    state: EventState,
    player: PlayerId,
    ban: BanEntry,
    reason: Option<String>,
    kick_message: String,
}

impl PlayerBannedEvent {
    pub const NAME: &'static str = "player banned";

    /// Builds the event if `kick` correlates with a fresh ban.
    ///
    /// Returns `Ok(None)` for kicks that are already cancelled, for players
    /// without a ban entry and for bans older than `window`.
    pub fn from_kick(
        kick: &PlayerKickEvent,
        host: &Host,
        window: Duration,
    ) -> Result<Option<Self>, TagError> {
        if kick.cancelled {
            return Ok(None);
        }
        let Some(ban) = host.players.ban_entry(kick.player)? else {
            return Ok(None);
        };
        let age = host.clock.now() - ban.created;
        if age >= window {
            debug!(
                player = %kick.player,
                age_ms = age.num_milliseconds(),
                "Kick not correlated with a recent ban"
            );
            return Ok(None);
        }
        Ok(Some(Self {
            state: EventState::new(),
            player: kick.player,
            reason: ban.reason.clone(),
            ban,
            kick_message: kick.message.clone(),
        }))
    }

    pub fn player(&self) -> PlayerId {
        self.player
    }

    pub fn ban(&self) -> &BanEntry {
        &self.ban
    }

    /// Reason as currently determined.
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn kick_message(&self) -> &str {
        &self.kick_message
    }

    /// Writes the determinations back to the host and the kick.
    ///
    /// # Errors
    ///
    /// `InvalidStateTransition` unless the event has been fired and not yet
    /// reconciled; host failures otherwise.
    pub fn reconcile(
        &mut self,
        kick: &mut PlayerKickEvent,
        host: &Host,
    ) -> Result<BanResolution, TagError> {
        if self.state.phase != EventPhase::Fired {
            return Err(TagError::invalid_state_transition(format!(
                "Cannot reconcile '{}' from {:?}",
                Self::NAME,
                self.state.phase
            )));
        }

        let resolution = if self.state.cancelled {
            host.players.pardon(self.player)?;
            kick.cancelled = true;
            BanResolution::Pardoned
        } else {
            let reason_changed = self.reason != self.ban.reason;
            if reason_changed {
                host.players.add_ban(
                    self.player,
                    BanEntry {
                        reason: self.reason.clone(),
                        source: self.ban.source.clone(),
                        created: host.clock.now(),
                        expiration: self.ban.expiration,
                    },
                )?;
            }
            let message_changed = self.kick_message != kick.message;
            kick.message = self.kick_message.clone();
            BanResolution::Upheld {
                reason_changed,
                message_changed,
            }
        };
        self.state.phase = EventPhase::Resolved;
        Ok(resolution)
    }
}

impl ScriptEvent for PlayerBannedEvent {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn state(&self) -> &EventState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut EventState {
        &mut self.state
    }

    fn context(&self, name: &str) -> Option<ObjectTag> {
        match name {
            "reason" => self.reason.clone().map(ObjectTag::from),
            "duration" => Some(ObjectTag::from(self.ban.duration_label())),
            "source" => self.ban.source.clone().map(ObjectTag::from),
            "expiration" => self
                .ban
                .expiration
                .map(|expiration| ObjectTag::from(expiration.to_rfc3339())),
            "kick_message" => Some(ObjectTag::from(self.kick_message.as_str())),
            "player" => Some(ObjectTag::Player(PlayerTag(self.player))),
            _ => None,
        }
    }

    fn apply_determination(&mut self, value: &TagValue) -> bool {
        let TagValue::Element(text) = value else {
            return false;
        };
        if let Some(reason) = strip_prefix_ignore_case(text, "reason:") {
            self.reason = Some(reason.to_string());
            true
        } else if let Some(message) = strip_prefix_ignore_case(text, "message:") {
            self.kick_message = message.to_string();
            true
        } else {
            false
        }
    }
}

impl Engine {
    /// Host listener for player kicks.
    ///
    /// Fires `player banned` when the kick correlates with a fresh ban and
    /// applies the scripts' determinations. Returns `None` for ordinary kicks.
    pub fn on_player_kick(
        &self,
        dispatcher: &EventDispatcher,
        kick: &mut PlayerKickEvent,
    ) -> Result<Option<BanResolution>, TagError> {
        let Some(mut event) =
            PlayerBannedEvent::from_kick(kick, self.host(), self.config().ban_window)?
        else {
            return Ok(None);
        };

        let report = dispatcher.fire(&mut event)?;
        let resolution = event.reconcile(kick, self.host())?;
        info!(
            player = %event.player(),
            scripts_run = report.scripts_run,
            determinations = report.accepted,
            resolution = ?resolution,
            "Player banned event handled"
        );
        Ok(Some(resolution))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use mechanist_domain::ServerVersion;

    use crate::infrastructure::ports::{
        MockClockPort, MockItemPort, MockMaterialPort, MockPlayerPort,
    };

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn ban(age_ms: i64) -> BanEntry {
        BanEntry {
            reason: Some("Griefing".to_string()),
            source: Some("Console".to_string()),
            created: now() - Duration::milliseconds(age_ms),
            expiration: Some(now() + Duration::days(3)),
        }
    }

    fn host_with(players: MockPlayerPort) -> Host {
        let mut clock = MockClockPort::new();
        clock.expect_now().return_const(now());
        Host {
            items: Arc::new(MockItemPort::new()),
            materials: Arc::new(MockMaterialPort::new()),
            players: Arc::new(players),
            clock: Arc::new(clock),
            version: ServerVersion::V1_17,
        }
    }

    fn players_with_ban(entry: Option<BanEntry>) -> MockPlayerPort {
        let mut players = MockPlayerPort::new();
        players
            .expect_ban_entry()
            .returning(move |_| Ok(entry.clone()));
        players
    }

    #[test]
    fn correlates_only_recent_bans() {
        let window = Duration::milliseconds(1000);
        let kick = PlayerKickEvent::new(PlayerId::new(), "Banned");

        let recent = host_with(players_with_ban(Some(ban(999))));
        assert!(PlayerBannedEvent::from_kick(&kick, &recent, window)
            .unwrap()
            .is_some());

        let stale = host_with(players_with_ban(Some(ban(1000))));
        assert!(PlayerBannedEvent::from_kick(&kick, &stale, window)
            .unwrap()
            .is_none());

        let none = host_with(players_with_ban(None));
        assert!(PlayerBannedEvent::from_kick(&kick, &none, window)
            .unwrap()
            .is_none());
    }

    #[test]
    fn temporary_ban_context() {
        let host = host_with(players_with_ban(Some(ban(10))));
        let kick = PlayerKickEvent::new(PlayerId::new(), "See you in three days");
        let event = PlayerBannedEvent::from_kick(&kick, &host, Duration::seconds(1))
            .unwrap()
            .unwrap();

        assert_eq!(event.context("duration"), Some(ObjectTag::from("temporary")));
        assert_eq!(
            event.context("expiration"),
            Some(ObjectTag::from((now() + Duration::days(3)).to_rfc3339()))
        );
        assert_eq!(
            event.context("player"),
            Some(ObjectTag::Player(PlayerTag(kick.player)))
        );
        assert_eq!(event.context("nonsense"), None);
    }

    #[test]
    fn changed_reason_reissues_ban_with_same_source_and_expiration() {
        let original = ban(10);
        let mut players = players_with_ban(Some(original.clone()));
        let expected = BanEntry {
            reason: Some("Spamming".to_string()),
            created: now(),
            ..original
        };
        players
            .expect_add_ban()
            .withf(move |_, entry| *entry == expected)
            .times(1)
            .returning(|_, _| Ok(()));
        players.expect_pardon().never();
        let host = host_with(players);

        let mut kick = PlayerKickEvent::new(PlayerId::new(), "Griefing");
        let mut event = PlayerBannedEvent::from_kick(&kick, &host, Duration::seconds(1))
            .unwrap()
            .unwrap();
        event.state_mut().phase = EventPhase::Fired;
        assert!(event.apply_determination(&TagValue::element("reason:Spamming")));
        assert!(event.apply_determination(&TagValue::element("MESSAGE:Bye")));

        let resolution = event.reconcile(&mut kick, &host).unwrap();
        assert_eq!(
            resolution,
            BanResolution::Upheld {
                reason_changed: true,
                message_changed: true
            }
        );
        assert_eq!(kick.message, "Bye");
        assert!(!kick.cancelled);
    }

    #[test]
    fn reconcile_requires_fired_event() {
        let host = host_with(players_with_ban(Some(ban(10))));
        let mut kick = PlayerKickEvent::new(PlayerId::new(), "Banned");
        let mut event = PlayerBannedEvent::from_kick(&kick, &host, Duration::seconds(1))
            .unwrap()
            .unwrap();
        assert!(matches!(
            event.reconcile(&mut kick, &host),
            Err(TagError::InvalidStateTransition(_))
        ));
    }
}
