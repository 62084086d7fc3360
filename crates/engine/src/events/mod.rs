//! Script events and the determination protocol
//!
//! An event is fired once. While it is in the `Fired` phase every script whose
//! path matches gets a chance to read context values and hand back
//! determinations. The event decides which determinations it understands;
//! cancellation is understood by every cancellable event. Once scripts have
//! run, the event reconciles its determinations with the host and moves to
//! `Resolved`.

pub mod player_banned;

pub use player_banned::{BanResolution, PlayerBannedEvent};

use indexmap::IndexMap;
use tracing::{debug, warn};

use mechanist_domain::common::{eq_ignore_case, strip_prefix_ignore_case};
use mechanist_domain::{ObjectTag, TagError, TagValue};

const PRIORITY_SWITCH: &str = "priority";
const IGNORE_CANCELLED_SWITCH: &str = "ignorecancelled";

/// A script's event line, e.g. `player banned priority:5 ignorecancelled:true`
///
/// Plain words name the event; `key:value` words are switches.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptPath {
    raw: String,
    words: Vec<String>,
    switches: IndexMap<String, String>,
    priority: i32,
    ignore_cancelled: bool,
}

impl ScriptPath {
    /// # Errors
    ///
    /// `TagError::Parse` for an empty event name or invalid `priority` /
    /// `ignorecancelled` values.
    pub fn parse(text: &str) -> Result<Self, TagError> {
        let mut words = Vec::new();
        let mut switches = IndexMap::new();
        for word in text.split_whitespace() {
            match word.split_once(':') {
                Some((key, value)) => {
                    switches.insert(key.to_ascii_lowercase(), value.to_string());
                }
                None => words.push(word.to_ascii_lowercase()),
            }
        }
        if words.is_empty() {
            return Err(TagError::parse(format!("No event name in '{}'", text.trim())));
        }

        let priority = match switches.get(PRIORITY_SWITCH) {
            Some(value) => value.parse::<i32>().map_err(|_| {
                TagError::parse(format!("Invalid priority '{}' in '{}'", value, text.trim()))
            })?,
            None => 0,
        };
        let ignore_cancelled = match switches.get(IGNORE_CANCELLED_SWITCH) {
            Some(value) => TagValue::element(value.as_str()).as_bool().ok_or_else(|| {
                TagError::parse(format!(
                    "Invalid ignorecancelled '{}' in '{}'",
                    value,
                    text.trim()
                ))
            })?,
            None => false,
        };

        Ok(Self {
            raw: text.trim().to_string(),
            words,
            switches,
            priority,
            ignore_cancelled,
        })
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn switch(&self, key: &str) -> Option<&str> {
        self.switches
            .iter()
            .find(|(k, _)| eq_ignore_case(k, key))
            .map(|(_, v)| v.as_str())
    }

    /// Lower runs first. Defaults to 0.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn ignore_cancelled(&self) -> bool {
        self.ignore_cancelled
    }

    /// Whether the event words name `event` (case-insensitive).
    pub fn matches(&self, event: &str) -> bool {
        let mut expected = event.split_whitespace();
        self.words
            .iter()
            .all(|word| expected.next().is_some_and(|e| eq_ignore_case(word, e)))
            && expected.next().is_none()
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPhase {
    Pending,
    Fired,
    Resolved,
}

/// Lifecycle state shared by every event
#[derive(Debug, Clone, PartialEq)]
pub struct EventState {
    pub phase: EventPhase,
    pub cancelled: bool,
    /// Determinations accepted so far, in order
    pub accepted: Vec<String>,
}

impl EventState {
    pub fn new() -> Self {
        Self {
            phase: EventPhase::Pending,
            cancelled: false,
            accepted: Vec::new(),
        }
    }
}

impl Default for EventState {
    fn default() -> Self {
        Self::new()
    }
}

/// An event scripts can observe and influence
pub trait ScriptEvent {
    fn name(&self) -> &'static str;

    fn state(&self) -> &EventState;

    fn state_mut(&mut self) -> &mut EventState;

    /// Event-specific context value.
    fn context(&self, name: &str) -> Option<ObjectTag>;

    /// Applies an event-specific determination. Returns `false` when the
    /// value is not part of this event's grammar.
    fn apply_determination(&mut self, value: &TagValue) -> bool;

    fn is_cancellable(&self) -> bool {
        true
    }
}

/// One script's view of a firing event
pub struct EventFiring<'a> {
    event: &'a mut dyn ScriptEvent,
    script: &'a str,
    accepted: usize,
    rejected: usize,
}

impl<'a> EventFiring<'a> {
    pub fn new(event: &'a mut dyn ScriptEvent, script: &'a str) -> Self {
        Self {
            event,
            script,
            accepted: 0,
            rejected: 0,
        }
    }

    pub fn event_name(&self) -> &'static str {
        self.event.name()
    }

    /// Reads a context value. Event values shadow the base `cancelled` value.
    pub fn context(&self, name: &str) -> Option<ObjectTag> {
        let name = name.trim().to_ascii_lowercase();
        self.event.context(&name).or_else(|| match name.as_str() {
            "cancelled" => Some(ObjectTag::from(self.event.state().cancelled)),
            _ => None,
        })
    }

    /// Hands a determination to the event. Returns whether it was accepted.
    pub fn determine(&mut self, value: impl Into<TagValue>) -> bool {
        let value = value.into();
        let text = value.as_text();

        if self.event.state().phase != EventPhase::Fired {
            warn!(
                script = self.script,
                event = self.event.name(),
                determination = %text,
                phase = ?self.event.state().phase,
                "Determination outside of firing"
            );
            self.rejected += 1;
            return false;
        }

        let accepted = self.event.apply_determination(&value) || self.apply_base(&text);
        if accepted {
            debug!(
                script = self.script,
                event = self.event.name(),
                determination = %text,
                "Determination accepted"
            );
            self.event.state_mut().accepted.push(text);
            self.accepted += 1;
        } else {
            warn!(
                script = self.script,
                event = self.event.name(),
                determination = %text,
                "Unrecognized determination"
            );
            self.rejected += 1;
        }
        accepted
    }

    fn apply_base(&mut self, text: &str) -> bool {
        if !self.event.is_cancellable() {
            return false;
        }
        let text = text.trim();
        let cancelled = if eq_ignore_case(text, "cancelled") {
            Some(true)
        } else {
            strip_prefix_ignore_case(text, "cancelled:")
                .and_then(|rest| TagValue::element(rest).as_bool())
        };
        match cancelled {
            Some(cancelled) => {
                self.event.state_mut().cancelled = cancelled;
                true
            }
            None => false,
        }
    }
}

/// A script listening for events
pub trait EventScript: Send + Sync {
    fn name(&self) -> &str;

    fn path(&self) -> &ScriptPath;

    fn run(&self, firing: &mut EventFiring<'_>);
}

/// [`EventScript`] backed by a closure
pub struct FnScript<F> {
    name: String,
    path: ScriptPath,
    body: F,
}

impl<F> FnScript<F>
where
    F: Fn(&mut EventFiring<'_>) + Send + Sync,
{
    pub fn new(name: impl Into<String>, path: &str, body: F) -> Result<Self, TagError> {
        Ok(Self {
            name: name.into(),
            path: ScriptPath::parse(path)?,
            body,
        })
    }
}

impl<F> EventScript for FnScript<F>
where
    F: Fn(&mut EventFiring<'_>) + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> &ScriptPath {
        &self.path
    }

    fn run(&self, firing: &mut EventFiring<'_>) {
        (self.body)(firing)
    }
}

/// Outcome of one [`EventDispatcher::fire`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FireReport {
    pub scripts_run: usize,
    pub accepted: usize,
    pub rejected: usize,
}

/// Scripts ordered by priority, ties in registration order
#[derive(Default)]
pub struct EventDispatcher {
    scripts: Vec<Box<dyn EventScript>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, script: impl EventScript + 'static) {
        debug!(
            script = script.name(),
            path = script.path().as_str(),
            "Registered event script"
        );
        self.scripts.push(Box::new(script));
        self.scripts.sort_by_key(|s| s.path().priority());
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    /// Runs every matching script against `event`.
    ///
    /// # Errors
    ///
    /// `TagError::InvalidStateTransition` if the event was already fired.
    pub fn fire(&self, event: &mut dyn ScriptEvent) -> Result<FireReport, TagError> {
        if event.state().phase != EventPhase::Pending {
            return Err(TagError::invalid_state_transition(format!(
                "Event '{}' cannot be fired from {:?}",
                event.name(),
                event.state().phase
            )));
        }
        event.state_mut().phase = EventPhase::Fired;

        let name = event.name();
        let mut report = FireReport::default();
        for script in self.scripts.iter().filter(|s| s.path().matches(name)) {
            if event.state().cancelled && !script.path().ignore_cancelled() {
                debug!(
                    script = script.name(),
                    event = name,
                    "Skipping script for cancelled event"
                );
                continue;
            }
            let mut firing = EventFiring::new(&mut *event, script.name());
            script.run(&mut firing);
            report.scripts_run += 1;
            report.accepted += firing.accepted;
            report.rejected += firing.rejected;
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::Mutex;

    struct TestEvent {
        state: EventState,
        note: Option<String>,
    }

    impl TestEvent {
        fn new() -> Self {
            Self {
                state: EventState::new(),
                note: None,
            }
        }
    }

    impl ScriptEvent for TestEvent {
        fn name(&self) -> &'static str {
            "thing happens"
        }

        fn state(&self) -> &EventState {
            &self.state
        }

        fn state_mut(&mut self) -> &mut EventState {
            &mut self.state
        }

        fn context(&self, name: &str) -> Option<ObjectTag> {
            match name {
                "note" => self.note.clone().map(ObjectTag::from),
                _ => None,
            }
        }

        fn apply_determination(&mut self, value: &TagValue) -> bool {
            match strip_prefix_ignore_case(&value.as_text(), "note:") {
                Some(rest) => {
                    self.note = Some(rest.to_string());
                    true
                }
                None => false,
            }
        }
    }

    #[test]
    fn path_parses_words_and_switches() {
        let path = ScriptPath::parse("Player Banned priority:-5 ignorecancelled:TRUE").unwrap();
        assert_eq!(path.words(), ["player", "banned"]);
        assert_eq!(path.priority(), -5);
        assert!(path.ignore_cancelled());
        assert_eq!(path.switch("PRIORITY"), Some("-5"));
        assert!(path.matches("player banned"));
        assert!(!path.matches("player"));
        assert!(!path.matches("player banned twice"));
    }

    #[test]
    fn path_rejects_bad_switch_values() {
        assert!(matches!(ScriptPath::parse("x priority:high"), Err(TagError::Parse(_))));
        assert!(matches!(ScriptPath::parse("x ignorecancelled:maybe"), Err(TagError::Parse(_))));
        assert!(ScriptPath::parse("priority:1").is_err());
    }

    #[test]
    fn determinations_use_event_then_base_grammar() {
        let mut event = TestEvent::new();
        event.state.phase = EventPhase::Fired;
        let mut firing = EventFiring::new(&mut event, "test");

        assert!(firing.determine("NOTE:hello"));
        assert_eq!(firing.context("note"), Some(ObjectTag::from("hello")));
        assert_eq!(firing.context("cancelled"), Some(ObjectTag::from(false)));
        assert!(firing.determine("cancelled"));
        assert_eq!(firing.context("cancelled"), Some(ObjectTag::from(true)));
        assert!(firing.determine("cancelled:false"));
        assert!(!firing.determine("explode"));
        assert_eq!((firing.accepted, firing.rejected), (3, 1));

        assert!(!event.state.cancelled);
        assert_eq!(event.state.accepted, ["NOTE:hello", "cancelled", "cancelled:false"]);
    }

    #[test]
    fn determining_outside_firing_is_rejected() {
        let mut event = TestEvent::new();
        let mut firing = EventFiring::new(&mut event, "test");
        assert!(!firing.determine("cancelled"));
        assert!(!event.state.cancelled);
    }

    #[test]
    fn scripts_run_in_priority_order_and_skip_when_cancelled() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = EventDispatcher::new();

        let log = order.clone();
        dispatcher.register(
            FnScript::new("late", "thing happens priority:10", move |_| {
                log.lock().unwrap().push("late")
            })
            .unwrap(),
        );
        let log = order.clone();
        dispatcher.register(
            FnScript::new("canceller", "thing happens priority:-1", move |firing| {
                log.lock().unwrap().push("canceller");
                firing.determine("cancelled");
            })
            .unwrap(),
        );
        let log = order.clone();
        dispatcher.register(
            FnScript::new("monitor", "thing happens priority:10 ignorecancelled:true", move |_| {
                log.lock().unwrap().push("monitor")
            })
            .unwrap(),
        );
        dispatcher.register(FnScript::new("other", "other event", |_| panic!("not matched")).unwrap());

        let mut event = TestEvent::new();
        let report = dispatcher.fire(&mut event).unwrap();

        assert_eq!(*order.lock().unwrap(), ["canceller", "monitor"]);
        assert_eq!(
            report,
            FireReport {
                scripts_run: 2,
                accepted: 1,
                rejected: 0
            }
        );
        assert_eq!(event.state.phase, EventPhase::Fired);
    }

    #[test]
    fn firing_twice_is_rejected() {
        let dispatcher = EventDispatcher::new();
        let mut event = TestEvent::new();
        dispatcher.fire(&mut event).unwrap();
        assert!(matches!(
            dispatcher.fire(&mut event),
            Err(TagError::InvalidStateTransition(_))
        ));
    }
}
