use tracing::debug;

use crate::domain::entities::edit::{CellKey, RawValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Closed,
    Open,
    Committing,
    Cancelling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Commit,
    Cancel,
}

/// Side effects the grid host must carry out on the core's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEffect {
    /// Focus the edit surface of this cell and select its text, once it is mounted.
    FocusAndSelect(CellKey),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Committed {
        key: CellKey,
        initial_value: RawValue,
        new_value: RawValue,
    },
    Cancelled {
        key: CellKey,
    },
}

impl SessionOutcome {
    pub fn key(&self) -> &CellKey {
        match self {
            SessionOutcome::Committed { key, .. } | SessionOutcome::Cancelled { key } => key,
        }
    }

    pub fn is_commit(&self) -> bool {
        matches!(self, SessionOutcome::Committed { .. })
    }
}

/// State machine for one open edit interaction on one cell.
///
/// `Closed -> Open -> {Committing, Cancelling} -> Closed`. Resolution happens at
/// most once per opening; every later `resolve` is ignored.
#[derive(Debug, Clone)]
pub struct EditSession {
    id: SessionId,
    key: CellKey,
    state: SessionState,
    initial_value: RawValue,
    draft_value: RawValue,
    changed: bool,
    resolved: bool,
}

impl EditSession {
    pub fn new(id: SessionId, key: CellKey) -> Self {
        Self {
            id,
            key,
            state: SessionState::Closed,
            initial_value: String::new(),
            draft_value: String::new(),
            changed: false,
            resolved: false,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn key(&self) -> &CellKey {
        &self.key
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    pub fn draft_value(&self) -> &str {
        &self.draft_value
    }

    pub fn initial_value(&self) -> &str {
        &self.initial_value
    }

    pub fn changed(&self) -> bool {
        self.changed
    }

    pub fn resolved(&self) -> bool {
        self.resolved
    }

    /// Opens the session. Returns the focus request the host must run after the
    /// edit surface is mounted, or `None` if the session was not closed.
    pub fn start(&mut self, initial_value: impl Into<RawValue>) -> Option<HostEffect> {
        if self.state != SessionState::Closed {
            return None;
        }
        let initial_value = initial_value.into();
        self.draft_value = initial_value.clone();
        self.initial_value = initial_value;
        self.changed = false;
        self.resolved = false;
        self.state = SessionState::Open;
        debug!(session = self.id.0, cell = %self.key, "edit session opened");
        Some(HostEffect::FocusAndSelect(self.key.clone()))
    }

    pub fn update(&mut self, draft: impl Into<RawValue>) -> bool {
        if self.state != SessionState::Open || self.resolved {
            return false;
        }
        self.draft_value = draft.into();
        self.changed = self.draft_value != self.initial_value;
        true
    }

    /// Resolution for a signal that does not express intent on its own
    /// (focus loss, another cell being opened).
    pub fn implied_resolution(&self) -> Resolution {
        if self.changed {
            Resolution::Commit
        } else {
            Resolution::Cancel
        }
    }

    pub fn resolve(&mut self, kind: Resolution) -> Option<SessionOutcome> {
        if self.state != SessionState::Open || self.resolved {
            return None;
        }
        self.resolved = true;

        let kind = match kind {
            Resolution::Commit if !self.changed => Resolution::Cancel,
            other => other,
        };

        let outcome = match kind {
            Resolution::Commit => {
                self.state = SessionState::Committing;
                SessionOutcome::Committed {
                    key: self.key.clone(),
                    initial_value: self.initial_value.clone(),
                    new_value: self.draft_value.clone(),
                }
            }
            Resolution::Cancel => {
                self.state = SessionState::Cancelling;
                SessionOutcome::Cancelled {
                    key: self.key.clone(),
                }
            }
        };
        debug!(session = self.id.0, cell = %self.key, ?kind, "edit session resolved");
        Some(outcome)
    }

    /// Escape: drop the draft so a later re-open starts clean, then cancel.
    pub fn cancel_and_reset(&mut self) -> Option<SessionOutcome> {
        if self.state != SessionState::Open || self.resolved {
            return None;
        }
        self.draft_value = self.initial_value.clone();
        self.changed = false;
        self.resolve(Resolution::Cancel)
    }

    pub fn close(&mut self) {
        if matches!(
            self.state,
            SessionState::Committing | SessionState::Cancelling
        ) {
            self.state = SessionState::Closed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(initial: &str) -> EditSession {
        let mut session = EditSession::new(SessionId(1), CellKey::new("0", "name"));
        session.start(initial);
        session
    }

    #[test]
    fn start_requests_focus_and_seeds_draft() {
        let mut session = EditSession::new(SessionId(7), CellKey::new("3", "city"));

        let effect = session.start("Paris");

        assert_eq!(
            effect,
            Some(HostEffect::FocusAndSelect(CellKey::new("3", "city")))
        );
        assert_eq!(session.state(), SessionState::Open);
        assert_eq!(session.draft_value(), "Paris");
        assert!(!session.changed());
        assert!(!session.resolved());
    }

    #[test]
    fn update_uses_exact_string_comparison() {
        let mut session = open("Paris");

        session.update("Paris ");
        assert!(session.changed());
        session.update("paris");
        assert!(session.changed());
        session.update("Paris");
        assert!(!session.changed());
    }

    #[test]
    fn update_and_resolve_are_noops_while_closed() {
        let mut session = EditSession::new(SessionId(1), CellKey::new("0", "a"));

        assert!(!session.update("x"));
        assert_eq!(session.resolve(Resolution::Commit), None);
        assert_eq!(session.state(), SessionState::Closed);
    }

    #[test]
    fn commit_of_unchanged_value_is_downgraded_to_cancel() {
        let mut session = open("x");

        let outcome = session.resolve(Resolution::Commit);

        assert_eq!(
            outcome,
            Some(SessionOutcome::Cancelled {
                key: CellKey::new("0", "name")
            })
        );
        assert_eq!(session.state(), SessionState::Cancelling);
    }

    #[test]
    fn resolve_only_takes_effect_once() {
        let mut session = open("x");
        session.update("y");

        let first = session.resolve(Resolution::Commit);
        let second = session.resolve(Resolution::Cancel);
        let third = session.resolve(Resolution::Commit);

        assert!(first.is_some_and(|outcome| outcome.is_commit()));
        assert_eq!(second, None);
        assert_eq!(third, None);
        assert_eq!(session.state(), SessionState::Committing);
    }

    #[test]
    fn escape_resets_draft_before_cancelling() {
        let mut session = open("x");
        session.update("typed");

        let outcome = session.cancel_and_reset();

        assert!(outcome.is_some_and(|outcome| !outcome.is_commit()));
        assert_eq!(session.draft_value(), "x");
        assert!(!session.changed());
    }

    #[test]
    fn implied_resolution_follows_changed_flag() {
        let mut session = open("x");
        assert_eq!(session.implied_resolution(), Resolution::Cancel);
        session.update("y");
        assert_eq!(session.implied_resolution(), Resolution::Commit);
    }

    #[test]
    fn close_then_restart_starts_clean() {
        let mut session = open("x");
        session.update("y");
        session.resolve(Resolution::Commit);
        session.close();

        assert_eq!(session.state(), SessionState::Closed);
        assert!(session.start("y").is_some());
        assert!(!session.resolved());
        assert!(!session.changed());
        assert_eq!(session.draft_value(), "y");
    }
}
