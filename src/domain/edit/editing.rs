use crate::domain::edit::session::{EditSession, SessionId};
use crate::domain::entities::edit::CellKey;

/// Which cell, if any, is in edit mode. Holds at most one session.
#[derive(Debug, Default)]
pub struct EditingState {
    open: Option<EditSession>,
    next_id: u64,
}

impl EditingState {
    pub fn is_editing(&self, key: &CellKey) -> bool {
        self.open
            .as_ref()
            .is_some_and(|session| session.is_open() && session.key() == key)
    }

    pub fn editing_key(&self) -> Option<&CellKey> {
        self.open
            .as_ref()
            .filter(|session| session.is_open())
            .map(EditSession::key)
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.open.as_ref()
    }

    pub fn session_for(&mut self, key: &CellKey) -> Option<&mut EditSession> {
        self.open.as_mut().filter(|session| session.key() == key)
    }

    pub fn session_by_id(&mut self, id: SessionId) -> Option<&mut EditSession> {
        self.open.as_mut().filter(|session| session.id() == id)
    }

    /// Installs a fresh, closed session for `key`. Any previous session must
    /// already have been resolved by the caller.
    pub fn open(&mut self, key: CellKey) -> &mut EditSession {
        self.next_id += 1;
        self.open.insert(EditSession::new(SessionId(self.next_id), key))
    }

    pub fn take(&mut self) -> Option<EditSession> {
        self.open.take()
    }
}
