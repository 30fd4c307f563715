use std::collections::VecDeque;

use tracing::debug;

use crate::domain::edit::session::SessionId;
use crate::domain::entities::edit::CellKey;

/// Where an interaction event landed, as reported by the grid host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// The input surface of an open edit.
    EditSurface(CellKey),
    /// A cell in display mode (its click-to-edit control).
    Cell(CellKey),
    /// Anything else: toolbar, dialogs, page background.
    Outside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    Enter,
    Escape,
    Tab,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    FocusOut,
    PointerDown,
    TabKey,
}

const ALL_CHANNELS: [Channel; 3] = [Channel::FocusOut, Channel::PointerDown, Channel::TabKey];

/// The single "interaction ended" event for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionEnded {
    pub session: SessionId,
    pub channel: Channel,
}

/// What the detector did with a pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerDisposition {
    Ignored,
    /// Resolution claimed; delivered by the next `drain_deferred`.
    Deferred(SessionId),
}

#[derive(Debug, Clone)]
struct Subscription {
    session: SessionId,
    region: CellKey,
    armed: Vec<Channel>,
}

impl Subscription {
    fn contains(&self, target: &Target) -> bool {
        matches!(target, Target::EditSurface(key) if *key == self.region)
    }

    fn is_armed(&self, channel: Channel) -> bool {
        self.armed.contains(&channel)
    }

    /// First fire wins: disarm every channel so the others become no-ops.
    fn claim(&mut self) -> bool {
        if self.armed.is_empty() {
            return false;
        }
        self.armed.clear();
        true
    }
}

/// Reduces blur, outside pointer-down and Tab navigation into one event per
/// session.
#[derive(Debug, Default)]
pub struct FocusLossDetector {
    active: Option<Subscription>,
    deferred: VecDeque<InteractionEnded>,
}

impl FocusLossDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn watch(&mut self, session: SessionId, region: CellKey) {
        if let Some(previous) = self.active.take() {
            self.drop_deferred(previous.session);
        }
        debug!(session = session.0, cell = %region, "focus monitoring started");
        self.active = Some(Subscription {
            session,
            region,
            armed: ALL_CHANNELS.to_vec(),
        });
    }

    /// Unsubscribes all channels for `session`, including a pending deferred
    /// delivery. Safe to call for sessions that are not being watched.
    pub fn teardown(&mut self, session: SessionId) {
        if self.active.as_ref().is_some_and(|sub| sub.session == session) {
            self.active = None;
            debug!(session = session.0, "focus monitoring torn down");
        }
        self.drop_deferred(session);
    }

    pub fn watching(&self) -> Option<SessionId> {
        self.active.as_ref().map(|sub| sub.session)
    }

    /// True once any channel (or a keyboard terminator) has claimed the session.
    pub fn handled(&self) -> bool {
        self.active.as_ref().is_some_and(|sub| sub.armed.is_empty())
    }

    pub fn has_deferred(&self) -> bool {
        !self.deferred.is_empty()
    }

    /// Channel A. The host reports focus leaving the edit surface; moves
    /// between elements inside the surface are not reported.
    pub fn focus_out(&mut self) -> Option<InteractionEnded> {
        let sub = self.active.as_mut()?;
        if !sub.is_armed(Channel::FocusOut) {
            return None;
        }
        sub.claim().then_some(InteractionEnded {
            session: sub.session,
            channel: Channel::FocusOut,
        })
    }

    /// Channel B. Claims the session now, but delivery waits one tick so the
    /// pointer-down's own target handles its click first.
    pub fn pointer_down(&mut self, target: &Target) -> PointerDisposition {
        let Some(sub) = self.active.as_mut() else {
            return PointerDisposition::Ignored;
        };
        if !sub.is_armed(Channel::PointerDown) || sub.contains(target) {
            return PointerDisposition::Ignored;
        }
        if !sub.claim() {
            return PointerDisposition::Ignored;
        }
        let session = sub.session;
        self.deferred.push_back(InteractionEnded {
            session,
            channel: Channel::PointerDown,
        });
        debug!(session = session.0, "outside pointer-down deferred one tick");
        PointerDisposition::Deferred(session)
    }

    /// Channel C. `focus` is the element that had focus when the key arrived.
    pub fn key_down(&mut self, key: KeyPress, focus: &Target) -> Option<InteractionEnded> {
        if key != KeyPress::Tab {
            return None;
        }
        let sub = self.active.as_mut()?;
        if !sub.is_armed(Channel::TabKey) || sub.contains(focus) {
            return None;
        }
        sub.claim().then_some(InteractionEnded {
            session: sub.session,
            channel: Channel::TabKey,
        })
    }

    /// Claims the session for an explicit keyboard terminator (Enter/Escape)
    /// typed into the surface. Returns false if a channel already fired.
    pub fn claim_for_keyboard(&mut self, session: SessionId) -> bool {
        match self.active.as_mut() {
            Some(sub) if sub.session == session => sub.claim(),
            _ => false,
        }
    }

    /// Runs one scheduling tick: hands back deferred deliveries queued before it.
    pub fn drain_deferred(&mut self) -> Vec<InteractionEnded> {
        self.deferred.drain(..).collect()
    }

    fn drop_deferred(&mut self, session: SessionId) {
        self.deferred.retain(|ended| ended.session != session);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> CellKey {
        CellKey::new("0", "name")
    }

    fn watching() -> FocusLossDetector {
        let mut detector = FocusLossDetector::new();
        detector.watch(SessionId(1), key());
        detector
    }

    #[test]
    fn focus_leaving_surface_fires_once() {
        let mut detector = watching();

        let first = detector.focus_out();
        let second = detector.focus_out();

        assert_eq!(
            first,
            Some(InteractionEnded {
                session: SessionId(1),
                channel: Channel::FocusOut
            })
        );
        assert_eq!(second, None);
    }

    #[test]
    fn first_channel_disables_the_others() {
        let mut detector = watching();

        assert!(detector.key_down(KeyPress::Tab, &Target::Outside).is_some());
        assert_eq!(
            detector.pointer_down(&Target::Outside),
            PointerDisposition::Ignored
        );
        assert_eq!(detector.focus_out(), None);
        assert!(detector.drain_deferred().is_empty());
    }

    #[test]
    fn pointer_down_outside_is_delivered_on_next_tick() {
        let mut detector = watching();

        let disposition = detector.pointer_down(&Target::Cell(CellKey::new("1", "name")));

        assert_eq!(disposition, PointerDisposition::Deferred(SessionId(1)));
        assert!(detector.handled());
        assert_eq!(detector.focus_out(), None);
        assert_eq!(
            detector.drain_deferred(),
            vec![InteractionEnded {
                session: SessionId(1),
                channel: Channel::PointerDown
            }]
        );
        assert!(detector.drain_deferred().is_empty());
    }

    #[test]
    fn pointer_down_inside_surface_is_ignored() {
        let mut detector = watching();

        assert_eq!(
            detector.pointer_down(&Target::EditSurface(key())),
            PointerDisposition::Ignored
        );
        assert!(!detector.handled());
    }

    #[test]
    fn tab_only_counts_when_focus_is_outside_region() {
        let mut detector = watching();

        assert_eq!(detector.key_down(KeyPress::Tab, &Target::EditSurface(key())), None);
        assert_eq!(detector.key_down(KeyPress::Enter, &Target::Outside), None);
        assert!(detector.key_down(KeyPress::Tab, &Target::Outside).is_some());
    }

    #[test]
    fn keyboard_claim_blocks_later_channels() {
        let mut detector = watching();

        assert!(detector.claim_for_keyboard(SessionId(1)));
        assert!(!detector.claim_for_keyboard(SessionId(1)));
        assert_eq!(detector.focus_out(), None);
    }

    #[test]
    fn teardown_drops_pending_deferred_delivery() {
        let mut detector = watching();
        detector.pointer_down(&Target::Outside);

        detector.teardown(SessionId(1));

        assert_eq!(detector.watching(), None);
        assert!(detector.drain_deferred().is_empty());
        assert_eq!(detector.focus_out(), None);
    }

    #[test]
    fn watching_new_session_replaces_previous_subscription() {
        let mut detector = watching();
        detector.pointer_down(&Target::Outside);

        detector.watch(SessionId(2), CellKey::new("5", "name"));

        assert_eq!(detector.watching(), Some(SessionId(2)));
        assert!(!detector.has_deferred());
        assert!(!detector.handled());
    }
}
