use tracing::{debug, info, warn};

use crate::domain::edit::editing::EditingState;
use crate::domain::edit::focus::{FocusLossDetector, KeyPress, PointerDisposition, Target};
use crate::domain::edit::ledger::DirtyLedger;
use crate::domain::edit::session::{HostEffect, Resolution, SessionId, SessionOutcome};
use crate::domain::entities::dataset::{DatasetId, GridData};
use crate::domain::entities::edit::{CellKey, ChangeRecord};
use crate::usecase::ports::commit_sink::{CommitBatch, CommitError, CommitSink};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellView {
    Editing { draft: String },
    Display { value: String, dirty: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchDecision {
    /// Nothing pending; the host may load the dataset right away.
    Proceed(DatasetId),
    /// The host must ask the user, then call `confirm_dataset_switch` or
    /// `cancel_dataset_switch`.
    ConfirmationRequired(DatasetId),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SaveError {
    #[error("there are no unsaved changes")]
    NothingToSave,
    #[error("a save is already in progress")]
    AlreadySaving,
    #[error(transparent)]
    Rejected(#[from] CommitError),
}

/// A save that has been started but not yet acknowledged by the commit sink.
#[derive(Debug, Clone)]
pub struct SaveTicket {
    generation: u64,
    batch: CommitBatch,
}

impl SaveTicket {
    pub fn batch(&self) -> &CommitBatch {
        &self.batch
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveSummary {
    pub changes: Vec<ChangeRecord>,
}

impl SaveSummary {
    pub fn count_label(&self) -> String {
        let count = self.changes.len();
        if count == 1 {
            "1 modification".to_string()
        } else {
            format!("{count} modifications")
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Termination {
    Explicit(Resolution),
    /// Commit if the draft changed, cancel otherwise.
    Implied,
    /// Escape: reset the draft, then cancel.
    Escape,
}

/// Owns the editing state, the focus-loss detector and the dirty ledger for one
/// grid, and is the only thing that mutates them.
#[derive(Debug, Default)]
pub struct GridEditController {
    grid: GridData,
    editing: EditingState,
    detector: FocusLossDetector,
    ledger: DirtyLedger,
    effects: Vec<HostEffect>,
    pending_switch: Option<DatasetId>,
    saving: bool,
    generation: u64,
}

impl GridEditController {
    pub fn new(grid: GridData) -> Self {
        Self {
            grid,
            ..Self::default()
        }
    }

    /// Binds a new dataset. Any open edit is dropped and the ledger starts empty.
    pub fn bind_dataset(&mut self, grid: GridData) {
        self.discard_open_session();
        self.ledger.clear();
        self.pending_switch = None;
        self.saving = false;
        self.generation += 1;
        info!(
            dataset = ?grid.dataset_id,
            rows = grid.row_count(),
            columns = grid.columns.len(),
            "dataset bound to grid"
        );
        self.grid = grid;
    }

    pub fn grid(&self) -> &GridData {
        &self.grid
    }

    pub fn ledger(&self) -> &DirtyLedger {
        &self.ledger
    }

    pub fn is_editing(&self, key: &CellKey) -> bool {
        self.editing.is_editing(key)
    }

    pub fn editing_key(&self) -> Option<&CellKey> {
        self.editing.editing_key()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.ledger.size() > 0
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn pending_switch(&self) -> Option<DatasetId> {
        self.pending_switch
    }

    pub fn cell_view(&self, key: &CellKey) -> CellView {
        if let Some(session) = self.editing.session().filter(|s| s.is_open() && s.key() == key) {
            return CellView::Editing {
                draft: session.draft_value().to_string(),
            };
        }
        CellView::Display {
            value: self.grid.value(key).unwrap_or_default().to_string(),
            dirty: self.ledger.contains(key),
        }
    }

    /// Host effects queued since the last call, in order.
    pub fn take_effects(&mut self) -> Vec<HostEffect> {
        std::mem::take(&mut self.effects)
    }

    pub fn start_edit(&mut self, key: CellKey) -> bool {
        if !self.grid.contains(&key) {
            warn!(cell = %key, "start_edit for a cell outside the bound dataset");
            return false;
        }
        if self.editing.is_editing(&key) {
            return true;
        }
        if let Some(open) = self.open_session_id() {
            self.resolve_session(open, Termination::Implied);
        }

        let initial = self.grid.value(&key).unwrap_or_default().to_string();
        let session = self.editing.open(key.clone());
        let id = session.id();
        if let Some(effect) = session.start(initial) {
            self.effects.push(effect);
        }
        self.detector.watch(id, key);
        true
    }

    /// Replaces the draft of the open edit. Rejected once a focus-loss channel
    /// has claimed the session, so a deferred resolution sees a frozen draft.
    pub fn update_draft(&mut self, key: &CellKey, draft: impl Into<String>) -> bool {
        if self.detector.handled() {
            return false;
        }
        match self.editing.session_for(key) {
            Some(session) => session.update(draft),
            None => false,
        }
    }

    pub fn save_edit(&mut self, key: &CellKey, new_value: impl Into<String>) -> Option<SessionOutcome> {
        let session = self.editing.session_for(key)?;
        let id = session.id();
        session.update(new_value);
        self.resolve_session(id, Termination::Explicit(Resolution::Commit))
    }

    pub fn cancel_edit(&mut self, key: &CellKey) -> Option<SessionOutcome> {
        let id = self.editing.session_for(key)?.id();
        self.resolve_session(id, Termination::Explicit(Resolution::Cancel))
    }

    /// A key typed into the open edit surface. Enter commits, Escape cancels.
    pub fn editor_key(&mut self, key: KeyPress) -> Option<SessionOutcome> {
        let termination = match key {
            KeyPress::Enter => Termination::Explicit(Resolution::Commit),
            KeyPress::Escape => Termination::Escape,
            KeyPress::Tab | KeyPress::Other => return None,
        };
        let id = self.open_session_id()?;
        if !self.detector.claim_for_keyboard(id) {
            return None;
        }
        self.resolve_session(id, termination)
    }

    /// Focus left the edit surface of the open cell.
    pub fn focus_out(&mut self) -> Option<SessionOutcome> {
        let ended = self.detector.focus_out()?;
        debug!(session = ended.session.0, channel = ?ended.channel, "interaction ended");
        self.resolve_session(ended.session, Termination::Implied)
    }

    /// Pointer pressed somewhere. Resolution, if any, lands on `run_deferred`.
    pub fn pointer_down(&mut self, target: Target) -> PointerDisposition {
        self.detector.pointer_down(&target)
    }

    /// A key pressed while `focus` held the focus, outside the edit surface's
    /// own key handling.
    pub fn key_down(&mut self, key: KeyPress, focus: Target) -> Option<SessionOutcome> {
        let ended = self.detector.key_down(key, &focus)?;
        debug!(session = ended.session.0, channel = ?ended.channel, "interaction ended");
        self.resolve_session(ended.session, Termination::Implied)
    }

    /// One scheduling tick. The host calls this after the event that queued a
    /// deferred resolution has finished dispatching.
    pub fn run_deferred(&mut self) -> Vec<SessionOutcome> {
        self.detector
            .drain_deferred()
            .into_iter()
            .filter_map(|ended| {
                debug!(session = ended.session.0, channel = ?ended.channel, "interaction ended");
                self.resolve_session(ended.session, Termination::Implied)
            })
            .collect()
    }

    /// Cancels any open edit, restores every dirty cell to its original value
    /// and empties the ledger. Returns how many cells were restored.
    pub fn revert_all(&mut self) -> usize {
        if let Some(open) = self.open_session_id() {
            self.resolve_session(open, Termination::Explicit(Resolution::Cancel));
        }
        let restored = self.restore_originals();
        info!(count = restored, "reverted pending changes");
        restored
    }

    pub fn request_dataset_switch(&mut self, target: DatasetId) -> SwitchDecision {
        self.flush_open_session();
        if self.has_unsaved_changes() {
            info!(
                target = target.0,
                pending = self.ledger.size(),
                "dataset switch needs confirmation"
            );
            self.pending_switch = Some(target);
            SwitchDecision::ConfirmationRequired(target)
        } else {
            self.pending_switch = None;
            SwitchDecision::Proceed(target)
        }
    }

    /// Discards pending changes and hands back the dataset to load. The host
    /// finishes the switch with `bind_dataset`. Until then the current grid
    /// shows its original values, so a failed load leaves nothing stale on screen.
    pub fn confirm_dataset_switch(&mut self) -> Option<DatasetId> {
        let target = self.pending_switch.take()?;
        self.discard_open_session();
        self.restore_originals();
        info!(target = target.0, "dataset switch confirmed, pending changes discarded");
        Some(target)
    }

    pub fn cancel_dataset_switch(&mut self) {
        if let Some(target) = self.pending_switch.take() {
            debug!(target = target.0, "dataset switch cancelled");
        }
    }

    pub fn save_summary(&self) -> SaveSummary {
        SaveSummary {
            changes: self.change_records(),
        }
    }

    /// Snapshots the ledger for the commit sink. The grid stays editable while
    /// the ticket is outstanding.
    pub fn begin_save(&mut self) -> Result<SaveTicket, SaveError> {
        if self.saving {
            return Err(SaveError::AlreadySaving);
        }
        self.flush_open_session();
        if !self.has_unsaved_changes() {
            return Err(SaveError::NothingToSave);
        }
        self.saving = true;
        let batch = CommitBatch {
            dataset_id: self.grid.dataset_id,
            changes: self.change_records(),
        };
        info!(count = batch.changes.len(), "save started");
        Ok(SaveTicket {
            generation: self.generation,
            batch,
        })
    }

    /// Applies the sink's verdict. On failure the ledger is untouched.
    pub fn finish_save(
        &mut self,
        ticket: SaveTicket,
        result: Result<(), CommitError>,
    ) -> Result<usize, SaveError> {
        let count = ticket.batch.changes.len();
        if ticket.generation != self.generation {
            warn!("save finished after the grid switched datasets; ledger left alone");
            return result.map(|_| count).map_err(SaveError::from);
        }
        self.saving = false;

        if let Err(err) = result {
            warn!(error = %err, pending = self.ledger.size(), "save failed, changes kept");
            return Err(SaveError::Rejected(err));
        }

        for change in &ticket.batch.changes {
            let key = change.key();
            if self.ledger.contains(&key) {
                self.ledger.rebase(&key, &change.new_value);
            } else if let Some(displayed) = self
                .grid
                .value(&key)
                .filter(|displayed| *displayed != change.new_value)
                .map(str::to_string)
            {
                // Edited back to the old baseline while the save was in flight.
                self.ledger
                    .record_commit(key, change.new_value.clone(), displayed);
            }
        }
        info!(count, remaining = self.ledger.size(), "save committed");
        Ok(count)
    }

    pub async fn confirm_save(&mut self, sink: &dyn CommitSink) -> Result<usize, SaveError> {
        let ticket = self.begin_save()?;
        let result = sink.commit(ticket.batch()).await;
        self.finish_save(ticket, result)
    }

    fn change_records(&self) -> Vec<ChangeRecord> {
        self.ledger
            .entries()
            .map(|(key, change)| ChangeRecord {
                row_id: key.row_id.clone(),
                row_number: self.grid.row_number(&key.row_id).unwrap_or_default(),
                column_id: key.column_id.clone(),
                original_value: change.original_value.clone(),
                new_value: change.new_value.clone(),
            })
            .collect()
    }

    /// Empties the ledger, putting each dirty cell's original value back on display.
    fn restore_originals(&mut self) -> usize {
        let reverted = self.ledger.revert_all();
        for (key, change) in &reverted {
            self.grid.set_value(key, change.original_value.clone());
        }
        reverted.len()
    }

    fn open_session_id(&self) -> Option<SessionId> {
        self.editing
            .session()
            .filter(|session| session.is_open())
            .map(|session| session.id())
    }

    fn flush_open_session(&mut self) {
        if let Some(open) = self.open_session_id() {
            self.resolve_session(open, Termination::Implied);
        }
    }

    fn discard_open_session(&mut self) {
        if let Some(session) = self.editing.take() {
            self.detector.teardown(session.id());
        }
    }

    fn resolve_session(&mut self, id: SessionId, how: Termination) -> Option<SessionOutcome> {
        let session = self.editing.session_by_id(id)?;
        let outcome = match how {
            Termination::Explicit(kind) => session.resolve(kind),
            Termination::Implied => {
                let kind = session.implied_resolution();
                session.resolve(kind)
            }
            Termination::Escape => session.cancel_and_reset(),
        }?;
        session.close();
        self.editing.take();
        self.detector.teardown(id);

        if let SessionOutcome::Committed {
            key,
            initial_value,
            new_value,
        } = &outcome
        {
            self.ledger
                .record_commit(key.clone(), initial_value.clone(), new_value.clone());
            self.grid.set_value(key, new_value.clone());
        }
        Some(outcome)
    }
}
