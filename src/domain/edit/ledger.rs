use indexmap::IndexMap;
use tracing::debug;

use crate::domain::entities::edit::{CellKey, DirtyChange, RawValue};

/// Pending, unsaved cell changes keyed by cell.
///
/// A key is present only while its new value differs from the value it had
/// before the first unsaved edit. Iteration follows the order cells were first
/// dirtied.
#[derive(Debug, Clone, Default)]
pub struct DirtyLedger {
    entries: IndexMap<CellKey, DirtyChange>,
}

impl DirtyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_commit(&mut self, key: CellKey, original_value: RawValue, new_value: RawValue) {
        let back_to_baseline = self
            .entries
            .get(&key)
            .map(|existing| existing.original_value == new_value);
        match back_to_baseline {
            Some(true) => {
                debug!(cell = %key, "edit returned cell to baseline");
                self.entries.shift_remove(&key);
            }
            Some(false) => {
                if let Some(existing) = self.entries.get_mut(&key) {
                    existing.new_value = new_value;
                }
            }
            None if original_value == new_value => {}
            None => {
                debug!(cell = %key, "cell marked dirty");
                self.entries.insert(
                    key,
                    DirtyChange {
                        original_value,
                        new_value,
                    },
                );
            }
        }
    }

    /// Empties the ledger. Callers restore displayed values from the returned
    /// entries.
    pub fn revert_all(&mut self) -> Vec<(CellKey, DirtyChange)> {
        debug!(count = self.entries.len(), "reverting all pending changes");
        self.entries.drain(..).collect()
    }

    /// Moves a cell's baseline to a value that has just been persisted. The entry
    /// disappears if nothing was edited on top of it.
    pub fn rebase(&mut self, key: &CellKey, persisted_value: &str) {
        let saved_as_is = match self.entries.get(key) {
            Some(existing) => existing.new_value == persisted_value,
            None => return,
        };
        if saved_as_is {
            self.entries.shift_remove(key);
        } else if let Some(existing) = self.entries.get_mut(key) {
            existing.original_value = persisted_value.to_string();
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &CellKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &CellKey) -> Option<&DirtyChange> {
        self.entries.get(key)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&CellKey, &DirtyChange)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a() -> CellKey {
        CellKey::new("0", "A")
    }

    #[test]
    fn first_commit_records_original_and_new() {
        let mut ledger = DirtyLedger::new();

        ledger.record_commit(a(), "x".into(), "y".into());

        assert_eq!(
            ledger.get(&a()),
            Some(&DirtyChange {
                original_value: "x".into(),
                new_value: "y".into()
            })
        );
    }

    #[test]
    fn later_commits_keep_first_original() {
        let mut ledger = DirtyLedger::new();

        ledger.record_commit(a(), "x".into(), "y".into());
        ledger.record_commit(a(), "y".into(), "z".into());

        let change = ledger.get(&a()).expect("entry should exist");
        assert_eq!(change.original_value, "x");
        assert_eq!(change.new_value, "z");
    }

    #[test]
    fn commit_back_to_original_removes_entry() {
        let mut ledger = DirtyLedger::new();

        ledger.record_commit(a(), "x".into(), "y".into());
        ledger.record_commit(a(), "y".into(), "x".into());

        assert!(!ledger.contains(&a()));
        assert!(ledger.is_empty());
    }

    #[test]
    fn no_op_commit_is_not_stored() {
        let mut ledger = DirtyLedger::new();

        ledger.record_commit(a(), "x".into(), "x".into());

        assert_eq!(ledger.size(), 0);
    }

    #[test]
    fn entries_follow_first_dirtying_order() {
        let mut ledger = DirtyLedger::new();
        let b = CellKey::new("9", "B");
        let c = CellKey::new("1", "C");

        ledger.record_commit(b.clone(), "1".into(), "2".into());
        ledger.record_commit(c.clone(), "p".into(), "q".into());
        ledger.record_commit(b.clone(), "2".into(), "3".into());

        let keys: Vec<_> = ledger.entries().map(|(key, _)| key.clone()).collect();
        assert_eq!(keys, vec![b, c]);
    }

    #[test]
    fn revert_all_returns_entries_and_empties() {
        let mut ledger = DirtyLedger::new();
        ledger.record_commit(a(), "x".into(), "z".into());

        let reverted = ledger.revert_all();

        assert_eq!(reverted.len(), 1);
        assert_eq!(reverted[0].1.original_value, "x");
        assert!(ledger.is_empty());
    }

    #[test]
    fn rebase_removes_saved_entry_and_moves_baseline_of_newer_edit() {
        let mut ledger = DirtyLedger::new();
        let b = CellKey::new("1", "B");
        ledger.record_commit(a(), "x".into(), "y".into());
        ledger.record_commit(b.clone(), "1".into(), "3".into());

        ledger.rebase(&a(), "y");
        ledger.rebase(&b, "2");

        assert!(!ledger.contains(&a()));
        let change = ledger.get(&b).expect("entry should exist");
        assert_eq!(change.original_value, "2");
        assert_eq!(change.new_value, "3");
    }
}
