//! Diffing and persisting the activated theme list.
//!
//! The reconciler compares the list the user asked for against the list
//! last written to the activation directory, describes the change as
//! counts, and then makes the directory match the new list.
//!
//! ## Reorder count
//!
//! When both lists hold the same themes, `reordered` is the minimum number
//! of entries that must be moved to turn the old order into the new one.
//! That is the list length minus the longest run of entries that kept their
//! relative order. Swapping two neighbours counts as one move; reversing a
//! list of `n` counts as `n - 1`.

use crate::activation::ActivationStore;
use crate::catalog::ThemeCatalog;
use crate::error::EngineResult;
use crate::types::{ActivatedThemeList, ReconciliationResult, ThemeId};
use std::collections::HashMap;

pub struct Reconciler {
    store: ActivationStore,
    catalog: ThemeCatalog,
}

impl Reconciler {
    pub fn new(store: ActivationStore, catalog: ThemeCatalog) -> Self {
        Self { store, catalog }
    }

    pub fn store(&self) -> &ActivationStore {
        &self.store
    }

    pub fn catalog(&self) -> &ThemeCatalog {
        &self.catalog
    }

    /// Diff `new_list` against the persisted list and persist `new_list`.
    ///
    /// The write happens even when nothing changed, so markers deleted or
    /// edited behind our back are restored.
    pub fn reconcile(&self, new_list: &ActivatedThemeList) -> EngineResult<ReconciliationResult> {
        let old = self.store.read()?;
        let result = diff(&old, new_list);

        self.store.write(new_list, &self.catalog)?;

        if result.equal {
            log::debug!("Activated themes unchanged ({} active)", new_list.len());
        } else {
            log::info!(
                "Activated themes reconciled: {} added, {} removed, {} reordered",
                result.added,
                result.removed,
                result.reordered
            );
        }
        Ok(result)
    }
}

/// Describe the change from `old` to `new` without touching disk
pub fn diff(old: &ActivatedThemeList, new: &ActivatedThemeList) -> ReconciliationResult {
    let old_set = old.to_set();
    let new_set = new.to_set();

    let added = new_set.difference(&old_set).count();
    let removed = old_set.difference(&new_set).count();

    if added > 0 || removed > 0 {
        return ReconciliationResult {
            added,
            removed,
            reordered: 0,
            equal: false,
        };
    }

    let reordered = moved_entries(old.ids(), new.ids());
    if reordered == 0 {
        ReconciliationResult::unchanged()
    } else {
        ReconciliationResult {
            added: 0,
            removed: 0,
            reordered,
            equal: false,
        }
    }
}

/// Minimum number of entries to move so that `old` reads as `new`.
///
/// Both slices must hold the same distinct elements.
fn moved_entries(old: &[ThemeId], new: &[ThemeId]) -> usize {
    let old_positions: HashMap<&ThemeId, usize> =
        old.iter().enumerate().map(|(i, id)| (id, i)).collect();
    let sequence: Vec<usize> = new
        .iter()
        .filter_map(|id| old_positions.get(id).copied())
        .collect();

    sequence.len() - longest_increasing_run(&sequence)
}

/// Length of the longest strictly increasing subsequence (patience sorting)
fn longest_increasing_run(sequence: &[usize]) -> usize {
    let mut tails: Vec<usize> = Vec::new();
    for &value in sequence {
        match tails.binary_search(&value) {
            Ok(_) => {}
            Err(index) if index == tails.len() => tails.push(value),
            Err(index) => tails[index] = value,
        }
    }
    tails.len()
}
