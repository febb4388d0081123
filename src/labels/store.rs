//! Epoch-tagged store of per-cluster label state.

use crate::constants::labels::{ERROR, LOADING, NEARBY_FALLBACK};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Label enrichment state of one cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelState {
    /// Text to display for the cluster.
    pub label: String,
    /// Whether a lookup is still in flight.
    pub is_loading_label: bool,
    /// Lookup failure message, if the lookup failed.
    pub label_error: Option<String>,
}

/// Coarse phase of a [`LabelState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStatus {
    /// Lookup in flight.
    Pending,
    /// Lookup finished with a label.
    Resolved,
    /// Lookup failed.
    Failed,
}

impl LabelState {
    /// State while the lookup is in flight.
    pub fn pending() -> Self {
        Self {
            label: LOADING.to_string(),
            is_loading_label: true,
            label_error: None,
        }
    }

    /// State after a successful lookup. No place found yields the fallback label.
    pub fn resolved(place: Option<String>) -> Self {
        Self {
            label: place.unwrap_or_else(|| NEARBY_FALLBACK.to_string()),
            is_loading_label: false,
            label_error: None,
        }
    }

    /// State after a failed lookup.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            label: ERROR.to_string(),
            is_loading_label: false,
            label_error: Some(message.into()),
        }
    }

    /// Which phase this state is in.
    pub fn status(&self) -> LabelStatus {
        if self.is_loading_label {
            LabelStatus::Pending
        } else if self.label_error.is_some() {
            LabelStatus::Failed
        } else {
            LabelStatus::Resolved
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    epoch: u64,
    entries: BTreeMap<usize, LabelState>,
}

/// Shared, cloneable handle to the label states of the current clustering run.
///
/// Every [`reset`](Self::reset) starts a new epoch. Writes tagged with an
/// older epoch are dropped, so a slow lookup from a previous run can never
/// overwrite a label in the current one.
#[derive(Debug, Clone, Default)]
pub struct LabelStore {
    inner: Arc<Mutex<Inner>>,
}

impl LabelStore {
    /// Create an empty store at epoch 0.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a new epoch with every given cluster pending. Returns the new epoch.
    pub fn reset<I>(&self, cluster_ids: I) -> u64
    where
        I: IntoIterator<Item = usize>,
    {
        let mut inner = self.lock();
        inner.epoch += 1;
        inner.entries = cluster_ids
            .into_iter()
            .map(|id| (id, LabelState::pending()))
            .collect();
        inner.epoch
    }

    /// Current epoch.
    pub fn epoch(&self) -> u64 {
        self.lock().epoch
    }

    /// Epoch, if the cluster has an entry in it.
    pub fn epoch_if_present(&self, cluster_id: usize) -> Option<u64> {
        let inner = self.lock();
        inner
            .entries
            .contains_key(&cluster_id)
            .then_some(inner.epoch)
    }

    /// State of one cluster.
    pub fn get(&self, cluster_id: usize) -> Option<LabelState> {
        self.lock().entries.get(&cluster_id).cloned()
    }

    /// Copy of every entry, keyed by cluster id.
    pub fn snapshot(&self) -> BTreeMap<usize, LabelState> {
        self.lock().entries.clone()
    }

    /// Whether any lookup of the current epoch is still in flight.
    pub fn is_loading(&self) -> bool {
        self.lock().entries.values().any(|s| s.is_loading_label)
    }

    /// Write a lookup outcome. Returns `false` when the write was stale.
    pub fn apply(&self, cluster_id: usize, epoch: u64, state: LabelState) -> bool {
        let mut inner = self.lock();
        if inner.epoch != epoch {
            return false;
        }
        match inner.entries.get_mut(&cluster_id) {
            Some(entry) => {
                *entry = state;
                true
            }
            None => false,
        }
    }
}
