use crate::layout::{PlayerId, RingLayout};
use std::collections::BTreeSet;

/// Per-round bookkeeping, owned by [`super::SelectionEngine`].
///
/// `available`, `selected` and `completed` never share an id and together cover every slot of the
/// layout the round was started with.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionState {
    pub(super) available: BTreeSet<PlayerId>,
    pub(super) selected: Option<PlayerId>,
    pub(super) completed: Vec<PlayerId>,
    pub(super) pending: Option<PlayerId>,
    pub(super) exhausted: bool,
}

impl SelectionState {
    pub fn new(layout: &RingLayout) -> Self {
        Self {
            available: layout.ids().collect(),
            ..Self::default()
        }
    }

    pub fn available(&self) -> &BTreeSet<PlayerId> {
        &self.available
    }

    pub fn selected(&self) -> Option<PlayerId> {
        self.selected
    }

    /// Ids that already had their turn this round, oldest first.
    pub fn completed(&self) -> &[PlayerId] {
        &self.completed
    }

    /// The id drawn by an accepted spin that has not been committed yet.
    pub fn pending(&self) -> Option<PlayerId> {
        self.pending
    }

    pub fn is_spinning(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn remaining(&self) -> usize {
        self.available.len()
    }

    pub fn mark(&self, id: PlayerId) -> SlotMark {
        if self.selected == Some(id) {
            SlotMark::Selected
        } else if self.completed.contains(&id) {
            SlotMark::Completed
        } else {
            SlotMark::Available
        }
    }
}

/// How a slot should be shown relative to the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotMark {
    Available,
    Selected,
    Completed,
}
