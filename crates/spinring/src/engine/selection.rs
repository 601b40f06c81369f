use super::state::{SelectionState, SlotMark};
use crate::layout::{MIN_PLAYERS, PlayerId, PlayerSlot, RingLayout};
use rand::Rng;
use rand::seq::IteratorRandom;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SpinError {
    #[error("A spin is already in progress")]
    AlreadySpinning,
    #[error("At least {min} players are needed to spin", min = MIN_PLAYERS)]
    NotEnoughPlayers,
    #[error("Every player has had a turn this round")]
    RoundExhausted,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CommitError {
    #[error("No spin is waiting to be committed")]
    NotSpinning,
    #[error("Spin drew {expected}, but {got} was committed")]
    UnexpectedSlot { expected: PlayerId, got: PlayerId },
}

/// Where the pointer has to end up for an accepted spin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinTarget {
    pub id: PlayerId,
    pub angle: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    PlayerSelected { id: PlayerId, remaining: usize },
    RoundComplete { id: PlayerId },
}

impl CommitOutcome {
    pub fn id(&self) -> PlayerId {
        match *self {
            Self::PlayerSelected { id, .. } | Self::RoundComplete { id } => id,
        }
    }
}

/// Draws players from the ring without repetition until the round runs out.
///
/// A spin is two calls: [`SelectionEngine::spin`] draws the next player and hands back the angle
/// to point at, and [`SelectionEngine::commit_selection`] applies the draw once whatever is
/// animating the pointer has finished. Nothing else may spin in between.
#[derive(Debug, Clone, Default)]
pub struct SelectionEngine {
    layout: RingLayout,
    state: SelectionState,
}

impl SelectionEngine {
    pub fn new(layout: RingLayout) -> Self {
        let state = SelectionState::new(&layout);
        Self { layout, state }
    }

    /// Starts a fresh round on `layout`. Also clears a pending spin.
    pub fn reset(&mut self, layout: RingLayout) {
        if self.state.is_spinning() {
            log::debug!("Reset while spinning, dropping pending draw");
        }
        self.state = SelectionState::new(&layout);
        self.layout = layout;
    }

    /// Starts a fresh round with the same players.
    pub fn restart(&mut self) {
        let layout = std::mem::take(&mut self.layout);
        self.reset(layout);
    }

    pub fn layout(&self) -> &RingLayout {
        &self.layout
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn mark(&self, id: PlayerId) -> Option<SlotMark> {
        self.layout.get(id).map(|_| self.state.mark(id))
    }

    pub fn marks(&self) -> impl Iterator<Item = (&PlayerSlot, SlotMark)> + '_ {
        self.layout.iter().map(|slot| (slot, self.state.mark(slot.id)))
    }

    pub fn spin<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<SpinTarget, SpinError> {
        if self.state.is_spinning() {
            return Err(SpinError::AlreadySpinning);
        }
        if self.layout.len() < MIN_PLAYERS {
            return Err(SpinError::NotEnoughPlayers);
        }
        if self.state.exhausted {
            return Err(SpinError::RoundExhausted);
        }

        let available = &self.state.available;
        let Some(slot) = self
            .layout
            .iter()
            .filter(|slot| available.contains(&slot.id))
            .choose(rng)
        else {
            return Err(SpinError::RoundExhausted);
        };
        let target = SpinTarget {
            id: slot.id,
            angle: slot.angle,
        };

        // the previous pick has had its turn now
        if let Some(previous) = self.state.selected.take() {
            self.state.completed.push(previous);
        }
        self.state.pending = Some(target.id);

        log::debug!(
            "Drew {} at {:.1}°, {} left in pool",
            target.id,
            target.angle,
            self.state.available.len()
        );
        Ok(target)
    }

    pub fn spin_random(&mut self) -> Result<SpinTarget, SpinError> {
        self.spin(&mut rand::rng())
    }

    pub fn commit_selection(&mut self, id: PlayerId) -> Result<CommitOutcome, CommitError> {
        match self.state.pending {
            None => return Err(CommitError::NotSpinning),
            Some(expected) if expected != id => {
                return Err(CommitError::UnexpectedSlot { expected, got: id });
            }
            Some(_) => {}
        }

        self.state.pending = None;
        self.state.selected = Some(id);
        self.state.available.remove(&id);

        if self.state.available.is_empty() {
            self.state.exhausted = true;
            log::debug!("{} committed, round complete", id);
            Ok(CommitOutcome::RoundComplete { id })
        } else {
            let remaining = self.state.available.len();
            log::debug!("{} committed, {} remaining", id, remaining);
            Ok(CommitOutcome::PlayerSelected { id, remaining })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compute_layout;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::BTreeSet;

    fn engine(n: usize) -> SelectionEngine {
        SelectionEngine::new(compute_layout(n).unwrap())
    }

    fn all_ids(n: usize) -> BTreeSet<PlayerId> {
        (1..=n as u8).filter_map(PlayerId::new).collect()
    }

    fn play_round(engine: &mut SelectionEngine, rng: &mut impl Rng) -> Vec<PlayerId> {
        let mut order = Vec::new();
        while !engine.state().is_exhausted() {
            let target = engine.spin(rng).unwrap();
            engine.commit_selection(target.id).unwrap();
            order.push(target.id);
        }
        order
    }

    fn assert_partition(engine: &SelectionEngine) {
        let state = engine.state();
        let mut seen: Vec<PlayerId> = state.available().iter().copied().collect();
        seen.extend(state.selected());
        seen.extend(state.completed().iter().copied());
        let unique: BTreeSet<_> = seen.iter().copied().collect();
        assert_eq!(unique.len(), seen.len(), "sets overlap: {seen:?}");
        assert_eq!(unique, all_ids(engine.layout().len()));
        assert_eq!(state.is_exhausted(), state.available().is_empty());
    }

    #[test]
    fn test_fresh_round() {
        let engine = engine(6);
        let state = engine.state();
        assert_eq!(state.available(), &all_ids(6));
        assert_eq!(state.selected(), None);
        assert!(state.completed().is_empty());
        assert!(!state.is_spinning());
        assert!(!state.is_exhausted());
    }

    #[test]
    fn test_spin_reports_slot_angle() {
        let mut engine = engine(4);
        let mut rng = StdRng::seed_from_u64(7);
        let target = engine.spin(&mut rng).unwrap();
        assert_eq!(engine.layout().angle_of(target.id), Some(target.angle));
        assert_eq!(engine.state().pending(), Some(target.id));
        // nothing is applied until the commit
        assert_eq!(engine.state().remaining(), 4);
        assert_eq!(engine.state().selected(), None);
    }

    #[test]
    fn test_full_round_covers_everyone_once() {
        let mut engine = engine(7);
        let mut rng = StdRng::seed_from_u64(42);
        let order = play_round(&mut engine, &mut rng);

        assert_eq!(order.len(), 7);
        assert_eq!(order.iter().copied().collect::<BTreeSet<_>>(), all_ids(7));
        assert!(engine.state().is_exhausted());
        assert!(engine.state().available().is_empty());
        assert_eq!(engine.state().selected(), order.last().copied());
        assert_eq!(engine.state().completed(), &order[..6]);
        assert_partition(&engine);
    }

    #[test]
    fn test_partition_holds_through_round() {
        let mut engine = engine(5);
        let mut rng = StdRng::seed_from_u64(3);
        while !engine.state().is_exhausted() {
            let target = engine.spin(&mut rng).unwrap();
            assert_partition(&engine);
            engine.commit_selection(target.id).unwrap();
            assert_partition(&engine);
        }
    }

    #[test]
    fn test_commit_outcomes() {
        let mut engine = engine(2);
        let mut rng = StdRng::seed_from_u64(1);

        let first = engine.spin(&mut rng).unwrap();
        assert_eq!(
            engine.commit_selection(first.id),
            Ok(CommitOutcome::PlayerSelected {
                id: first.id,
                remaining: 1
            })
        );

        let second = engine.spin(&mut rng).unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(engine.state().completed(), &[first.id]);
        assert_eq!(
            engine.commit_selection(second.id),
            Ok(CommitOutcome::RoundComplete { id: second.id })
        );
    }

    #[test]
    fn test_double_spin_rejected() {
        let mut engine = engine(5);
        let mut rng = StdRng::seed_from_u64(9);
        engine.spin(&mut rng).unwrap();
        let before = engine.state().clone();

        assert_eq!(engine.spin(&mut rng), Err(SpinError::AlreadySpinning));
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_spin_after_exhaustion_rejected() {
        let mut engine = engine(3);
        let mut rng = StdRng::seed_from_u64(11);
        play_round(&mut engine, &mut rng);
        let before = engine.state().clone();

        assert_eq!(engine.spin(&mut rng), Err(SpinError::RoundExhausted));
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_empty_layout_cannot_spin() {
        let mut engine = SelectionEngine::default();
        assert_eq!(engine.spin_random(), Err(SpinError::NotEnoughPlayers));
        assert!(!engine.state().is_spinning());
    }

    #[test]
    fn test_commit_protocol_errors() {
        let mut engine = engine(4);
        assert_eq!(
            engine.commit_selection(PlayerId::new(1).unwrap()),
            Err(CommitError::NotSpinning)
        );

        let mut rng = StdRng::seed_from_u64(5);
        let target = engine.spin(&mut rng).unwrap();
        let wrong = engine.layout().ids().find(|&id| id != target.id).unwrap();
        let before = engine.state().clone();
        assert_eq!(
            engine.commit_selection(wrong),
            Err(CommitError::UnexpectedSlot {
                expected: target.id,
                got: wrong
            })
        );
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_reset_mid_spin_clears_latch() {
        let mut engine = engine(4);
        let mut rng = StdRng::seed_from_u64(2);
        let target = engine.spin(&mut rng).unwrap();

        engine.restart();
        assert!(!engine.state().is_spinning());
        assert_eq!(engine.state().available(), &all_ids(4));
        assert_eq!(
            engine.commit_selection(target.id),
            Err(CommitError::NotSpinning)
        );
        assert!(engine.spin(&mut rng).is_ok());
    }

    #[test]
    fn test_reset_with_new_layout() {
        let mut engine = engine(4);
        let mut rng = StdRng::seed_from_u64(8);
        play_round(&mut engine, &mut rng);

        engine.reset(compute_layout(9).unwrap());
        assert_eq!(engine.layout().len(), 9);
        assert_eq!(engine.state().available(), &all_ids(9));
        assert!(!engine.state().is_exhausted());
        assert_eq!(engine.state().selected(), None);
    }

    #[test]
    fn test_marks() {
        let mut engine = engine(3);
        let mut rng = StdRng::seed_from_u64(4);
        let first = engine.spin(&mut rng).unwrap().id;
        engine.commit_selection(first).unwrap();
        let second = engine.spin(&mut rng).unwrap().id;
        engine.commit_selection(second).unwrap();

        assert_eq!(engine.mark(first), Some(SlotMark::Completed));
        assert_eq!(engine.mark(second), Some(SlotMark::Selected));
        assert_eq!(engine.mark(PlayerId::new(4).unwrap()), None);
        let available = engine
            .marks()
            .filter(|(_, mark)| *mark == SlotMark::Available)
            .count();
        assert_eq!(available, 1);
    }

    #[test]
    fn test_rounds_cover_all_ids_with_thread_rng() {
        let mut engine = engine(5);
        for _ in 0..2 {
            let order = play_round(&mut engine, &mut rand::rng());
            assert_eq!(order.iter().copied().collect::<BTreeSet<_>>(), all_ids(5));
            engine.restart();
        }
    }

    #[test]
    fn test_draw_is_roughly_uniform() {
        let mut rng = StdRng::seed_from_u64(1234);
        let mut firsts = [0usize; 4];
        for _ in 0..4000 {
            let mut engine = engine(4);
            let id = engine.spin(&mut rng).unwrap().id;
            firsts[id.index()] += 1;
        }
        for count in firsts {
            assert!((800..1200).contains(&count), "skewed draw: {firsts:?}");
        }
    }
}
