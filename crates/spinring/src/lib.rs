pub mod angle;
pub mod engine;
pub mod layout;

pub use angle::PointerRest;
pub use engine::{
    CommitError, CommitOutcome, SelectionEngine, SelectionState, SlotMark, SpinError, SpinTarget,
};
pub use layout::{
    LayoutError, MAX_PLAYERS, MIN_PLAYERS, PlayerId, PlayerSlot, Point, RING_RADIUS, RingLayout,
    compute_layout,
};

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Spin(#[from] SpinError),
    #[error(transparent)]
    Commit(#[from] CommitError),
}
