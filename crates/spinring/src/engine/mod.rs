pub mod selection;
pub mod state;

pub use selection::{CommitError, CommitOutcome, SelectionEngine, SpinError, SpinTarget};
pub use state::{SelectionState, SlotMark};
