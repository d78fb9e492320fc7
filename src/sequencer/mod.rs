pub mod actor;
pub mod model;

pub use actor::{Config, Sequencer, SequencerDevice, SequencerHandle};
pub use model::{
    CommandFailure, LedState, Pattern, PatternChange, PlayOutcome, PlaybackStatus, SequencerError,
    Snapshot, Timings,
};
