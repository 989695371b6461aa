//! Debounced search input.

mod sequencer;

pub use sequencer::SearchSequencer;
