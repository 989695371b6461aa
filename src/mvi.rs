//! Model-View-Intent primitives.
//!
//! Listing transitions are pure reducers so the async layers stay thin and
//! the transition table is testable without a runtime.
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ View
//!    ↑                              │
//!    └──────────────────────────────┘
//! ```

/// A user gesture (keystroke, scroll, pull-to-refresh) or a system event
/// (page response, failure) fed into a [`Reducer`].
pub trait Intent: Send + 'static {}

/// Snapshot handed to renderers. Cloned out, compared to detect changes,
/// and starts from a meaningful `Default`.
pub trait ViewState: Clone + PartialEq + Default + Send + 'static {}

/// Pure transition function: `(state, intent) -> state`.
pub trait Reducer {
    type State: ViewState;
    type Intent: Intent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State;
}
