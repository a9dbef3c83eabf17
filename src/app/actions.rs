//! Side effects produced by the event handler.
//!
//! [`handle_event`](super::handle_event) never performs I/O itself. It returns
//! a `Vec<Action>` that the caller runs in order: dispatching operations
//! against the [`Store`](super::Store), moving to another route, or raising
//! a blocking alert.

use super::guard::Route;
use crate::worker::Operation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Runs an operation through the store.
    ///
    /// Its result comes back as [`Event::Settled`](super::Event::Settled).
    Dispatch(Operation),

    /// Moves to another route.
    Navigate(Route),

    /// Blocking alert, raised when a destructive action fails.
    Alert(String),
}
