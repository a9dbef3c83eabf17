//! Application layer: state, dispatch, routing and page events.
//!
//! Sits between the front end (the CLI in `main.rs`) and the
//! domain/worker/storage layers.
//!
//! ```text
//! Event ─→ handle_event ─→ Action::Dispatch ─→ Store::dispatch ─→ Worker
//!                                                  │
//!                     RootState (pending → fulfilled | rejected)
//!                                                  │
//!                              subscribers ←── watch channel
//! ```
//!
//! # Modules
//!
//! - [`slices`]: per-feature state and transitions
//! - [`state`]: root state aggregator
//! - [`store`]: application context, dispatch and credential cache
//! - [`guard`]: route table and authentication guard
//! - [`handler`]: page-level events and view state
//! - [`actions`]: side effects returned by the handler

pub mod actions;
pub mod guard;
pub mod handler;
pub mod slices;
pub mod state;
pub mod store;

pub use actions::Action;
pub use guard::{resolve_layout, GuardDecision, GuardState, Layout, Route, RouteGuard};
pub use handler::{handle_event, Event, ViewState};
pub use slices::{RequestId, RequestStatus, SliceName, SliceStatus};
pub use state::RootState;
pub use store::{DispatchError, Store};
