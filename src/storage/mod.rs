//! Credential cache for session continuity.
//!
//! The only state that outlives the process is the session credential (token,
//! user id, user type). It is written on login and removed on logout.
//!
//! # Modules
//!
//! - `backend`: [`CredentialStore`] trait
//! - `json`: JSON file backend with atomic writes
//! - `memory`: process-local backend
//! - `models`: on-disk record format

pub mod backend;
pub mod json;
pub mod memory;
pub mod models;

pub use backend::CredentialStore;
pub use json::JsonCredentialStore;
pub use memory::MemoryCredentialStore;
pub use models::CredentialRecord;
