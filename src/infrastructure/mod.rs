//! Filesystem and environment access.

pub mod paths;

pub use paths::{config_file, data_dir, expand_tilde, session_file, trace_file};
