//! Logging and tracing.
//!
//! ```text
//! tracing ─┬→ fmt layer ─→ stderr
//!          └→ tracing-opentelemetry → SDK tracer → FileSpanExporter → OTLP JSON lines
//! ```
//!
//! The file export is opt-in (`trace_file`). The trace file rotates at
//! 10 MiB and keeps 3 backups.
//!
//! - [`init`]: subscriber setup
//! - [`exporter`]: span exporter and tracer provider
//! - [`otlp`]: OTLP/JSON document model
//! - [`rotation`]: size-rotated line file

pub mod exporter;
pub mod init;
pub mod otlp;
pub mod rotation;

pub use init::init_tracing;
