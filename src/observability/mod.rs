//! Logging and OpenTelemetry trace export.
//!
//! # Architecture
//!
//! ```text
//! tracing macros ──▶ EnvFilter ──┬─▶ fmt layer (stderr)            no trace_file
//!                                └─▶ OpenTelemetryLayer ──▶ JSON lines exporter
//!                                                             ──▶ RotatingFile
//! ```
//!
//! # Configuration
//!
//! The level comes from, in order:
//! 1. the `RUST_LOG` environment variable
//! 2. `trace_level` in [`Config`](crate::Config)
//! 3. `"info"`
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`exporter`]: Span exporter and tracer provider
//! - [`file_writer`]: Size-rotated output file

pub mod exporter;
pub mod file_writer;
pub mod init;

pub use init::init_tracing;
