//! Common types and utilities for the sable type engine.
//!
//! This crate provides foundational types used across all sable crates:
//! - Source spans (`Span`, `Spanned`)
//! - Structured diagnostics (`Diagnostic`, `ErrorKind`)
//! - Centralized limits and thresholds
//! - Cancellation (`CancelToken`)

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::{Span, Spanned};

// Structured diagnostics accumulated by the engine
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, ErrorKind};

// Centralized limits and thresholds
pub mod limits;

// Cooperative cancellation for long-running entry points
pub mod cancel;
pub use cancel::CancelToken;
