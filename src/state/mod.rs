//! State module for per-URL outcomes
//!
//! This module defines the data every task produces.
//!
//! # Components
//!
//! - `Label`: The final h/u/i outcome for a URL
//! - `Stage`: The pipeline stage (or surrounding context) a failure belongs to
//! - `UrlResult` / `ErrorRecord`: What a task hands back to the aggregators
//! - `StageError` / `StageFailure`: Typed stage failures before they become records

mod label;
mod record;
mod stage;

// Re-export main types
pub use label::Label;
pub use record::{ErrorRecord, StageError, StageFailure, StageOutcome, UrlResult};
pub use stage::Stage;
