//! Crate-wide error taxonomy.
//!
//! Hand-rolled `std::error::Error` impls, matching the rest of this
//! codebase's practice of not pulling in `thiserror`/`anyhow` for a small,
//! closed set of error variants.

use std::fmt;

/// Errors a [`crate::NavCore`] operation can report.
///
/// Reported synchronously at the call site; none of these cause a panic.
/// See `spec.md` §7 for the taxonomy this mirrors.
#[derive(Debug, Clone, PartialEq)]
pub enum NavError {
  /// Null/out-of-range tile ids, negative counts, duplicate goals.
  InvalidArgs(String),
  /// A buffer (dirty queue, heap, field storage) failed to grow.
  AllocationFailed(String),
  /// `start_build` produced an empty heap: every provided goal id was
  /// out of range.
  NoSeeds,
  /// A query was made against a goal that has never successfully built.
  NoData,
}

impl fmt::Display for NavError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::InvalidArgs(msg) => write!(f, "invalid arguments: {msg}"),
      Self::AllocationFailed(msg) => write!(f, "allocation failed: {msg}"),
      Self::NoSeeds => write!(f, "start_build produced no seeds"),
      Self::NoData => write!(f, "no data for goal"),
    }
  }
}

impl std::error::Error for NavError {}

impl NavError {
  pub(crate) fn invalid_args(msg: impl Into<String>) -> Self {
    Self::InvalidArgs(msg.into())
  }

  pub(crate) fn allocation_failed(msg: impl Into<String>) -> Self {
    Self::AllocationFailed(msg.into())
  }
}
