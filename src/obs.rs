//! Optional observability helpers for console dispatch and session events.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to run every dispatch call inside a span named `zoo_console.dispatch` with
//!   the `domain` (backend) and `operation` (call site) fields, and to emit events for rejected
//!   tokens and session invalidations.
//! - Enable `metrics` to increment the `zoo_console_dispatch_total` counter for every
//!   attempt/success/failure, labeled by `domain` + `outcome`.

mod counter;
mod span;

pub use counter::*;
pub use span::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each dispatch call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DispatchOutcome {
	/// A request is about to leave the console.
	Attempt,
	/// The service answered with a success status.
	Success,
	/// Transport, status, or decode failure propagated back to the caller.
	Failure,
}
impl DispatchOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			DispatchOutcome::Attempt => "attempt",
			DispatchOutcome::Success => "success",
			DispatchOutcome::Failure => "failure",
		}
	}
}
impl Display for DispatchOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
