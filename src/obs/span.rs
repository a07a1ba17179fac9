// self
use crate::{
	_prelude::*,
	auth::ClaimsError,
	config::ServiceDomain,
	session::SessionInvalidation,
	store::StoreError,
};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedDispatch<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedDispatch<F> = F;

/// A span builder used by resource clients.
#[derive(Clone, Debug)]
pub struct DispatchSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl DispatchSpan {
	/// Creates a new span tagged with the backend domain + operation.
	pub fn new(domain: ServiceDomain, operation: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("zoo_console.dispatch", domain = domain.as_str(), operation);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (domain, operation);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedDispatch<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Reports a token whose payload could not be decoded.
pub fn trace_claims_rejected(error: &ClaimsError) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(%error, "bearer token claims could not be decoded");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = error;
	}
}

/// Reports a backend rejecting the session.
pub fn trace_session_invalidated(invalidation: &SessionInvalidation) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(
			domain = invalidation.domain.as_str(),
			status = invalidation.status,
			"session invalidated by backend"
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = invalidation;
	}
}

/// Reports a session-store failure that could not be propagated to a caller.
pub fn trace_store_failure(error: &StoreError) {
	#[cfg(feature = "tracing")]
	{
		tracing::error!(%error, "session store operation failed");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = error;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn event_helpers_are_safe_without_a_subscriber() {
		trace_claims_rejected(&ClaimsError::SegmentCount { found: 1 });
		trace_store_failure(&StoreError::Backend { message: "read-only".into() });
		trace_session_invalidated(&SessionInvalidation {
			domain: ServiceDomain::Animal,
			status: 401,
		});
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = DispatchSpan::new(ServiceDomain::User, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
