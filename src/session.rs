//! Shared session state: the injected credential store plus the single "unauthenticated" signal
//! that any failing resource call can raise.
//!
//! Every resource client holds the same `Arc<Session>`. Reads go straight to the store, so a
//! credential set by one call is what the next call attaches. When a backend rejects a request
//! with HTTP 401, the client calls [`Session::invalidate`]: the store is cleared once and a
//! [`SessionInvalidation`] waits for the top-level handler ([`crate::console::Console`]) to turn
//! it into a redirect. The failing call still returns its own error to its caller.

// self
use crate::{
	_prelude::*,
	auth::{Claims, Credential},
	config::ServiceDomain,
	obs,
	store::SessionStore,
};

/// Record of a backend rejecting the active session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionInvalidation {
	/// Backend whose response triggered the invalidation.
	pub domain: ServiceDomain,
	/// HTTP status returned by that backend.
	pub status: u16,
}

/// Credential holder shared by every resource client.
pub struct Session {
	store: Arc<dyn SessionStore>,
	pending: Mutex<Option<SessionInvalidation>>,
}
impl Session {
	/// Wraps an injected store.
	pub fn new(store: Arc<dyn SessionStore>) -> Self {
		Self { store, pending: Mutex::new(None) }
	}

	/// Underlying store.
	pub fn store(&self) -> &Arc<dyn SessionStore> {
		&self.store
	}

	/// Current credential as of this call; an empty stored token counts as none.
	pub fn credential(&self) -> Option<Credential> {
		self.store.get().filter(|credential| !credential.is_empty())
	}

	/// Returns `true` while a non-empty credential is stored.
	pub fn is_authenticated(&self) -> bool {
		self.credential().is_some()
	}

	/// Decodes the current credential's claims.
	pub fn claims(&self) -> Option<Claims> {
		self.credential().and_then(|credential| credential.claims())
	}

	/// Stores a freshly issued credential and drops any unconsumed invalidation.
	pub fn begin(&self, credential: Credential) -> Result<()> {
		let mut pending = self.pending.lock();

		self.store.set(credential)?;
		pending.take();

		Ok(())
	}

	/// Removes the credential (logout).
	pub fn end(&self) -> Result<()> {
		let mut pending = self.pending.lock();

		self.store.clear()?;
		pending.take();

		Ok(())
	}

	/// Raises the unauthenticated signal for a request that was sent with `sent_with`.
	///
	/// Returns `true` when this call cleared the session. Nothing happens if an invalidation is
	/// already pending, or if the stored credential changed since the request left (a newer login
	/// must not be wiped by a stale rejection).
	pub fn invalidate(
		&self,
		domain: ServiceDomain,
		status: u16,
		sent_with: Option<&Credential>,
	) -> bool {
		let mut pending = self.pending.lock();

		if pending.is_some() || self.credential().as_ref() != sent_with {
			return false;
		}

		let invalidation = SessionInvalidation { domain, status };

		obs::trace_session_invalidated(&invalidation);

		if let Err(e) = self.store.clear() {
			obs::trace_store_failure(&e);
		}

		*pending = Some(invalidation);

		true
	}

	/// Consumes the pending invalidation, if any.
	pub fn take_invalidation(&self) -> Option<SessionInvalidation> {
		self.pending.lock().take()
	}
}
impl Debug for Session {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Session")
			.field("authenticated", &self.is_authenticated())
			.field("pending", &*self.pending.lock())
			.finish()
	}
}
