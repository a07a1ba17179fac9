//! Thread-safe in-memory [`SessionStore`] whose lifetime is the process.

// self
use crate::{
	_prelude::*,
	auth::Credential,
	store::{SessionStore, StoreError},
};

/// Keeps the credential in-process; cloned handles share the same slot.
#[derive(Clone, Debug, Default)]
pub struct MemorySessionStore(Arc<RwLock<Option<Credential>>>);
impl MemorySessionStore {
	/// Creates a store that already holds `credential`.
	pub fn with_credential(credential: Credential) -> Self {
		Self(Arc::new(RwLock::new(Some(credential))))
	}
}
impl SessionStore for MemorySessionStore {
	fn get(&self) -> Option<Credential> {
		self.0.read().clone()
	}

	fn set(&self, credential: Credential) -> Result<(), StoreError> {
		*self.0.write() = Some(credential);

		Ok(())
	}

	fn clear(&self) -> Result<(), StoreError> {
		self.0.write().take();

		Ok(())
	}
}
