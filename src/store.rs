//! Session-store contract and built-in implementations holding the active bearer credential.

pub mod file;
pub mod memory;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;

// self
use crate::{_prelude::*, auth::Credential};

/// Holder of the single credential active for a console session.
///
/// A value passed to [`SessionStore::set`] must be visible to the very next
/// [`SessionStore::get`]; implementations never cache a stale copy. No expiry is evaluated
/// locally.
pub trait SessionStore
where
	Self: Send + Sync,
{
	/// Returns the current credential, if any.
	fn get(&self) -> Option<Credential>;

	/// Replaces the current credential.
	fn set(&self, credential: Credential) -> Result<(), StoreError>;

	/// Removes the current credential.
	fn clear(&self) -> Result<(), StoreError>;
}

/// Error type produced by [`SessionStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage medium.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
