//! Session, role routing, and authenticated REST dispatch for the zoo administration console:
//! decode bearer tokens locally, gate views on session presence, and reach the auth, user,
//! animal, and exemplar services through one credential-attaching client per backend.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod config;
pub mod console;
pub mod dispatch;
pub mod error;
pub mod export;
pub mod obs;
pub mod router;
pub mod session;
pub mod store;
pub mod transport;
#[cfg(any(test, feature = "test"))]
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers for unit and integration tests; enabled via `cfg(test)`
	//! or the `test` feature.

	pub use crate::_prelude::*;

	// crates.io
	use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
	// self
	#[cfg(feature = "reqwest")]
	use crate::{
		config::ConsoleConfig, console::Console, store::MemorySessionStore,
		transport::ReqwestTransport,
	};

	/// Console type alias used by reqwest-backed integration tests.
	#[cfg(feature = "reqwest")]
	pub type ReqwestTestConsole = Console<ReqwestTransport>;

	/// Builds a reqwest transport that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	#[cfg(feature = "reqwest")]
	pub fn test_reqwest_transport() -> ReqwestTransport {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestTransport::with_client(client)
	}

	/// Constructs a [`Console`] whose four services live under `root` (for example
	/// `server.url("/api")`), backed by an in-memory session store.
	#[cfg(feature = "reqwest")]
	pub fn build_reqwest_test_console(root: &str) -> (ReqwestTestConsole, Arc<MemorySessionStore>) {
		let config = ConsoleConfig::from_root(root).expect("Test API root should be a valid URL.");
		let store = Arc::new(MemorySessionStore::default());
		let console = Console::with_transport(config, store.clone(), test_reqwest_transport());

		(console, store)
	}

	/// Encodes `claims` into an unsigned compact token (`header.payload.signature`).
	pub fn encode_test_token(claims: &serde_json::Value) -> String {
		let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
		let payload = URL_SAFE_NO_PAD.encode(
			serde_json::to_vec(claims).expect("Test claims should serialize to JSON."),
		);

		format!("{header}.{payload}.c2lnbmF0dXJl")
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use http;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
