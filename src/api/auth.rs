//! Login against the auth backend.

// crates.io
use http::Method;
// self
use crate::{
	_prelude::*,
	auth::Credential,
	dispatch::ResourceClient,
	error::ResponseDecodeError,
	transport::HttpTransport,
};

#[derive(Serialize)]
struct LoginRequest<'a> {
	username: &'a str,
	password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
	token: Credential,
}

/// Client for `POST {auth}/login`.
#[derive(Debug)]
pub struct AuthApi<T>
where
	T: ?Sized + HttpTransport,
{
	client: ResourceClient<T>,
}
impl<T> AuthApi<T>
where
	T: ?Sized + HttpTransport,
{
	/// Wraps a client bound to the auth backend.
	pub fn new(client: ResourceClient<T>) -> Self {
		Self { client }
	}

	/// Underlying dispatch client.
	pub fn client(&self) -> &ResourceClient<T> {
		&self.client
	}

	/// Exchanges a username/password pair for a credential.
	///
	/// The credential is returned, not stored; [`crate::console::Console::login`] decides when
	/// the session begins. HTTP 401 maps to [`Error::InvalidCredentials`].
	pub async fn login(&self, username: &str, password: &str) -> Result<Credential> {
		let url = self.client.url(&["login"]);
		let request = LoginRequest { username, password };
		let response = self
			.client
			.send_json::<_, LoginResponse>("login", Method::POST, url, &request)
			.await
			.map_err(|e| match e {
				Error::Status { status: 401, .. } => Error::InvalidCredentials,
				other => other,
			})?;

		if response.token.is_empty() {
			return Err(ResponseDecodeError::EmptyToken.into());
		}

		Ok(response.token)
	}
}
