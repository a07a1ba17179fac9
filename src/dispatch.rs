//! Per-backend resource clients with uniform credential attachment.
//!
//! [`ResourceClient`] is the only place that builds outbound requests. Before every call, for
//! every verb, [`ResourceClient::prepare`] reads the session store *at that moment* and, when a
//! non-empty credential exists, sets `Authorization: Bearer <credential>`; otherwise the header
//! is omitted entirely. Non-success statuses become [`Error::Status`], and a 401 from any
//! backend except auth raises the session's unauthenticated signal.

// crates.io
use http::{
	HeaderMap, HeaderValue, Method,
	header::{AUTHORIZATION, CONTENT_TYPE},
};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::Credential,
	config::{self, ServiceDomain},
	error::{ConfigError, ResponseDecodeError},
	obs::{self, DispatchOutcome, DispatchSpan},
	session::Session,
	transport::{ApiRequest, ApiResponse, HttpTransport},
};
#[cfg(feature = "reqwest")] use crate::transport::ReqwestTransport;

/// Content type sent with every request.
pub const JSON_CONTENT_TYPE: &str = "application/json";

const STATUS_EXCERPT_LEN: usize = 256;

#[cfg(feature = "reqwest")]
/// Resource client specialized for the crate's default reqwest transport.
pub type ReqwestResourceClient = ResourceClient<ReqwestTransport>;

/// HTTP dispatch wrapper for one backend.
pub struct ResourceClient<T>
where
	T: ?Sized + HttpTransport,
{
	domain: ServiceDomain,
	base: Url,
	session: Arc<Session>,
	transport: Arc<T>,
	invalidate_on_unauthorized: bool,
}
impl<T> ResourceClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a client for `domain` rooted at `base`.
	///
	/// A 401 answered by the auth backend is a login rejection, not an expired session, so only
	/// the other domains raise the unauthenticated signal.
	pub fn new(
		domain: ServiceDomain,
		base: Url,
		session: Arc<Session>,
		transport: impl Into<Arc<T>>,
	) -> Self {
		Self {
			domain,
			base,
			session,
			transport: transport.into(),
			invalidate_on_unauthorized: domain != ServiceDomain::Auth,
		}
	}

	/// Backend this client talks to.
	pub fn domain(&self) -> ServiceDomain {
		self.domain
	}

	/// Base address of the backend.
	pub fn base_url(&self) -> &Url {
		&self.base
	}

	/// Session shared with the other clients.
	pub fn session(&self) -> &Arc<Session> {
		&self.session
	}

	/// Builds `{base}/{segments...}`.
	pub fn url(&self, segments: &[&str]) -> Url {
		config::endpoint(&self.base, segments)
	}

	/// Builds `{base}/{segments...}?{query}`, skipping the query string when `query` is empty.
	pub fn url_with_query<K, V>(&self, segments: &[&str], query: &[(K, V)]) -> Url
	where
		K: AsRef<str>,
		V: AsRef<str>,
	{
		let mut url = self.url(segments);

		if !query.is_empty() {
			let mut pairs = url.query_pairs_mut();

			for (key, value) in query {
				pairs.append_pair(key.as_ref(), value.as_ref());
			}
		}

		url
	}

	/// Builds the outbound request, running the credential interceptor.
	///
	/// Returns the request together with the credential it carries so a later 401 can be matched
	/// against the session that produced it.
	pub fn prepare(
		&self,
		method: Method,
		url: Url,
		body: Option<Vec<u8>>,
	) -> Result<(ApiRequest, Option<Credential>)> {
		let mut headers = HeaderMap::new();

		headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));

		let credential = self.attach_credential(&mut headers)?;

		Ok((ApiRequest { method, url, headers, body }, credential))
	}

	fn attach_credential(&self, headers: &mut HeaderMap) -> Result<Option<Credential>> {
		let Some(credential) = self.session.credential() else {
			return Ok(None);
		};
		let mut value = HeaderValue::try_from(credential.bearer())
			.map_err(|_| ConfigError::InvalidCredentialHeader)?;

		value.set_sensitive(true);
		headers.insert(AUTHORIZATION, value);

		Ok(Some(credential))
	}

	/// Sends a request and returns the raw response once its status is a success.
	pub async fn send(
		&self,
		operation: &'static str,
		method: Method,
		url: Url,
		body: Option<Vec<u8>>,
	) -> Result<ApiResponse> {
		let span = DispatchSpan::new(self.domain, operation);

		obs::record_dispatch_outcome(self.domain, DispatchOutcome::Attempt);

		let result = span
			.instrument(async move {
				let (request, credential) = self.prepare(method, url, body)?;
				let response = self.transport.execute(request).await?;

				self.check_status(response, credential.as_ref())
			})
			.await;

		match &result {
			Ok(_) => obs::record_dispatch_outcome(self.domain, DispatchOutcome::Success),
			Err(_) => obs::record_dispatch_outcome(self.domain, DispatchOutcome::Failure),
		}

		result
	}

	fn check_status(
		&self,
		response: ApiResponse,
		sent_with: Option<&Credential>,
	) -> Result<ApiResponse> {
		if response.is_success() {
			return Ok(response);
		}

		let status = response.status.as_u16();

		if status == 401 && self.invalidate_on_unauthorized {
			self.session.invalidate(self.domain, status, sent_with);
		}

		Err(Error::Status {
			domain: self.domain,
			status,
			message: response.excerpt(STATUS_EXCERPT_LEN),
		})
	}

	/// `GET` returning a JSON document.
	pub async fn get_json<R>(&self, operation: &'static str, url: Url) -> Result<R>
	where
		R: DeserializeOwned,
	{
		let response = self.send(operation, Method::GET, url, None).await?;

		self.decode(&response)
	}

	/// `GET` returning raw bytes (file downloads).
	pub async fn get_bytes(&self, operation: &'static str, url: Url) -> Result<Vec<u8>> {
		Ok(self.send(operation, Method::GET, url, None).await?.body)
	}

	/// Sends `body` as JSON and decodes a JSON reply.
	pub async fn send_json<B, R>(
		&self,
		operation: &'static str,
		method: Method,
		url: Url,
		body: &B,
	) -> Result<R>
	where
		B: ?Sized + Serialize,
		R: DeserializeOwned,
	{
		let payload = self.encode(body)?;
		let response = self.send(operation, method, url, Some(payload)).await?;

		self.decode(&response)
	}

	/// Sends an optional JSON body and ignores the reply body (`204 No Content` endpoints).
	pub async fn send_unit<B>(
		&self,
		operation: &'static str,
		method: Method,
		url: Url,
		body: Option<&B>,
	) -> Result<()>
	where
		B: ?Sized + Serialize,
	{
		let payload = body.map(|value| self.encode(value)).transpose()?;

		self.send(operation, method, url, payload).await?;

		Ok(())
	}

	fn encode<B>(&self, body: &B) -> Result<Vec<u8>>
	where
		B: ?Sized + Serialize,
	{
		serde_json::to_vec(body)
			.map_err(|source| ConfigError::RequestBody { domain: self.domain, source }.into())
	}

	fn decode<R>(&self, response: &ApiResponse) -> Result<R>
	where
		R: DeserializeOwned,
	{
		let mut deserializer = serde_json::Deserializer::from_slice(&response.body);

		serde_path_to_error::deserialize(&mut deserializer).map_err(|source| {
			ResponseDecodeError::Json {
				domain: self.domain,
				status: response.status.as_u16(),
				source,
			}
			.into()
		})
	}
}
impl<T> Debug for ResourceClient<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ResourceClient")
			.field("domain", &self.domain)
			.field("base", &self.base.as_str())
			.finish()
	}
}

#[cfg(test)]
pub(crate) mod tests {
	// crates.io
	use http::StatusCode;
	// self
	use super::*;
	use crate::{
		error::TransportError,
		store::{MemorySessionStore, SessionStore},
		transport::TransportFuture,
	};

	/// Transport that records every request and answers with a canned status/body.
	#[derive(Default)]
	pub(crate) struct RecordingTransport {
		pub(crate) requests: Mutex<Vec<ApiRequest>>,
		pub(crate) replies: Mutex<Vec<(u16, Vec<u8>)>>,
	}
	impl RecordingTransport {
		pub(crate) fn replying(status: u16, body: &str) -> Self {
			let transport = Self::default();

			transport.replies.lock().push((status, body.as_bytes().to_vec()));

			transport
		}

		pub(crate) fn authorization_headers(&self) -> Vec<Option<String>> {
			self.requests
				.lock()
				.iter()
				.map(|request| {
					request
						.headers
						.get(AUTHORIZATION)
						.map(|value| value.to_str().expect("Header should be ASCII.").to_owned())
				})
				.collect()
		}
	}
	impl HttpTransport for RecordingTransport {
		fn execute(&self, request: ApiRequest) -> TransportFuture<'_> {
			self.requests.lock().push(request);

			let (status, body) = {
				let mut replies = self.replies.lock();

				if replies.len() > 1 { replies.remove(0) } else { replies[0].clone() }
			};

			Box::pin(async move {
				let status = StatusCode::from_u16(status)
					.map_err(|e| TransportError::network(std::io::Error::other(e.to_string())))?;

				Ok(ApiResponse { status, headers: HeaderMap::new(), body })
			})
		}
	}

	fn client(
		domain: ServiceDomain,
		transport: Arc<RecordingTransport>,
	) -> (ResourceClient<RecordingTransport>, MemorySessionStore) {
		let store = MemorySessionStore::default();
		let session = Arc::new(Session::new(Arc::new(store.clone())));
		let base = Url::parse("http://localhost:8081/api/animal").expect("Fixture should parse.");

		(ResourceClient::new(domain, base, session, transport), store)
	}

	#[tokio::test]
	async fn bearer_is_attached_to_every_verb() {
		let transport = Arc::new(RecordingTransport::replying(200, "{}"));
		let (client, store) = client(ServiceDomain::Animal, transport.clone());

		store.set(Credential::new("h.p.s")).expect("Memory store set should succeed.");

		for method in [Method::GET, Method::POST, Method::PUT, Method::DELETE] {
			client.send("verb", method, client.url(&["1"]), None).await.expect("Call should succeed.");
		}

		assert_eq!(transport.authorization_headers(), vec![Some("Bearer h.p.s".to_owned()); 4]);
	}

	#[tokio::test]
	async fn header_is_omitted_without_a_credential() {
		let transport = Arc::new(RecordingTransport::replying(200, "[]"));
		let (client, store) = client(ServiceDomain::Animal, transport.clone());

		store.set(Credential::new("")).expect("Memory store set should succeed.");

		let animals: Vec<serde_json::Value> =
			client.get_json("list", client.url(&[])).await.expect("List should succeed.");

		assert!(animals.is_empty());
		assert_eq!(transport.authorization_headers(), vec![None]);
		assert_eq!(
			transport.requests.lock()[0].headers.get(CONTENT_TYPE),
			Some(&HeaderValue::from_static(JSON_CONTENT_TYPE))
		);
	}

	#[tokio::test]
	async fn credential_is_read_at_send_time() {
		let transport = Arc::new(RecordingTransport::replying(204, ""));
		let (client, store) = client(ServiceDomain::User, transport.clone());

		client.send("first", Method::GET, client.url(&[]), None).await.expect("Call should succeed.");
		store.set(Credential::new("fresh")).expect("Memory store set should succeed.");
		client.send("second", Method::GET, client.url(&[]), None).await.expect("Call should succeed.");
		store.clear().expect("Memory store clear should succeed.");
		client.send("third", Method::GET, client.url(&[]), None).await.expect("Call should succeed.");

		assert_eq!(
			transport.authorization_headers(),
			vec![None, Some("Bearer fresh".to_owned()), None]
		);
	}

	#[test]
	fn unencodable_credentials_are_never_sent() {
		let transport = Arc::new(RecordingTransport::replying(200, "{}"));
		let (client, store) = client(ServiceDomain::Animal, transport);

		store.set(Credential::new("line\nbreak")).expect("Memory store set should succeed.");

		assert!(matches!(
			client.prepare(Method::GET, client.url(&[]), None),
			Err(Error::Config(ConfigError::InvalidCredentialHeader))
		));
	}

	#[tokio::test]
	async fn unauthorized_raises_the_session_signal_except_for_auth() {
		let animal_transport = Arc::new(RecordingTransport::replying(401, "expired"));
		let (animal, animal_store) = client(ServiceDomain::Animal, animal_transport);
		let auth_transport = Arc::new(RecordingTransport::replying(401, "bad password"));
		let (auth, auth_store) = client(ServiceDomain::Auth, auth_transport);

		animal_store.set(Credential::new("h.p.s")).expect("Memory store set should succeed.");
		auth_store.set(Credential::new("h.p.s")).expect("Memory store set should succeed.");

		let err = animal
			.send("list", Method::GET, animal.url(&[]), None)
			.await
			.expect_err("401 should fail the call.");

		assert!(matches!(err, Error::Status { status: 401, ref message, .. } if message == "expired"));
		assert!(animal_store.get().is_none());
		assert!(animal.session().take_invalidation().is_some());

		auth.send("login", Method::POST, auth.url(&["login"]), None)
			.await
			.expect_err("401 should fail the call.");

		assert!(auth_store.get().is_some());
		assert!(auth.session().take_invalidation().is_none());
	}

	#[tokio::test]
	async fn malformed_json_names_the_path() {
		let transport = Arc::new(RecordingTransport::replying(200, r#"{"id":"seven"}"#));
		let (client, _) = client(ServiceDomain::Animal, transport);

		#[derive(Debug, Deserialize)]
		struct Row {
			#[allow(dead_code)]
			id: i64,
		}

		let err = client
			.get_json::<Row>("get", client.url(&["7"]))
			.await
			.expect_err("Mistyped payload should fail to decode.");

		match err {
			Error::Decode(ResponseDecodeError::Json { source, status, .. }) => {
				assert_eq!(status, 200);
				assert_eq!(source.path().to_string(), "id");
			},
			other => panic!("Unexpected error: {other:?}"),
		}
	}

	#[test]
	fn query_strings_are_only_added_when_needed() {
		let transport = Arc::new(RecordingTransport::replying(200, "{}"));
		let (client, _) = client(ServiceDomain::Animal, transport);
		let empty: [(&str, &str); 0] = [];

		assert_eq!(client.url_with_query(&[], &empty).as_str(), "http://localhost:8081/api/animal");
		assert_eq!(
			client.url_with_query(&["search"], &[("q", "snow leopard")]).as_str(),
			"http://localhost:8081/api/animal/search?q=snow+leopard"
		);
	}
}
