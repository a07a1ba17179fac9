//! Console-level error types shared across dispatch, session storage, and configuration.

// self
use crate::{_prelude::*, config::ServiceDomain};

/// Console-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical console error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Session-store failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeouts).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Service answered with a payload the console could not interpret.
	#[error(transparent)]
	Decode(#[from] ResponseDecodeError),
	/// A local export document could not be produced.
	#[error(transparent)]
	Export(#[from] crate::export::ExportError),

	/// Auth service rejected the username/password pair (HTTP 401 on login).
	#[error("Invalid username or password.")]
	InvalidCredentials,
	/// Service answered with a non-success status.
	#[error("The {domain} service responded with HTTP {status}.")]
	Status {
		/// Backend that produced the response.
		domain: ServiceDomain,
		/// HTTP status code.
		status: u16,
		/// Response body excerpt, if any.
		message: String,
	},
}
impl Error {
	/// Returns `true` when a backend rejected the request as unauthenticated.
	pub fn is_unauthorized(&self) -> bool {
		matches!(self, Self::InvalidCredentials | Self::Status { status: 401, .. })
	}

	/// Maps the failure onto the message a view should show.
	pub fn notice(&self) -> Notice {
		match self {
			Self::InvalidCredentials => Notice::InvalidCredentials,
			_ => Notice::UnexpectedError,
		}
	}
}

/// User-facing failure message selected for a view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Notice {
	/// Wrong username or password.
	InvalidCredentials,
	/// Anything else: backend, transport, or payload failures.
	UnexpectedError,
}
impl Notice {
	/// Returns the translation key the presentation layer looks up.
	pub const fn key(self) -> &'static str {
		match self {
			Notice::InvalidCredentials => "invalidCredentials",
			Notice::UnexpectedError => "unexpectedError",
		}
	}
}
impl Display for Notice {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.key())
	}
}

/// Configuration and validation failures raised by the console.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// A base address cannot be parsed.
	#[error("Base URL `{value}` for the {domain} service is invalid.")]
	InvalidBaseUrl {
		/// Backend the address belongs to.
		domain: ServiceDomain,
		/// Raw configured value.
		value: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A base address uses a scheme other than `http`/`https`.
	#[error("Base URL for the {domain} service must use http or https, got `{scheme}`.")]
	UnsupportedScheme {
		/// Backend the address belongs to.
		domain: ServiceDomain,
		/// Offending scheme.
		scheme: String,
	},
	/// A base address cannot carry path segments (e.g. `mailto:`).
	#[error("Base URL `{url}` for the {domain} service cannot be used as a base.")]
	CannotBeABase {
		/// Backend the address belongs to.
		domain: ServiceDomain,
		/// Offending address.
		url: String,
	},
	/// The stored credential contains bytes that are not valid in an HTTP header.
	#[error("Stored credential cannot be encoded as an Authorization header.")]
	InvalidCredentialHeader,
	/// A request body could not be serialized.
	#[error("Request body for the {domain} service could not be serialized.")]
	RequestBody {
		/// Backend the request targeted.
		domain: ServiceDomain,
		/// Serializer failure.
		#[source]
		source: serde_json::Error,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling a console service.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Failures raised while interpreting a successful response body.
#[derive(Debug, ThisError)]
pub enum ResponseDecodeError {
	/// The body is not the JSON document the endpoint promises.
	#[error("The {domain} service returned malformed JSON.")]
	Json {
		/// Backend that produced the response.
		domain: ServiceDomain,
		/// HTTP status code.
		status: u16,
		/// Structured parsing failure naming the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// The login response carried an empty token.
	#[error("The auth service returned an empty token.")]
	EmptyToken,
}
