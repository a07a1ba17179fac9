//! Base-address configuration for the four console backends.
//!
//! Every backend (auth, user, animal, exemplar) resolves its own base URL. By default all four
//! derive from one API root (`{root}/auth`, `{root}/user`, ...), and each may be overridden
//! independently. Environment lookups treat empty values as unset.

// std
use std::env;
// self
use crate::{_prelude::*, error::ConfigError};

/// Environment key holding the shared API root.
pub const ROOT_ENV_KEY: &str = "ZOO_API_URL";
/// API root used when neither the root nor a per-domain override is configured.
pub const DEFAULT_API_ROOT: &str = "http://localhost:8080/api";

/// Backend services the console talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceDomain {
	/// Login endpoint.
	Auth,
	/// User administration.
	User,
	/// Animal species catalogue and statistics.
	Animal,
	/// Individual animal exemplars.
	Exemplar,
}
impl ServiceDomain {
	/// Every domain, in configuration order.
	pub const ALL: [ServiceDomain; 4] =
		[ServiceDomain::Auth, ServiceDomain::User, ServiceDomain::Animal, ServiceDomain::Exemplar];

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ServiceDomain::Auth => "auth",
			ServiceDomain::User => "user",
			ServiceDomain::Animal => "animal",
			ServiceDomain::Exemplar => "exemplar",
		}
	}

	/// Environment key that overrides this domain's base address.
	pub const fn env_key(self) -> &'static str {
		match self {
			ServiceDomain::Auth => "ZOO_AUTH_API_URL",
			ServiceDomain::User => "ZOO_USER_API_URL",
			ServiceDomain::Animal => "ZOO_ANIMAL_API_URL",
			ServiceDomain::Exemplar => "ZOO_EXEMPLAR_API_URL",
		}
	}
}
impl Display for ServiceDomain {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Validated base addresses, one per [`ServiceDomain`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleConfig {
	/// Auth service base (`POST {auth}/login`).
	pub auth: Url,
	/// User service base.
	pub user: Url,
	/// Animal service base.
	pub animal: Url,
	/// Exemplar service base.
	pub exemplar: Url,
}
impl ConsoleConfig {
	/// Creates a builder with no root and no overrides.
	pub fn builder() -> ConsoleConfigBuilder {
		ConsoleConfigBuilder::default()
	}

	/// Derives all four bases from a single API root.
	pub fn from_root(root: impl Into<String>) -> Result<Self, ConfigError> {
		Self::builder().root(root).build()
	}

	/// Reads [`ROOT_ENV_KEY`] and the per-domain overrides from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|key| env::var(key).ok())
	}

	/// Resolves the configuration through `lookup`, which maps environment keys to values.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
		let mut builder = Self::builder();

		if let Some(root) = read(ROOT_ENV_KEY) {
			builder = builder.root(root);
		}
		for domain in ServiceDomain::ALL {
			if let Some(value) = read(domain.env_key()) {
				builder = builder.domain(domain, value);
			}
		}

		builder.build()
	}

	/// Returns the base address of `domain`.
	pub fn base_url(&self, domain: ServiceDomain) -> &Url {
		match domain {
			ServiceDomain::Auth => &self.auth,
			ServiceDomain::User => &self.user,
			ServiceDomain::Animal => &self.animal,
			ServiceDomain::Exemplar => &self.exemplar,
		}
	}
}

/// Builder for [`ConsoleConfig`] values.
#[derive(Clone, Debug, Default)]
pub struct ConsoleConfigBuilder {
	/// Shared API root; [`DEFAULT_API_ROOT`] when unset.
	pub root: Option<String>,
	/// Per-domain base addresses that bypass the root.
	pub overrides: BTreeMap<ServiceDomain, String>,
}
impl ConsoleConfigBuilder {
	/// Sets the shared API root.
	pub fn root(mut self, root: impl Into<String>) -> Self {
		self.root = Some(root.into());

		self
	}

	/// Pins the base address of one domain.
	pub fn domain(mut self, domain: ServiceDomain, base: impl Into<String>) -> Self {
		self.overrides.insert(domain, base.into());

		self
	}

	/// Validates every address and produces the configuration.
	pub fn build(self) -> Result<ConsoleConfig, ConfigError> {
		let root = self.root.as_deref().unwrap_or(DEFAULT_API_ROOT);
		let resolve = |domain: ServiceDomain| match self.overrides.get(&domain) {
			Some(base) => parse_base(domain, base),
			None => parse_base(domain, root).map(|url| endpoint(&url, &[domain.as_str()])),
		};

		Ok(ConsoleConfig {
			auth: resolve(ServiceDomain::Auth)?,
			user: resolve(ServiceDomain::User)?,
			animal: resolve(ServiceDomain::Animal)?,
			exemplar: resolve(ServiceDomain::Exemplar)?,
		})
	}
}

/// Appends `segments` to `base` one path segment at a time, ignoring a trailing slash on the
/// base. Segments are percent-encoded.
pub fn endpoint(base: &Url, segments: &[&str]) -> Url {
	let mut url = base.clone();

	if let Ok(mut path) = url.path_segments_mut() {
		path.pop_if_empty().extend(segments);
	}

	url
}

fn parse_base(domain: ServiceDomain, value: &str) -> Result<Url, ConfigError> {
	let value = value.trim();
	let url = Url::parse(value).map_err(|source| ConfigError::InvalidBaseUrl {
		domain,
		value: value.to_owned(),
		source,
	})?;

	if !matches!(url.scheme(), "http" | "https") {
		return Err(ConfigError::UnsupportedScheme { domain, scheme: url.scheme().to_owned() });
	}
	if url.cannot_be_a_base() {
		return Err(ConfigError::CannotBeABase { domain, url: url.to_string() });
	}

	Ok(url)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_derive_every_domain_from_the_local_root() {
		let config = ConsoleConfig::builder().build().expect("Default configuration should build.");

		assert_eq!(config.auth.as_str(), "http://localhost:8080/api/auth");
		assert_eq!(config.user.as_str(), "http://localhost:8080/api/user");
		assert_eq!(config.animal.as_str(), "http://localhost:8080/api/animal");
		assert_eq!(config.exemplar.as_str(), "http://localhost:8080/api/exemplar");
	}

	#[test]
	fn overrides_win_over_the_root() {
		let config = ConsoleConfig::builder()
			.root("https://zoo.example.com/api/")
			.domain(ServiceDomain::Animal, "http://localhost:8081/api/animal")
			.build()
			.expect("Configuration with an override should build.");

		assert_eq!(config.user.as_str(), "https://zoo.example.com/api/user");
		assert_eq!(config.base_url(ServiceDomain::Animal).as_str(), "http://localhost:8081/api/animal");
	}

	#[test]
	fn persists_as_plain_url_strings() {
		let config = ConsoleConfig::from_root("https://zoo.example.com/api")
			.expect("Root configuration should build.");
		let json = serde_json::to_value(&config).expect("Configuration should serialize.");

		assert_eq!(json["exemplar"], "https://zoo.example.com/api/exemplar");
		assert_eq!(
			serde_json::from_value::<ConsoleConfig>(json).expect("Configuration should deserialize."),
			config
		);
	}

	#[test]
	fn lookup_ignores_blank_values() {
		let config = ConsoleConfig::from_lookup(|key| match key {
			ROOT_ENV_KEY => Some("http://gateway:9000/api".into()),
			"ZOO_EXEMPLAR_API_URL" => Some("  ".into()),
			"ZOO_USER_API_URL" => Some("http://users:8083/api/user".into()),
			_ => None,
		})
		.expect("Lookup-driven configuration should build.");

		assert_eq!(config.exemplar.as_str(), "http://gateway:9000/api/exemplar");
		assert_eq!(config.user.as_str(), "http://users:8083/api/user");
	}

	#[test]
	fn rejects_unusable_bases() {
		assert!(matches!(
			ConsoleConfig::from_root("not a url"),
			Err(ConfigError::InvalidBaseUrl { domain: ServiceDomain::Auth, .. })
		));
		assert!(matches!(
			ConsoleConfig::builder().domain(ServiceDomain::User, "ftp://files.example.com").build(),
			Err(ConfigError::UnsupportedScheme { domain: ServiceDomain::User, .. })
		));
	}

	#[test]
	fn endpoint_ignores_trailing_slash_and_encodes_segments() {
		let with_slash = Url::parse("http://localhost/api/animal/").expect("Fixture should parse.");
		let without = Url::parse("http://localhost/api/animal").expect("Fixture should parse.");

		assert_eq!(endpoint(&with_slash, &["stats"]), endpoint(&without, &["stats"]));
		assert_eq!(endpoint(&without, &["stats", "export"]).path(), "/api/animal/stats/export");
		assert_eq!(endpoint(&without, &["a b"]).path(), "/api/animal/a%20b");
		assert_eq!(endpoint(&with_slash, &[]).as_str(), "http://localhost/api/animal");
	}
}
