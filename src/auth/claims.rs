//! Local, unverified decoding of compact bearer tokens.
//!
//! The console never verifies signatures; it only reads the payload segment to decide where to
//! route the user. Decoding is pure and total: malformed input yields `None` (or a typed
//! [`ClaimsError`] through [`Claims::try_decode`]) and callers treat that as "no session".

// crates.io
use base64::{
	Engine,
	alphabet,
	engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use serde_json::{Map, Value};
// self
use crate::{_prelude::*, auth::Role, obs};

// Accepts padded and unpadded input, like a browser's `atob`.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
	&alphabet::STANDARD,
	GeneralPurposeConfig::new()
		.with_decode_padding_mode(DecodePaddingMode::Indifferent)
		.with_decode_allow_trailing_bits(true),
);

/// Reasons a token could not be decoded into [`Claims`].
#[derive(Debug, ThisError)]
pub enum ClaimsError {
	/// The token is not `header.payload.signature`.
	#[error("Token has {found} dot-separated segments; expected 3.")]
	SegmentCount {
		/// Number of segments found.
		found: usize,
	},
	/// The payload segment is not valid base64.
	#[error("Token payload is not valid base64.")]
	Base64(#[source] base64::DecodeError),
	/// The payload is not a JSON object.
	#[error("Token payload is not a JSON object.")]
	Json(#[source] serde_json::Error),
}

/// Decoded payload of a bearer token.
///
/// Any JSON object is accepted. Known claims are read field by field; a value of an unexpected
/// shape leaves its field empty and stays in [`Claims::extra`] instead of rejecting the token.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct Claims {
	/// Subject (username); numeric subjects are kept in their decimal form.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub sub: Option<String>,
	/// Single role claim (`ROLE_ADMIN`).
	#[serde(skip_serializing_if = "Option::is_none")]
	pub role: Option<String>,
	/// Ordered role claims, used when `role` is missing. A bare string and Spring-style
	/// `{"authority": ...}` entries are accepted as well.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub roles: Option<Vec<String>>,
	/// Issued-at instant, when present and numeric.
	#[serde(
		serialize_with = "time::serde::timestamp::option::serialize",
		skip_serializing_if = "Option::is_none"
	)]
	pub iat: Option<OffsetDateTime>,
	/// Expiry instant, when present and numeric. Exposed for display only; the console does not
	/// enforce it.
	#[serde(
		serialize_with = "time::serde::timestamp::option::serialize",
		skip_serializing_if = "Option::is_none"
	)]
	pub exp: Option<OffsetDateTime>,
	/// Every other claim, plus known claims whose value could not be read, untouched.
	#[serde(flatten)]
	pub extra: BTreeMap<String, Value>,
}
impl Claims {
	/// Decodes `token`, returning `None` for anything that is not a three-segment token whose
	/// middle segment is a base64url-encoded JSON object.
	pub fn decode(token: &str) -> Option<Self> {
		match Self::try_decode(token) {
			Ok(claims) => Some(claims),
			Err(e) => {
				obs::trace_claims_rejected(&e);

				None
			},
		}
	}

	/// Same as [`Claims::decode`] but keeps the failure reason.
	pub fn try_decode(token: &str) -> Result<Self, ClaimsError> {
		let segments = token.split('.').collect::<Vec<_>>();

		if segments.len() != 3 {
			return Err(ClaimsError::SegmentCount { found: segments.len() });
		}

		let standard = segments[1].replace('-', "+").replace('_', "/");
		let bytes = PAYLOAD_ENGINE.decode(standard).map_err(ClaimsError::Base64)?;

		serde_json::from_slice::<Map<String, Value>>(&bytes)
			.map(Self::from)
			.map_err(ClaimsError::Json)
	}

	/// Returns the role claim that drives routing: the singular `role` when it is non-empty,
	/// otherwise the first entry of `roles`.
	pub fn role_claim(&self) -> Option<&str> {
		self.role
			.as_deref()
			.filter(|role| !role.is_empty())
			.or_else(|| self.roles.as_ref().and_then(|roles| roles.first()).map(String::as_str))
	}

	/// Resolves [`Claims::role_claim`] into a known [`Role`].
	pub fn role(&self) -> Option<Role> {
		self.role_claim().and_then(Role::from_claim)
	}
}
impl From<Map<String, Value>> for Claims {
	fn from(mut payload: Map<String, Value>) -> Self {
		let sub = take_claim(&mut payload, "sub", |value| match value {
			Value::String(sub) => Some(sub.clone()),
			Value::Number(sub) => Some(sub.to_string()),
			_ => None,
		});
		let role = take_claim(&mut payload, "role", |value| value.as_str().map(ToOwned::to_owned));
		let roles = take_claim(&mut payload, "roles", role_list);
		let iat = take_claim(&mut payload, "iat", numeric_date);
		let exp = take_claim(&mut payload, "exp", numeric_date);

		Self { sub, role, roles, iat, exp, extra: payload.into_iter().collect() }
	}
}

// Removes `key` from the payload only when `read` understands its value.
fn take_claim<T>(
	payload: &mut Map<String, Value>,
	key: &str,
	read: impl FnOnce(&Value) -> Option<T>,
) -> Option<T> {
	let claim = payload.get(key).and_then(read)?;

	payload.remove(key);

	Some(claim)
}

fn role_list(value: &Value) -> Option<Vec<String>> {
	match value {
		Value::String(role) => Some(vec![role.clone()]),
		Value::Array(entries) => {
			let roles = entries
				.iter()
				.filter_map(|entry| match entry {
					Value::String(role) => Some(role.clone()),
					Value::Object(grant) =>
						grant.get("authority").and_then(Value::as_str).map(ToOwned::to_owned),
					_ => None,
				})
				.collect::<Vec<_>>();

			(entries.is_empty() || !roles.is_empty()).then_some(roles)
		},
		_ => None,
	}
}

// Lenient NumericDate: integers or fractional seconds; anything else is left unread.
fn numeric_date(value: &Value) -> Option<OffsetDateTime> {
	let seconds = value.as_i64().or_else(|| value.as_f64().map(|f| f.trunc() as i64))?;

	OffsetDateTime::from_unix_timestamp(seconds).ok()
}

#[cfg(test)]
mod tests {
	// crates.io
	use base64::engine::general_purpose::URL_SAFE_NO_PAD;
	use serde_json::json;
	use time::macros;
	// self
	use super::*;

	fn token_with_payload(payload: &[u8]) -> String {
		format!("eyJhbGciOiJIUzI1NiJ9.{}.c2ln", URL_SAFE_NO_PAD.encode(payload))
	}

	fn token(claims: Value) -> String {
		token_with_payload(&serde_json::to_vec(&claims).expect("Claims fixture should serialize."))
	}

	#[test]
	fn decodes_standard_claims() {
		let claims = Claims::decode(&token(json!({
			"sub": "keeper",
			"role": "ROLE_EMPLOYEE",
			"iat": 1_700_000_000,
			"exp": 1_700_003_600.5,
			"tenant": "north-gate",
		})))
		.expect("Well-formed token should decode.");

		assert_eq!(claims.sub.as_deref(), Some("keeper"));
		assert_eq!(claims.role(), Some(Role::Employee));
		assert_eq!(claims.iat, Some(macros::datetime!(2023-11-14 22:13:20 UTC)));
		assert_eq!(claims.exp, Some(macros::datetime!(2023-11-14 23:13:20 UTC)));
		assert_eq!(claims.extra.get("tenant"), Some(&json!("north-gate")));
	}

	#[test]
	fn decoding_is_deterministic() {
		let raw = token(json!({ "roles": ["ROLE_ADMIN"], "sub": "root" }));

		assert_eq!(Claims::decode(&raw), Claims::decode(&raw));
		assert!(Claims::decode(&raw).is_some());
	}

	#[test]
	fn url_safe_characters_are_translated() {
		// `?>~~~` encodes to a `+` in standard base64, a `-` in base64url.
		let raw = token(json!({ "role": "ROLE_MANAGER", "note": "?>~~~" }));

		assert!(raw.contains('_') || raw.contains('-'));
		assert_eq!(Claims::decode(&raw).and_then(|c| c.role()), Some(Role::Manager));
	}

	#[test]
	fn padded_payloads_decode() {
		let padded = format!(
			"h.{}.s",
			base64::engine::general_purpose::STANDARD.encode(br#"{"role": "ROLE_ADMIN"}"#)
		);

		assert!(padded.contains("=="));
		assert_eq!(Claims::decode(&padded).and_then(|c| c.role()), Some(Role::Admin));
	}

	#[test]
	fn wrong_segment_counts_are_absent() {
		for raw in ["", "abc", "a.b", "a.b.c.d", "....", "opaque-session-id"] {
			assert!(Claims::decode(raw).is_none(), "`{raw}` must not decode.");
		}
		assert!(matches!(
			Claims::try_decode("a.b"),
			Err(ClaimsError::SegmentCount { found: 2 })
		));
	}

	#[test]
	fn bad_payloads_are_absent() {
		assert!(matches!(Claims::try_decode("h.!!!!.s"), Err(ClaimsError::Base64(_))));
		assert!(matches!(Claims::try_decode("h..s"), Err(ClaimsError::Json(_))));
		assert!(Claims::decode(&token_with_payload(b"not json")).is_none());
		assert!(Claims::decode(&token_with_payload(b"[\"ROLE_ADMIN\"]")).is_none());
		assert!(Claims::decode(&token_with_payload(b"{\"role\":\"ROLE_ADMIN\"} trailing")).is_none());
	}

	#[test]
	fn singular_role_takes_precedence() {
		let both = Claims {
			role: Some("ROLE_MANAGER".into()),
			roles: Some(vec!["ROLE_ADMIN".into()]),
			..Default::default()
		};
		let plural = Claims {
			roles: Some(vec!["ROLE_ADMIN".into(), "ROLE_EMPLOYEE".into()]),
			..Default::default()
		};
		let blank_singular = Claims {
			role: Some(String::new()),
			roles: Some(vec!["ROLE_EMPLOYEE".into()]),
			..Default::default()
		};

		assert_eq!(both.role(), Some(Role::Manager));
		assert_eq!(plural.role(), Some(Role::Admin));
		assert_eq!(blank_singular.role(), Some(Role::Employee));
		assert_eq!(Claims::default().role_claim(), None);
	}

	#[test]
	fn non_numeric_dates_are_ignored() {
		let claims = Claims::decode(&token(json!({ "role": "ROLE_ADMIN", "exp": "tomorrow" })))
			.expect("Unreadable metadata must not reject the token.");

		assert_eq!(claims.exp, None);
		assert_eq!(claims.extra.get("exp"), Some(&json!("tomorrow")));
		assert_eq!(claims.role(), Some(Role::Admin));
	}

	#[test]
	fn oddly_typed_side_claims_keep_the_token() {
		let numeric_sub = Claims::decode(&token(json!({ "sub": 42, "role": "ROLE_ADMIN" })))
			.expect("Numeric subject must not reject the token.");
		let string_roles =
			Claims::decode(&token(json!({ "role": "ROLE_MANAGER", "roles": "ROLE_MANAGER" })))
				.expect("String roles must not reject the token.");
		let authorities = Claims::decode(&token(json!({
			"role": "ROLE_EMPLOYEE",
			"roles": [{ "authority": "ROLE_EMPLOYEE" }],
		})))
		.expect("Authority objects must not reject the token.");

		assert_eq!(numeric_sub.sub.as_deref(), Some("42"));
		assert_eq!(numeric_sub.role(), Some(Role::Admin));
		assert_eq!(string_roles.roles, Some(vec!["ROLE_MANAGER".to_owned()]));
		assert_eq!(string_roles.role(), Some(Role::Manager));
		assert_eq!(authorities.roles, Some(vec!["ROLE_EMPLOYEE".to_owned()]));
		assert_eq!(authorities.role(), Some(Role::Employee));
	}

	#[test]
	fn unreadable_role_falls_back_to_roles() {
		let claims = Claims::decode(&token(json!({
			"sub": { "id": 7 },
			"role": 3,
			"roles": [{ "authority": "ROLE_VISITOR" }, 5],
		})))
		.expect("Unreadable claims must not reject the token.");

		assert_eq!(claims.sub, None);
		assert_eq!(claims.role, None);
		assert_eq!(claims.extra.get("role"), Some(&json!(3)));
		assert_eq!(claims.extra.get("sub"), Some(&json!({ "id": 7 })));
		assert_eq!(claims.role(), Some(Role::Visitor));
	}
}
