//! Access levels carried in token claims.

// self
use crate::_prelude::*;

/// Prefix the auth service puts in front of every role claim (`ROLE_ADMIN`).
pub const ROLE_PREFIX: &str = "ROLE_";

/// Access level of a console user.
///
/// Serialized without the prefix (`"ADMIN"`), which is also how the user service reports a
/// user's type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
	/// Public visitor.
	Visitor,
	/// Keeper maintaining animals and exemplars.
	Employee,
	/// Manager with access to statistics.
	Manager,
	/// Administrator managing users.
	Admin,
}
impl Role {
	/// Every role, lowest privilege first.
	pub const ALL: [Role; 4] = [Role::Visitor, Role::Employee, Role::Manager, Role::Admin];

	/// Returns the bare identifier (`ADMIN`).
	pub const fn as_str(self) -> &'static str {
		match self {
			Role::Visitor => "VISITOR",
			Role::Employee => "EMPLOYEE",
			Role::Manager => "MANAGER",
			Role::Admin => "ADMIN",
		}
	}

	/// Returns the prefixed claim value (`ROLE_ADMIN`).
	pub const fn as_claim(self) -> &'static str {
		match self {
			Role::Visitor => "ROLE_VISITOR",
			Role::Employee => "ROLE_EMPLOYEE",
			Role::Manager => "ROLE_MANAGER",
			Role::Admin => "ROLE_ADMIN",
		}
	}

	/// Matches an exact, prefixed claim value. Anything else (bare names, other casing, unknown
	/// roles) yields `None`.
	pub fn from_claim(value: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|role| role.as_claim() == value)
	}
}
impl Display for Role {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for Role {
	type Err = RoleParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let bare = s.strip_prefix(ROLE_PREFIX).unwrap_or(s);

		Self::ALL
			.into_iter()
			.find(|role| role.as_str().eq_ignore_ascii_case(bare))
			.ok_or_else(|| RoleParseError { value: s.to_owned() })
	}
}

/// Error returned when a string names no known role.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Unknown role `{value}`.")]
pub struct RoleParseError {
	/// Rejected input.
	pub value: String,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn claim_matching_is_exact() {
		assert_eq!(Role::from_claim("ROLE_MANAGER"), Some(Role::Manager));
		assert_eq!(Role::from_claim("MANAGER"), None);
		assert_eq!(Role::from_claim("role_manager"), None);
		assert_eq!(Role::from_claim("USER"), None);
	}

	#[test]
	fn parsing_accepts_bare_and_prefixed_names() {
		assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
		assert_eq!("ROLE_EMPLOYEE".parse::<Role>(), Ok(Role::Employee));
		assert!("ROLE_ZOOKEEPER".parse::<Role>().is_err());
	}

	#[test]
	fn serializes_like_the_user_service() {
		let payload = serde_json::to_string(&Role::Visitor).expect("Role should serialize.");

		assert_eq!(payload, "\"VISITOR\"");
	}
}
