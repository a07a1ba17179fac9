//! Console views, the credential-presence guard in front of them, and the role-based landing
//! choice made after login or after a save.

// self
use crate::{
	_prelude::*,
	api::Id,
	auth::{Claims, Role},
	session::Session,
};

/// Every view the console can show.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum View {
	/// `/`: public landing page.
	Main,
	/// `/login`: the unauthenticated entry view.
	Login,
	/// `/home`: default dashboard for visitors and unknown roles.
	Home,
	/// `/employee`: animal and exemplar maintenance.
	Employee,
	/// `/manager`: statistics.
	Manager,
	/// `/admin`: user administration.
	Admin,
	/// `/admin/create`.
	CreateUser,
	/// `/user/{id}`.
	EditUser(Id),
	/// `/animal/new`.
	NewAnimal,
	/// `/animal/{id}`.
	EditAnimal(Id),
	/// `/exemplar/new`.
	NewExemplar,
	/// `/exemplar/{id}`.
	EditExemplar(Id),
}
impl View {
	/// Canonical path of the view.
	pub fn path(self) -> String {
		match self {
			View::Main => "/".into(),
			View::Login => "/login".into(),
			View::Home => "/home".into(),
			View::Employee => "/employee".into(),
			View::Manager => "/manager".into(),
			View::Admin => "/admin".into(),
			View::CreateUser => "/admin/create".into(),
			View::EditUser(id) => format!("/user/{id}"),
			View::NewAnimal => "/animal/new".into(),
			View::EditAnimal(id) => format!("/animal/{id}"),
			View::NewExemplar => "/exemplar/new".into(),
			View::EditExemplar(id) => format!("/exemplar/{id}"),
		}
	}

	/// Resolves a path to a view. Query strings, fragments, and a trailing slash are ignored;
	/// anything below `/employee/` or `/manager/` belongs to that dashboard.
	pub fn parse(path: &str) -> Option<Self> {
		let path = path.split(['?', '#']).next().unwrap_or_default();
		let segments = path.split('/').filter(|s| !s.is_empty()).collect::<Vec<_>>();

		match segments.as_slice() {
			[] => Some(View::Main),
			["login"] => Some(View::Login),
			["home"] => Some(View::Home),
			["employee", ..] => Some(View::Employee),
			["manager", ..] => Some(View::Manager),
			["admin"] => Some(View::Admin),
			["admin", "create"] => Some(View::CreateUser),
			["user", raw] => parse_id(raw).map(View::EditUser),
			["animal", "new"] => Some(View::NewAnimal),
			["animal", raw] => parse_id(raw).map(View::EditAnimal),
			["exemplar", "new"] => Some(View::NewExemplar),
			["exemplar", raw] => parse_id(raw).map(View::EditExemplar),
			_ => None,
		}
	}

	/// Returns `true` for views behind the [`RouteGuard`].
	pub fn is_protected(self) -> bool {
		!matches!(self, View::Main | View::Login)
	}
}
impl Display for View {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.path())
	}
}

fn parse_id(raw: &str) -> Option<Id> {
	raw.parse().ok()
}

/// Outcome of a navigation attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
	/// The requested view is shown.
	Render(View),
	/// The requested view is discarded in favour of `to`.
	Redirect {
		/// View the caller asked for.
		from: View,
		/// View shown instead.
		to: View,
	},
}
impl Navigation {
	/// View that ends up on screen.
	pub fn view(self) -> View {
		match self {
			Navigation::Render(view) => view,
			Navigation::Redirect { to, .. } => to,
		}
	}
}

/// Presence check in front of protected views.
///
/// Only the presence of a credential is evaluated, not its role: any signed-in user may open any
/// protected view. The backends remain responsible for authorization.
#[derive(Clone, Copy, Debug, Default)]
pub struct RouteGuard;
impl RouteGuard {
	/// View shown to unauthenticated users.
	pub const ENTRY: View = View::Login;

	/// Decides whether `target` may be rendered for `session`.
	pub fn check(session: &Session, target: View) -> Navigation {
		if !target.is_protected() || session.is_authenticated() {
			Navigation::Render(target)
		} else {
			Navigation::Redirect { from: target, to: Self::ENTRY }
		}
	}
}

/// Maps role claims to the dashboard a user lands on.
#[derive(Clone, Copy, Debug, Default)]
pub struct RoleRouter;
impl RoleRouter {
	/// Landing view for a role; visitors and unknown roles go home.
	pub fn for_role(role: Option<Role>) -> View {
		match role {
			Some(Role::Employee) => View::Employee,
			Some(Role::Manager) => View::Manager,
			Some(Role::Admin) => View::Admin,
			Some(Role::Visitor) | None => View::Home,
		}
	}

	/// Landing view for decoded claims; absent claims go home.
	pub fn landing(claims: Option<&Claims>) -> View {
		Self::for_role(claims.and_then(Claims::role))
	}
}
