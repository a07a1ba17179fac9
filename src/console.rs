//! Top-level console facade: wires one session into the four backend clients and drives
//! navigation through the guard and the role router.

// self
use crate::{
	_prelude::*,
	api::{AnimalApi, AuthApi, ExemplarApi, UserApi},
	config::{ConsoleConfig, ServiceDomain},
	dispatch::ResourceClient,
	router::{Navigation, RoleRouter, RouteGuard, View},
	session::Session,
	store::SessionStore,
	transport::HttpTransport,
};
#[cfg(feature = "reqwest")] use crate::transport::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Console specialized for the crate's default reqwest transport.
pub type ReqwestConsole = Console<ReqwestTransport>;

/// Session-aware entry point of the admin console.
pub struct Console<T>
where
	T: ?Sized + HttpTransport,
{
	config: ConsoleConfig,
	session: Arc<Session>,
	auth: AuthApi<T>,
	users: UserApi<T>,
	animals: AnimalApi<T>,
	exemplars: ExemplarApi<T>,
	current: RwLock<View>,
}
impl<T> Console<T>
where
	T: ?Sized + HttpTransport,
{
	/// Builds a console whose clients share `store` and `transport`.
	pub fn with_transport(
		config: ConsoleConfig,
		store: Arc<dyn SessionStore>,
		transport: impl Into<Arc<T>>,
	) -> Self {
		let session = Arc::new(Session::new(store));
		let transport = transport.into();
		let client = |domain: ServiceDomain| {
			ResourceClient::new(
				domain,
				config.base_url(domain).clone(),
				session.clone(),
				transport.clone(),
			)
		};
		let auth = AuthApi::new(client(ServiceDomain::Auth));
		let users = UserApi::new(client(ServiceDomain::User));
		let animals = AnimalApi::new(client(ServiceDomain::Animal));
		let exemplars = ExemplarApi::new(client(ServiceDomain::Exemplar));

		Self { config, session, auth, users, animals, exemplars, current: RwLock::new(View::Main) }
	}

	/// Resolved base addresses.
	pub fn config(&self) -> &ConsoleConfig {
		&self.config
	}

	/// Session shared by every client.
	pub fn session(&self) -> &Arc<Session> {
		&self.session
	}

	/// Auth backend client.
	pub fn auth(&self) -> &AuthApi<T> {
		&self.auth
	}

	/// User backend client.
	pub fn users(&self) -> &UserApi<T> {
		&self.users
	}

	/// Animal backend client.
	pub fn animals(&self) -> &AnimalApi<T> {
		&self.animals
	}

	/// Exemplar backend client.
	pub fn exemplars(&self) -> &ExemplarApi<T> {
		&self.exemplars
	}

	/// View currently on screen.
	pub fn current_view(&self) -> View {
		*self.current.read()
	}

	/// Attempts to open `target`, redirecting to the login view when no credential is stored.
	pub fn navigate(&self, target: View) -> Navigation {
		let navigation = RouteGuard::check(&self.session, target);

		*self.current.write() = navigation.view();

		navigation
	}

	/// Signs in and lands on the dashboard matching the token's role.
	///
	/// On failure the store is left as it was and the error's [`Error::notice`] tells the login
	/// view what to display.
	pub async fn login(&self, username: &str, password: &str) -> Result<View> {
		let credential = self.auth.login(username, password).await?;
		let landing = RoleRouter::landing(credential.claims().as_ref());

		self.session.begin(credential)?;

		Ok(self.navigate(landing).view())
	}

	/// Signs out and returns to the login view.
	pub fn logout(&self) -> Result<View> {
		self.session.end()?;

		*self.current.write() = RouteGuard::ENTRY;

		Ok(RouteGuard::ENTRY)
	}

	/// Routes by role after an animal or exemplar was created or updated.
	pub fn after_save(&self) -> Navigation {
		self.navigate(RoleRouter::landing(self.session.claims().as_ref()))
	}

	/// Returns to the user list after a user was created or updated.
	pub fn after_user_save(&self) -> Navigation {
		self.navigate(View::Admin)
	}

	/// Consumes a pending session invalidation raised by a failed call, turning it into exactly
	/// one redirect to the login view.
	pub fn handle_invalidation(&self) -> Option<Navigation> {
		self.session.take_invalidation()?;

		let mut current = self.current.write();
		let from = *current;

		*current = RouteGuard::ENTRY;

		Some(Navigation::Redirect { from, to: RouteGuard::ENTRY })
	}
}
#[cfg(feature = "reqwest")]
impl Console<ReqwestTransport> {
	/// Builds a console on a default reqwest client.
	pub fn new(config: ConsoleConfig, store: Arc<dyn SessionStore>) -> Self {
		Self::with_transport(config, store, ReqwestTransport::default())
	}

	/// Builds a console from the process environment.
	pub fn from_env(store: Arc<dyn SessionStore>) -> Result<Self> {
		Ok(Self::new(ConsoleConfig::from_env()?, store))
	}
}
impl<T> Debug for Console<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Console")
			.field("config", &self.config)
			.field("session", &self.session)
			.field("current", &self.current_view())
			.finish()
	}
}
