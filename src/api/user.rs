//! User administration backend.

// crates.io
use http::Method;
// self
use crate::{
	_prelude::*,
	api::Id,
	auth::Role,
	dispatch::ResourceClient,
	export::{self, ExportFile, ExportFormat},
	transport::HttpTransport,
};

// Shapes the user service has answered list requests with.
#[derive(Deserialize)]
#[serde(untagged)]
enum UserListing {
	Bare(Vec<User>),
	Wrapped { users: Vec<User> },
	Paged { content: Vec<User> },
}
impl UserListing {
	fn into_users(self) -> Vec<User> {
		match self {
			Self::Bare(users) | Self::Wrapped { users } | Self::Paged { content: users } => users,
		}
	}
}

/// Account type reported by the user service; the same closed set as [`Role`].
pub type UserType = Role;

/// Console account as exchanged with the user service.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
	/// Server-assigned identifier; absent on create.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<Id>,
	/// Login name.
	#[serde(default)]
	pub username: String,
	/// Contact e-mail.
	#[serde(default)]
	pub email: Option<String>,
	/// Contact phone, used for notifications.
	#[serde(default)]
	pub phone: Option<String>,
	/// Account type.
	#[serde(default)]
	pub user_type: Option<UserType>,
	/// Plain password on create, hashed on reads. Redacted in `Debug`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub password: Option<String>,
}
impl Debug for User {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("User")
			.field("id", &self.id)
			.field("username", &self.username)
			.field("email", &self.email)
			.field("phone", &self.phone)
			.field("user_type", &self.user_type)
			.field("password", &self.password.as_ref().map(|_| "<redacted>"))
			.finish()
	}
}

/// Body of `PUT /{id}/password`.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordUpdate {
	/// Replacement password.
	pub new_password: String,
}
impl Debug for PasswordUpdate {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PasswordUpdate").field("new_password", &"<redacted>").finish()
	}
}

/// Client for the user service.
#[derive(Debug)]
pub struct UserApi<T>
where
	T: ?Sized + HttpTransport,
{
	client: ResourceClient<T>,
}
impl<T> UserApi<T>
where
	T: ?Sized + HttpTransport,
{
	/// Wraps a client bound to the user backend.
	pub fn new(client: ResourceClient<T>) -> Self {
		Self { client }
	}

	/// Underlying dispatch client.
	pub fn client(&self) -> &ResourceClient<T> {
		&self.client
	}

	/// `GET ?type=`: every user, or only those of one type.
	///
	/// Accepts a bare array as well as `{"users": [...]}` and paged `{"content": [...]}` bodies.
	pub async fn list(&self, filter: Option<UserType>) -> Result<Vec<User>> {
		let url = self.client.url_with_query(&[], &type_query(filter));
		let listing = self.client.get_json::<UserListing>("list_users", url).await?;

		Ok(listing.into_users())
	}

	/// `GET /{id}`.
	pub async fn get(&self, id: Id) -> Result<User> {
		self.client.get_json("get_user", self.client.url(&[&id.to_string()])).await
	}

	/// `POST`: creates a user and returns it with its identifier.
	pub async fn create(&self, user: &User) -> Result<User> {
		self.client.send_json("create_user", Method::POST, self.client.url(&[]), user).await
	}

	/// `PUT /{id}`.
	pub async fn update(&self, id: Id, user: &User) -> Result<User> {
		let url = self.client.url(&[&id.to_string()]);

		self.client.send_json("update_user", Method::PUT, url, user).await
	}

	/// `DELETE /{id}`.
	pub async fn delete(&self, id: Id) -> Result<()> {
		let url = self.client.url(&[&id.to_string()]);

		self.client.send_unit::<()>("delete_user", Method::DELETE, url, None).await
	}

	/// `PUT /{id}/password`.
	pub async fn change_password(&self, id: Id, new_password: impl Into<String>) -> Result<()> {
		let url = self.client.url(&[&id.to_string(), "password"]);
		let body = PasswordUpdate { new_password: new_password.into() };

		self.client.send_unit("change_password", Method::PUT, url, Some(&body)).await
	}

	/// `POST /{id}/notify`: asks the service to text the user.
	pub async fn notify(&self, id: Id) -> Result<()> {
		let url = self.client.url(&[&id.to_string(), "notify"]);

		self.client.send_unit::<()>("notify_user", Method::POST, url, None).await
	}

	/// Address of the CSV export, for opening outside the console.
	pub fn export_csv_url(&self, filter: Option<UserType>) -> Url {
		self.client.url_with_query(&["export", "csv"], &type_query(filter))
	}

	/// `GET /export/csv?type=`: CSV rendered by the service.
	pub async fn export_csv(&self, filter: Option<UserType>) -> Result<ExportFile> {
		let bytes = self.client.get_bytes("export_users", self.export_csv_url(filter)).await?;

		Ok(ExportFile::new(
			export::users_file_name(filter, ExportFormat::Csv),
			ExportFormat::Csv.content_type(),
			bytes,
		))
	}

	/// Exports a user list: CSV through the service, JSON and XML from the already fetched
	/// `users`.
	pub async fn export(
		&self,
		format: ExportFormat,
		filter: Option<UserType>,
		users: &[User],
	) -> Result<ExportFile> {
		match export::render_users(users, filter, format)? {
			Some(file) => Ok(file),
			None => self.export_csv(filter).await,
		}
	}
}

fn type_query(filter: Option<UserType>) -> Vec<(&'static str, &'static str)> {
	filter.map(|role| vec![("type", role.as_str())]).unwrap_or_default()
}
