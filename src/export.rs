//! Downloadable documents: server-rendered exports fetched through the authenticated clients and
//! user lists rendered locally as JSON or XML.

// self
use crate::{_prelude::*, api::User, auth::Role};

/// MIME type of CSV downloads.
pub const CSV_CONTENT_TYPE: &str = "text/csv";
/// MIME type of JSON downloads.
pub const JSON_CONTENT_TYPE: &str = "application/json";
/// MIME type of XML downloads.
pub const XML_CONTENT_TYPE: &str = "application/xml";
/// MIME type of Word documents.
pub const DOCX_CONTENT_TYPE: &str =
	"application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Failures raised while rendering a local export.
#[derive(Debug, ThisError)]
pub enum ExportError {
	/// The user list could not be serialized.
	#[error("Users could not be serialized to JSON.")]
	Json(#[from] serde_json::Error),
}

/// A document ready to be saved or offered for download.
#[derive(Clone, PartialEq, Eq)]
pub struct ExportFile {
	/// Suggested file name.
	pub file_name: String,
	/// MIME type of `bytes`.
	pub content_type: &'static str,
	/// Document contents.
	pub bytes: Vec<u8>,
}
impl ExportFile {
	/// Bundles a document with its name and type.
	pub fn new(file_name: impl Into<String>, content_type: &'static str, bytes: Vec<u8>) -> Self {
		Self { file_name: file_name.into(), content_type, bytes }
	}
}
impl Debug for ExportFile {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ExportFile")
			.field("file_name", &self.file_name)
			.field("content_type", &self.content_type)
			.field("len", &self.bytes.len())
			.finish()
	}
}

/// User-list export formats offered by the admin dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
	/// Rendered by the user service.
	Csv,
	/// Rendered locally, pretty-printed.
	Json,
	/// Rendered locally.
	Xml,
}
impl ExportFormat {
	/// Every format, in display order.
	pub const ALL: [ExportFormat; 3] = [ExportFormat::Csv, ExportFormat::Json, ExportFormat::Xml];

	/// File extension without the dot.
	pub const fn extension(self) -> &'static str {
		match self {
			ExportFormat::Csv => "csv",
			ExportFormat::Json => "json",
			ExportFormat::Xml => "xml",
		}
	}

	/// MIME type of the rendered document.
	pub const fn content_type(self) -> &'static str {
		match self {
			ExportFormat::Csv => CSV_CONTENT_TYPE,
			ExportFormat::Json => JSON_CONTENT_TYPE,
			ExportFormat::Xml => XML_CONTENT_TYPE,
		}
	}
}
impl Display for ExportFormat {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.extension())
	}
}

/// `users.csv`, or `users_MANAGER.csv` when the list is filtered by type.
pub fn users_file_name(filter: Option<Role>, format: ExportFormat) -> String {
	match filter {
		Some(role) => format!("users_{}.{}", role.as_str(), format.extension()),
		None => format!("users.{}", format.extension()),
	}
}

/// Pretty-printed JSON array of `users`.
pub fn users_to_json(users: &[User]) -> Result<Vec<u8>, ExportError> {
	Ok(serde_json::to_vec_pretty(users)?)
}

/// XML document with one `<user>` element per entry; free text is wrapped in CDATA.
pub fn users_to_xml(users: &[User]) -> String {
	let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?><users>"#);

	for user in users {
		xml.push_str("<user>");
		xml.push_str(&format!("<id>{}</id>", user.id.map(|id| id.to_string()).unwrap_or_default()));
		push_cdata(&mut xml, "username", &user.username);
		push_cdata(&mut xml, "email", user.email.as_deref().unwrap_or_default());
		push_cdata(&mut xml, "phone", user.phone.as_deref().unwrap_or_default());
		xml.push_str(&format!(
			"<userType>{}</userType>",
			user.user_type.map(Role::as_str).unwrap_or_default()
		));
		xml.push_str("</user>");
	}

	xml.push_str("</users>");

	xml
}

fn push_cdata(xml: &mut String, tag: &str, text: &str) {
	// A literal `]]>` would close the section early; split it across two sections.
	let escaped = text.replace("]]>", "]]]]><![CDATA[>");

	xml.push_str(&format!("<{tag}><![CDATA[{escaped}]]></{tag}>"));
}

/// Renders `users` locally. CSV is not available here; it comes from the user service.
pub fn render_users(
	users: &[User],
	filter: Option<Role>,
	format: ExportFormat,
) -> Result<Option<ExportFile>, ExportError> {
	let bytes = match format {
		ExportFormat::Csv => return Ok(None),
		ExportFormat::Json => users_to_json(users)?,
		ExportFormat::Xml => users_to_xml(users).into_bytes(),
	};

	Ok(Some(ExportFile::new(users_file_name(filter, format), format.content_type(), bytes)))
}
