//! Animal species catalogue, statistics, and server-rendered exports.

// crates.io
use http::Method;
// self
use crate::{
	_prelude::*,
	api::Id,
	dispatch::ResourceClient,
	export::{self, ExportFile},
	transport::HttpTransport,
};

/// File name of the statistics report.
pub const STATS_EXPORT_FILE_NAME: &str = "animal-stats.docx";

/// Species record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Animal {
	/// Server-assigned identifier; absent on create.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<Id>,
	/// Species name.
	#[serde(default)]
	pub name: String,
	/// Category such as `Mammal` or `Bird`.
	#[serde(default)]
	pub category: Option<String>,
	/// Diet type such as `Herbivore`.
	#[serde(default)]
	pub diet_type: Option<String>,
	/// Natural habitat.
	#[serde(default)]
	pub habitat: Option<String>,
	/// Average weight in kilograms.
	#[serde(default)]
	pub average_weight: Option<f64>,
	/// Average age in years.
	#[serde(default)]
	pub average_age: Option<f64>,
}

/// Criteria for `GET /filter`; unset fields are not sent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimalFilter {
	/// Category to match.
	pub category: Option<String>,
	/// Species to match.
	pub species: Option<String>,
	/// Diet type to match.
	pub diet_type: Option<String>,
	/// Habitat to match.
	pub habitat: Option<String>,
}
impl AnimalFilter {
	/// Query pairs for the criteria that are set, in a stable order.
	pub fn query(&self) -> Vec<(&'static str, &str)> {
		[
			("category", &self.category),
			("species", &self.species),
			("dietType", &self.diet_type),
			("habitat", &self.habitat),
		]
		.into_iter()
		.filter_map(|(key, value)| value.as_deref().map(|value| (key, value)))
		.collect()
	}
}

/// Aggregates served by `GET /stats`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimalStats {
	/// Number of species per category.
	#[serde(default)]
	pub count_per_category: BTreeMap<String, u64>,
	/// Number of species per diet type.
	#[serde(default)]
	pub diet_distribution: BTreeMap<String, u64>,
	/// Average weight across all species.
	#[serde(default)]
	pub avg_weight: f64,
	/// Average age across all species.
	#[serde(default)]
	pub avg_age: f64,
}

/// Formats accepted by `GET /export?format=`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimalExportFormat {
	/// Comma-separated values.
	#[default]
	Csv,
	/// JSON array.
	Json,
	/// XML document.
	Xml,
	/// Word document with charts.
	Doc,
}
impl AnimalExportFormat {
	/// Value of the `format` query parameter.
	pub const fn as_str(self) -> &'static str {
		match self {
			AnimalExportFormat::Csv => "csv",
			AnimalExportFormat::Json => "json",
			AnimalExportFormat::Xml => "xml",
			AnimalExportFormat::Doc => "doc",
		}
	}

	/// Extension of the downloaded file.
	pub const fn extension(self) -> &'static str {
		match self {
			AnimalExportFormat::Doc => "docx",
			other => other.as_str(),
		}
	}

	/// MIME type of the downloaded file.
	pub const fn content_type(self) -> &'static str {
		match self {
			AnimalExportFormat::Csv => export::CSV_CONTENT_TYPE,
			AnimalExportFormat::Json => export::JSON_CONTENT_TYPE,
			AnimalExportFormat::Xml => export::XML_CONTENT_TYPE,
			AnimalExportFormat::Doc => export::DOCX_CONTENT_TYPE,
		}
	}

	/// `animals.<ext>`.
	pub fn file_name(self) -> String {
		format!("animals.{}", self.extension())
	}
}
impl Display for AnimalExportFormat {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Client for the animal service. Statistics go through this client as well, so they carry the
/// session credential like every other call.
#[derive(Debug)]
pub struct AnimalApi<T>
where
	T: ?Sized + HttpTransport,
{
	client: ResourceClient<T>,
}
impl<T> AnimalApi<T>
where
	T: ?Sized + HttpTransport,
{
	/// Wraps a client bound to the animal backend.
	pub fn new(client: ResourceClient<T>) -> Self {
		Self { client }
	}

	/// Underlying dispatch client.
	pub fn client(&self) -> &ResourceClient<T> {
		&self.client
	}

	/// `GET ?sort=`. Without `sort` the service orders by species then diet type.
	pub async fn list(&self, sort: Option<&str>) -> Result<Vec<Animal>> {
		let query = sort.map(|sort| vec![("sort", sort)]).unwrap_or_default();
		let url = self.client.url_with_query(&[], &query);

		self.client.get_json("list_animals", url).await
	}

	/// `GET /{id}`.
	pub async fn get(&self, id: Id) -> Result<Animal> {
		self.client.get_json("get_animal", self.client.url(&[&id.to_string()])).await
	}

	/// `GET /filter`.
	pub async fn filter(&self, filter: &AnimalFilter) -> Result<Vec<Animal>> {
		let url = self.client.url_with_query(&["filter"], &filter.query());

		self.client.get_json("filter_animals", url).await
	}

	/// `GET /search?q=`: matches category or species.
	pub async fn search(&self, q: &str) -> Result<Vec<Animal>> {
		let url = self.client.url_with_query(&["search"], &[("q", q)]);

		self.client.get_json("search_animals", url).await
	}

	/// `POST`.
	pub async fn create(&self, animal: &Animal) -> Result<Animal> {
		self.client.send_json("create_animal", Method::POST, self.client.url(&[]), animal).await
	}

	/// `PUT /{id}`.
	pub async fn update(&self, id: Id, animal: &Animal) -> Result<Animal> {
		let url = self.client.url(&[&id.to_string()]);

		self.client.send_json("update_animal", Method::PUT, url, animal).await
	}

	/// `DELETE /{id}`.
	pub async fn delete(&self, id: Id) -> Result<()> {
		let url = self.client.url(&[&id.to_string()]);

		self.client.send_unit::<()>("delete_animal", Method::DELETE, url, None).await
	}

	/// Address of the catalogue export, for opening outside the console.
	pub fn export_url(&self, format: AnimalExportFormat) -> Url {
		self.client.url_with_query(&["export"], &[("format", format.as_str())])
	}

	/// `GET /export?format=`.
	pub async fn export(&self, format: AnimalExportFormat) -> Result<ExportFile> {
		let bytes = self.client.get_bytes("export_animals", self.export_url(format)).await?;

		Ok(ExportFile::new(format.file_name(), format.content_type(), bytes))
	}

	/// `GET /stats`.
	pub async fn stats(&self) -> Result<AnimalStats> {
		self.client.get_json("animal_stats", self.client.url(&["stats"])).await
	}

	/// Address of the statistics report, for opening outside the console.
	pub fn stats_export_url(&self) -> Url {
		self.client.url(&["stats", "export"])
	}

	/// `GET /stats/export`: Word report of [`AnimalApi::stats`].
	pub async fn export_stats(&self) -> Result<ExportFile> {
		let bytes = self.client.get_bytes("export_animal_stats", self.stats_export_url()).await?;

		Ok(ExportFile::new(STATS_EXPORT_FILE_NAME, export::DOCX_CONTENT_TYPE, bytes))
	}
}
