//! Individual animals kept at the zoo.

// crates.io
use http::Method;
// self
use crate::{_prelude::*, api::Id, dispatch::ResourceClient, transport::HttpTransport};

/// One animal, linked to its species record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exemplar {
	/// Server-assigned identifier; absent on create.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<Id>,
	/// Species record this exemplar belongs to.
	#[serde(default)]
	pub animal_id: Option<Id>,
	/// Given name.
	#[serde(default)]
	pub name: String,
	/// Species label.
	#[serde(default)]
	pub specie: Option<String>,
	/// Photo addresses.
	#[serde(default)]
	pub images: Vec<String>,
	/// Enclosure or area.
	#[serde(default)]
	pub location: Option<String>,
	/// Age in years.
	#[serde(default)]
	pub age: Option<f64>,
	/// Weight in kilograms.
	#[serde(default)]
	pub weight: Option<f64>,
	/// Keeper notes.
	#[serde(default)]
	pub notes: Option<String>,
}

/// Client for the exemplar service.
#[derive(Debug)]
pub struct ExemplarApi<T>
where
	T: ?Sized + HttpTransport,
{
	client: ResourceClient<T>,
}
impl<T> ExemplarApi<T>
where
	T: ?Sized + HttpTransport,
{
	/// Wraps a client bound to the exemplar backend.
	pub fn new(client: ResourceClient<T>) -> Self {
		Self { client }
	}

	/// Underlying dispatch client.
	pub fn client(&self) -> &ResourceClient<T> {
		&self.client
	}

	/// `GET`.
	pub async fn list(&self) -> Result<Vec<Exemplar>> {
		self.client.get_json("list_exemplars", self.client.url(&[])).await
	}

	/// `GET /{id}`.
	pub async fn get(&self, id: Id) -> Result<Exemplar> {
		self.client.get_json("get_exemplar", self.client.url(&[&id.to_string()])).await
	}

	/// `POST`.
	pub async fn create(&self, exemplar: &Exemplar) -> Result<Exemplar> {
		self.client.send_json("create_exemplar", Method::POST, self.client.url(&[]), exemplar).await
	}

	/// `PUT /{id}`.
	pub async fn update(&self, id: Id, exemplar: &Exemplar) -> Result<Exemplar> {
		let url = self.client.url(&[&id.to_string()]);

		self.client.send_json("update_exemplar", Method::PUT, url, exemplar).await
	}

	/// `DELETE /{id}`.
	pub async fn delete(&self, id: Id) -> Result<()> {
		let url = self.client.url(&[&id.to_string()]);

		self.client.send_unit::<()>("delete_exemplar", Method::DELETE, url, None).await
	}
}
