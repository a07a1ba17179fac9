//! Walks through a console session against mock backends: login, role landing, an authenticated
//! stats fetch, a local user export, and the redirect raised by an expired session.

// std
use std::sync::Arc;
// crates.io
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use color_eyre::Result;
use httpmock::prelude::*;
// self
use zoo_console::{
	auth::Role,
	config::ConsoleConfig,
	console::ReqwestConsole,
	export::ExportFormat,
	router::View,
	store::{MemorySessionStore, SessionStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let payload = URL_SAFE_NO_PAD.encode(br#"{"sub":"ana","role":"ROLE_MANAGER"}"#);
	let token = format!("eyJhbGciOiJIUzI1NiJ9.{payload}.c2lnbmF0dXJl");
	let login_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/login");
			then.status(200)
				.header("content-type", "application/json")
				.body(format!("{{\"token\":\"{token}\"}}"));
		})
		.await;
	let stats_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/animal/stats")
				.header("authorization", format!("Bearer {token}"));
			then.status(200).header("content-type", "application/json").body(
				"{\"countPerCategory\":{\"Mammal\":4},\"dietDistribution\":{\"Herbivore\":4},\"avgWeight\":310.0,\"avgAge\":11.5}",
			);
		})
		.await;
	let users_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/user").query_param("type", "EMPLOYEE");
			then.status(200).header("content-type", "application/json").body(
				"[{\"id\":2,\"username\":\"keeper\",\"email\":\"keeper@zoo.example\",\"userType\":\"EMPLOYEE\"}]",
			);
		})
		.await;
	let store = Arc::new(MemorySessionStore::default());
	let console = ReqwestConsole::new(ConsoleConfig::from_root(server.url("/api"))?, store.clone());
	let landing = console.login("ana", "secret").await?;

	login_mock.assert_async().await;
	println!("Logged in; landing view = {landing}.");

	let stats = console.animals().stats().await?;

	stats_mock.assert_async().await;
	println!(
		"Categories = {:?}, average weight = {:.2}, average age = {:.2}.",
		stats.count_per_category, stats.avg_weight, stats.avg_age
	);

	let users = console.users().list(Some(Role::Employee)).await?;
	let export = console.users().export(ExportFormat::Xml, None, &users).await?;

	users_mock.assert_async().await;
	println!("Exported {} ({} bytes).", export.file_name, export.bytes.len());

	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/exemplar");
			then.status(401);
		})
		.await;

	if let Err(e) = console.exemplars().list().await {
		println!("Exemplar list failed: {e} (notice: {}).", e.notice());
	}
	if let Some(navigation) = console.handle_invalidation() {
		println!("Session invalidated; now showing {}.", navigation.view());
	}

	assert!(store.get().is_none());
	assert_eq!(console.current_view(), View::Login);

	Ok(())
}
