// std
use std::{env, fs, process};
// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use zoo_console::{
	_preludet::*,
	auth::{Credential, Role},
	config::ConsoleConfig,
	router::{Navigation, View},
	store::{FileSessionStore, MemorySessionStore, SessionStore},
};

fn temp_session_file(label: &str) -> std::path::PathBuf {
	env::temp_dir().join(format!(
		"zoo_console_it_{label}_{}_{}.json",
		process::id(),
		OffsetDateTime::now_utc().unix_timestamp_nanos()
	))
}

#[tokio::test]
async fn file_store_restores_the_session_after_reload() {
	let server = MockServer::start_async().await;
	let config = ConsoleConfig::from_root(server.url("/api")).expect("Mock root should parse.");
	let path = temp_session_file("reload");
	let token = encode_test_token(&json!({ "roles": ["ROLE_MANAGER", "ROLE_EMPLOYEE"] }));

	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/login");
			then.status(200).json_body(json!({ "token": token }));
		})
		.await;

	{
		let store = FileSessionStore::open(&path).expect("Session file should open.");
		let console = ReqwestTestConsole::with_transport(
			config.clone(),
			Arc::new(store),
			test_reqwest_transport(),
		);

		assert_eq!(console.login("ana", "pw").await.expect("Login should succeed."), View::Manager);
	}

	let reopened = FileSessionStore::open(&path).expect("Session file should reopen.");
	let console =
		ReqwestTestConsole::with_transport(config, Arc::new(reopened), test_reqwest_transport());

	assert_eq!(console.navigate(View::Manager), Navigation::Render(View::Manager));
	assert_eq!(
		console.session().claims().and_then(|claims| claims.role()),
		Some(Role::Manager)
	);

	console.logout().expect("Logout should remove the session file.");

	assert!(!path.exists());
	assert!(
		FileSessionStore::open(&path).expect("Session file should reopen.").get().is_none()
	);

	let _ = fs::remove_file(&path);
}

#[test]
fn memory_store_handles_share_one_credential() {
	let (console, store) = build_reqwest_test_console("http://localhost:8080/api");
	let handle: Arc<dyn SessionStore> = store.clone();

	handle.set(Credential::new("shared.token.sig")).expect("Memory store set should succeed.");

	assert!(console.session().is_authenticated());

	store.clear().expect("Memory store clear should succeed.");

	assert!(!console.session().is_authenticated());
	assert!(MemorySessionStore::default().get().is_none());
}
