#![cfg(feature = "reqwest")]

// std
use std::time::{SystemTime, UNIX_EPOCH};
// self
use bearer_session::{
	_preludet::*,
	auth::{SessionState, TokenSecret, UserRecord},
	config::SessionConfig,
	session::{AuthRequest, AuthSession},
	store::{FileStore, MemoryStore, SessionStore, StorageKey, StoreError, StoreFuture},
};

type ScriptedSession = AuthSession<ScriptedHttpClient>;

fn offline_config() -> SessionConfig {
	test_session_config("http://localhost:5001")
}

fn offline_session() -> (ScriptedSession, Arc<MemoryStore>, Arc<ScriptedHttpClient>) {
	let backend = Arc::new(MemoryStore::default());
	let store: Arc<dyn SessionStore> = backend.clone();
	let http_client = Arc::new(ScriptedHttpClient::default());
	let session = AuthSession::with_http_client(store, offline_config(), http_client.clone());

	(session, backend, http_client)
}

/// Store that reads as empty and refuses every write.
#[derive(Debug, Default)]
struct ReadOnlyStore;
impl SessionStore for ReadOnlyStore {
	fn get<'a>(&'a self, _key: &'a StorageKey) -> StoreFuture<'a, Option<String>> {
		Box::pin(async { Ok(None) })
	}

	fn set<'a>(&'a self, key: &'a StorageKey, _value: String) -> StoreFuture<'a, ()> {
		Box::pin(async move {
			Err(StoreError::Backend { message: format!("{key} is read-only") })
		})
	}

	fn remove<'a>(&'a self, _key: &'a StorageKey) -> StoreFuture<'a, ()> {
		Box::pin(async { Ok(()) })
	}
}

fn key(name: &str) -> StorageKey {
	StorageKey::new(name).expect("Storage key fixture should be valid.")
}

fn alice() -> UserRecord {
	UserRecord::new(serde_json::json!({ "id": 7, "email": "alice@example.com", "is_admin": false }))
}

fn temp_path(label: &str) -> std::path::PathBuf {
	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System clock should be after the Unix epoch.")
		.as_nanos();

	std::env::temp_dir().join(format!("bearer-session-{label}-{}-{nanos}.json", std::process::id()))
}

#[tokio::test]
async fn login_persists_record_and_exposes_access_token() {
	let (session, backend, _) = offline_session();

	session.login(alice(), "a1", "r1").await.expect("Login should persist the session.");

	assert_eq!(session.state(), SessionState::LoggedIn);
	assert_eq!(session.user(), Some(alice()));
	assert_eq!(
		session.get_access_token().await.expect("Access token read should succeed."),
		Some(TokenSecret::new("a1"))
	);

	let snapshot = backend.snapshot();

	assert_eq!(snapshot.get("accessToken").map(String::as_str), Some("a1"));
	assert_eq!(snapshot.get("refreshToken").map(String::as_str), Some("r1"));

	let persisted_user = UserRecord::from_json(&snapshot["userData"])
		.expect("Persisted user record should be JSON.");

	assert_eq!(persisted_user, alice());
}

#[tokio::test]
async fn login_overwrites_previous_session() {
	let (session, backend, _) = offline_session();

	session.login(alice(), "a1", "r1").await.expect("First login should succeed.");
	session
		.login(UserRecord::new(serde_json::json!({ "id": 8 })), "a9", "r9")
		.await
		.expect("Second login should succeed.");

	let snapshot = backend.snapshot();

	assert_eq!(snapshot.len(), 3);
	assert_eq!(snapshot["accessToken"], "a9");
	assert_eq!(snapshot["refreshToken"], "r9");
	assert_eq!(snapshot["userData"], r#"{"id":8}"#);
}

#[tokio::test]
async fn null_user_is_stored_but_not_exposed() {
	let (session, backend, _) = offline_session();

	session.login(UserRecord::default(), "a1", "r1").await.expect("Login should succeed.");

	assert!(session.is_authenticated());
	assert_eq!(session.user(), None);
	assert_eq!(backend.snapshot()["userData"], "null");
}

#[tokio::test]
async fn failed_login_write_leaves_session_logged_out() {
	let store: Arc<dyn SessionStore> = Arc::new(ReadOnlyStore);
	let session =
		ScriptedSession::with_http_client(store, offline_config(), ScriptedHttpClient::default());
	let err = session
		.login(alice(), "a1", "r1")
		.await
		.expect_err("Login must surface storage failures.");

	assert!(matches!(err, Error::Storage(StoreError::Backend { .. })));
	assert_eq!(session.state(), SessionState::LoggedOut);
	assert_eq!(session.user(), None);
	assert_eq!(session.get_access_token().await.expect("Token read should succeed."), None);
}

#[tokio::test]
async fn logout_clears_every_key_and_is_idempotent() {
	let (session, backend, _) = offline_session();

	session.login(alice(), "a1", "r1").await.expect("Login should succeed.");
	session.logout().await.expect("Logout should succeed.");

	assert!(backend.is_empty());
	assert_eq!(session.state(), SessionState::LoggedOut);
	assert_eq!(session.user(), None);
	assert_eq!(session.get_access_token().await.expect("Token read should succeed."), None);

	session.logout().await.expect("Repeated logout should succeed.");

	assert!(backend.is_empty());
	assert_eq!(session.state(), SessionState::LoggedOut);
}

#[tokio::test]
async fn logged_out_request_fails_before_any_network_call() {
	let (session, _, http_client) = offline_session();
	let target = Url::parse("http://localhost:5001/api/problems").expect("Target URL should parse.");
	let err = session
		.request(AuthRequest::get(target))
		.await
		.expect_err("Requests without an access token must fail.");

	assert!(matches!(err, Error::NoAccessToken));
	assert!(http_client.requests().is_empty());
}

#[tokio::test]
async fn empty_access_token_counts_as_logged_out() {
	let (session, _, http_client) = offline_session();

	session.login(UserRecord::default(), "", "r1").await.expect("Login should succeed.");

	assert_eq!(session.get_access_token().await.expect("Token read should succeed."), None);

	let target = Url::parse("http://localhost:5001/api/problems").expect("Target URL should parse.");
	let err = session
		.request(AuthRequest::get(target))
		.await
		.expect_err("An empty access token must not be sent.");

	assert!(matches!(err, Error::NoAccessToken));
	assert!(http_client.requests().is_empty());
}

#[tokio::test]
async fn empty_refresh_token_logs_out_without_network() {
	let (session, backend, http_client) = offline_session();

	session.login(UserRecord::default(), "a1", "").await.expect("Login should succeed.");

	assert_eq!(session.refresh_access_token().await.expect("Refresh should not error."), None);
	assert!(http_client.requests().is_empty());
	assert!(backend.is_empty());
	assert_eq!(session.state(), SessionState::LoggedOut);
}

#[tokio::test]
async fn get_access_token_reads_storage_not_memory() {
	let (session, backend, _) = offline_session();

	session.login(alice(), "a1", "r1").await.expect("Login should succeed.");
	backend
		.set(&key("accessToken"), "a-external".into())
		.await
		.expect("Direct store write should succeed.");

	assert_eq!(
		session.get_access_token().await.expect("Token read should succeed."),
		Some(TokenSecret::new("a-external"))
	);
}

#[tokio::test]
async fn rehydrate_restores_complete_record() {
	let backend = Arc::new(MemoryStore::default());

	backend
		.set_many(vec![
			(key("accessToken"), "a1".into()),
			(key("refreshToken"), "r1".into()),
			(key("userData"), alice().to_json()),
		])
		.await
		.expect("Seeding the store should succeed.");

	let store: Arc<dyn SessionStore> = backend.clone();
	let session =
		ScriptedSession::restore(store, offline_config(), ScriptedHttpClient::default())
			.await
			.expect("Restore should succeed.");
	let snapshot = session.session();

	assert_eq!(session.state(), SessionState::LoggedIn);
	assert_eq!(snapshot.user, Some(alice()));
	assert_eq!(snapshot.access_token(), Some(&TokenSecret::new("a1")));
	assert_eq!(snapshot.refresh_token(), Some(&TokenSecret::new("r1")));
}

#[tokio::test]
async fn rehydrate_drops_unreadable_user_record() {
	let backend = Arc::new(MemoryStore::default());

	backend
		.set_many(vec![
			(key("accessToken"), "a1".into()),
			(key("refreshToken"), "r1".into()),
			(key("userData"), "{not json".into()),
		])
		.await
		.expect("Seeding the store should succeed.");

	let store: Arc<dyn SessionStore> = backend.clone();
	let session = ScriptedSession::with_http_client(
		store,
		offline_config(),
		ScriptedHttpClient::default(),
	);

	assert_eq!(
		session.rehydrate().await.expect("Rehydrate should succeed."),
		SessionState::LoggedIn
	);
	assert_eq!(session.user(), None);
}

#[tokio::test]
async fn rehydrate_clears_partial_record() {
	let backend = Arc::new(MemoryStore::default());

	backend
		.set_many(vec![(key("accessToken"), "a1".into()), (key("userData"), alice().to_json())])
		.await
		.expect("Seeding the store should succeed.");

	let store: Arc<dyn SessionStore> = backend.clone();
	let session = ScriptedSession::with_http_client(
		store,
		offline_config(),
		ScriptedHttpClient::default(),
	);

	assert_eq!(
		session.rehydrate().await.expect("Rehydrate should succeed."),
		SessionState::LoggedOut
	);
	assert!(backend.is_empty());
	assert!(!session.is_authenticated());
}

#[tokio::test]
async fn rehydrate_of_empty_store_is_logged_out() {
	let (session, backend, _) = offline_session();

	assert_eq!(
		session.rehydrate().await.expect("Rehydrate should succeed."),
		SessionState::LoggedOut
	);
	assert!(backend.is_empty());
}

#[tokio::test]
async fn file_store_session_survives_restart() {
	let path = temp_path("restart");

	{
		let store: Arc<dyn SessionStore> =
			Arc::new(FileStore::open(&path).expect("File store should open."));
		let session = ScriptedSession::with_http_client(
			store,
			offline_config(),
			ScriptedHttpClient::default(),
		);

		session.login(alice(), "a1", "r1").await.expect("Login should persist to disk.");
	}

	let store: Arc<dyn SessionStore> =
		Arc::new(FileStore::open(&path).expect("File store should reopen."));
	let session =
		ScriptedSession::restore(store.clone(), offline_config(), ScriptedHttpClient::default())
			.await
			.expect("Restore from disk should succeed.");

	assert_eq!(session.state(), SessionState::LoggedIn);
	assert_eq!(session.user(), Some(alice()));
	assert_eq!(
		session.get_access_token().await.expect("Token read should succeed."),
		Some(TokenSecret::new("a1"))
	);

	session.logout().await.expect("Logout should clear the file store.");

	assert_eq!(store.get(&key("refreshToken")).await.expect("File read should succeed."), None);

	let _ = std::fs::remove_file(&path);
}
