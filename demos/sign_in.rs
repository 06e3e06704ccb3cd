//! Demonstrates signing in with the default reqwest transport, then issuing an authenticated call
//! whose expired token is refreshed and retried transparently.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use bearer_session::{
	auth::Credentials,
	config::SessionConfig,
	http::ReqwestHttpClient,
	reqwest::Client,
	session::{AuthRequest, AuthSession},
	store::{MemoryStore, SessionStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let login_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/login");
			then.status(200).header("content-type", "application/json").body(
				"{\"message\":\"Login successful\",\"access_token\":\"demo-a1\",\"refresh_token\":\"demo-r1\",\"user\":{\"id\":1,\"email\":\"demo@example.com\"}}",
			);
		})
		.await;
	let expired_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/problems").header("authorization", "Bearer demo-a1");
			then.status(401).body("{\"error\":\"Token has expired\"}");
		})
		.await;
	let refresh_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"demo-a2\"}");
		})
		.await;
	let problems_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/problems").header("authorization", "Bearer demo-a2");
			then.status(200)
				.header("content-type", "application/json")
				.body("[{\"id\":1,\"title\":\"Two Sum\"}]");
		})
		.await;
	let config = SessionConfig::builder().base_url(&Url::parse(&server.base_url())?)?.build()?;
	let store: Arc<dyn SessionStore> = Arc::new(MemoryStore::default());
	let http_client = ReqwestHttpClient::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let session = <AuthSession<ReqwestHttpClient>>::restore(store, config, http_client).await?;
	let snapshot = session.sign_in(&Credentials::new("demo@example.com", "demo-password")).await?;

	println!("Signed in as {:?}; session is {}.", snapshot.user, snapshot.state());

	let response =
		session.request(AuthRequest::get(Url::parse(&server.url("/api/problems"))?)).await?;

	println!(
		"Problems endpoint answered {} after {} retry: {}.",
		response.status(),
		session.metrics().retries(),
		String::from_utf8_lossy(response.body()),
	);

	login_mock.assert_async().await;
	expired_mock.assert_async().await;
	refresh_mock.assert_async().await;
	problems_mock.assert_async().await;

	session.logout().await?;

	println!("Logged out; session is {}.", session.state());

	Ok(())
}
