//! Demonstrates plugging a custom transport into the session.
//!
//! 1. Implement [`SessionHttpClient`] by translating [`HttpRequest`] into whatever the transport
//!    speaks and buffering the reply into an [`HttpResponse`].
//! 2. Return every HTTP status as `Ok`; only failures that prevent a response map to
//!    [`TransportError`].
//! 3. Hand the transport to [`AuthSession::with_http_client`].

// std
use std::{
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	sync::{
		Arc,
		atomic::{AtomicBool, Ordering},
	},
};
// crates.io
use color_eyre::Result;
use url::Url;
// self
use bearer_session::{
	auth::UserRecord,
	config::SessionConfig,
	error::TransportError,
	http::{HttpFuture, HttpRequest, HttpResponse, SessionHttpClient},
	session::{AuthRequest, AuthSession},
	store::{MemoryStore, SessionStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = SessionConfig::builder()
		.base_url(&Url::parse("https://api.example.com")?)?
		.build()?;
	let store: Arc<dyn SessionStore> = Arc::new(MemoryStore::default());
	let transport = Arc::new(InProcessApi::default());
	let session: AuthSession<InProcessApi> =
		AuthSession::with_http_client(store, config, Arc::clone(&transport));

	session.login(UserRecord::new(serde_json::json!({ "id": 1 })), "stale-access", "r1").await?;

	let target = Url::parse("https://api.example.com/api/profile")?;
	let response = session.request(AuthRequest::get(target.clone())).await?;

	println!(
		"In-process API answered {} with {}.",
		response.status(),
		String::from_utf8_lossy(response.body())
	);
	println!(
		"Access token after the transparent refresh: {:?}.",
		session.get_access_token().await?.as_ref().map(|token| token.expose().to_owned())
	);

	transport.offline.store(true, Ordering::SeqCst);

	match session.request(AuthRequest::get(target)).await {
		Ok(response) => println!("Offline transport unexpectedly answered {}.", response.status()),
		Err(e) => println!("Transport failure surfaced to the caller: {e}."),
	}

	Ok(())
}

#[derive(Debug)]
struct Offline;
impl Display for Offline {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "in-process API is offline")
	}
}
impl StdError for Offline {}

/// Toy API: rejects `stale-access`, rotates refresh token `r1` into `fresh-access`.
#[derive(Debug, Default)]
struct InProcessApi {
	offline: AtomicBool,
}
impl InProcessApi {
	fn respond(&self, request: &HttpRequest) -> (u16, &'static str) {
		let authorization = request
			.headers()
			.get(http::header::AUTHORIZATION)
			.and_then(|value| value.to_str().ok())
			.unwrap_or_default();

		match (request.uri().path(), authorization) {
			("/auth/refresh", _) if request.body().as_slice() == b"{\"refresh_token\":\"r1\"}" =>
				(200, "{\"access_token\":\"fresh-access\"}"),
			("/auth/refresh", _) => (401, "{\"error\":\"Invalid refresh token\"}"),
			(_, "Bearer fresh-access") => (200, "{\"id\":1,\"email\":\"demo@example.com\"}"),
			_ => (401, "{\"error\":\"Token has expired\"}"),
		}
	}
}
impl SessionHttpClient for InProcessApi {
	fn execute(&self, request: HttpRequest) -> HttpFuture<'_> {
		Box::pin(async move {
			if self.offline.load(Ordering::SeqCst) {
				return Err(TransportError::network(Offline));
			}

			let (status, body) = self.respond(&request);
			let mut response = HttpResponse::new(body.as_bytes().to_vec());

			*response.status_mut() =
				http::StatusCode::from_u16(status).map_err(TransportError::network)?;

			Ok(response)
		})
	}
}
