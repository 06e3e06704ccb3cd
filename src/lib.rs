//! Bearer-token session holder that persists credentials, signs outbound requests, and transparently
//! refreshes + retries once when the access token has expired.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod obs;
pub mod session;
pub mod store;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// std
	use std::collections::VecDeque;
	// self
	use crate::{
		config::SessionConfig,
		error::TransportError,
		http::{HttpFuture, HttpRequest, HttpResponse, ReqwestHttpClient, SessionHttpClient},
		session::AuthSession,
		store::{MemoryStore, SessionStore},
	};

	/// Session type alias used by reqwest-backed integration tests.
	pub type ReqwestTestSession = AuthSession<ReqwestHttpClient>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Builds a config whose auth endpoints live under `base_url` (usually `MockServer::base_url`).
	pub fn test_session_config(base_url: &str) -> SessionConfig {
		let base = Url::parse(base_url).expect("Mock server base URL should parse.");

		SessionConfig::builder()
			.base_url(&base)
			.expect("Mock server base URL should derive auth endpoints.")
			.build()
			.expect("Test session config should validate.")
	}

	/// Constructs a logged-out [`AuthSession`] backed by an in-memory store and the reqwest
	/// transport used across integration tests.
	pub fn build_reqwest_test_session(
		config: SessionConfig,
	) -> (ReqwestTestSession, Arc<MemoryStore>) {
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn SessionStore> = store_backend.clone();
		let session = AuthSession::with_http_client(store, config, test_reqwest_http_client());

		(session, store_backend)
	}

	/// Reply queued on a [`ScriptedHttpClient`].
	#[derive(Clone, Debug)]
	pub enum ScriptedReply {
		/// Respond with the given status and JSON body.
		Json(u16, &'static str),
		/// Fail with a network-level transport error.
		NetworkDown,
	}

	/// Request observed by a [`ScriptedHttpClient`].
	#[derive(Clone, Debug, PartialEq, Eq)]
	pub struct RecordedRequest {
		/// HTTP method.
		pub method: String,
		/// Full request URI.
		pub uri: String,
		/// `Authorization` header, if any.
		pub authorization: Option<String>,
		/// Request body.
		pub body: Vec<u8>,
	}

	/// In-process transport that replays queued replies in order and records every request.
	///
	/// Running out of replies panics, so tests notice unexpected network calls.
	#[derive(Debug, Default)]
	pub struct ScriptedHttpClient {
		replies: Mutex<VecDeque<ScriptedReply>>,
		requests: Mutex<Vec<RecordedRequest>>,
	}
	impl ScriptedHttpClient {
		/// Creates a transport that will answer with `replies` in order.
		pub fn new(replies: impl IntoIterator<Item = ScriptedReply>) -> Self {
			Self { replies: Mutex::new(replies.into_iter().collect()), requests: Default::default() }
		}

		/// Returns every request executed so far.
		pub fn requests(&self) -> Vec<RecordedRequest> {
			self.requests.lock().clone()
		}

		fn record(&self, request: &HttpRequest) {
			let authorization = request
				.headers()
				.get(::http::header::AUTHORIZATION)
				.and_then(|value| value.to_str().ok())
				.map(str::to_owned);

			self.requests.lock().push(RecordedRequest {
				method: request.method().to_string(),
				uri: request.uri().to_string(),
				authorization,
				body: request.body().clone(),
			});
		}
	}
	impl SessionHttpClient for ScriptedHttpClient {
		fn execute(&self, request: HttpRequest) -> HttpFuture<'_> {
			self.record(&request);

			let reply = self.replies.lock().pop_front();

			Box::pin(async move {
				match reply {
					Some(ScriptedReply::Json(status, body)) => {
						let mut response = HttpResponse::new(body.as_bytes().to_vec());

						*response.status_mut() = ::http::StatusCode::from_u16(status)
							.expect("Scripted status codes should be valid.");

						Ok(response)
					},
					Some(ScriptedReply::NetworkDown) => Err(TransportError::network(
						std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "network down"),
					)),
					None => panic!("ScriptedHttpClient received an unexpected request."),
				}
			})
		}
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
