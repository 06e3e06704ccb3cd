//! Transport primitives for authenticated requests and credential exchanges.
//!
//! The session depends on an HTTP stack only through [`SessionHttpClient`]. Requests and
//! responses are plain [`::http`] values with buffered bodies, so custom transports (test doubles,
//! alternative clients, WASM fetch shims) only need to translate those two types.

// crates.io
use ::http::{
	Method,
	header::{ACCEPT, CONTENT_TYPE},
};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, ResponseError, TransportError},
};

/// Media type sent on every JSON request.
pub const APPLICATION_JSON: &str = "application/json";

/// Outbound request with a buffered body.
pub type HttpRequest = ::http::Request<Vec<u8>>;
/// Inbound response with a buffered body.
pub type HttpResponse = ::http::Response<Vec<u8>>;
/// Boxed future returned by [`SessionHttpClient::execute`].
pub type HttpFuture<'a> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing session requests.
///
/// Implementations must return every HTTP status as `Ok`; only failures that prevent a response
/// from being received (DNS, TCP, TLS, body read) map to [`TransportError`]. The session decides
/// what a status means. Implementations must be `Send + Sync + 'static` so one transport can be
/// shared by every clone of a session.
pub trait SessionHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Executes `request` and buffers the response body.
	fn execute(&self, request: HttpRequest) -> HttpFuture<'_>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl std::ops::Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl SessionHttpClient for ReqwestHttpClient {
	fn execute(&self, request: HttpRequest) -> HttpFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let request = reqwest::Request::try_from(request)?;
			let response = client.execute(request).await?;
			let status = response.status();
			let version = response.version();
			let headers = response.headers().to_owned();
			let body = response.bytes().await?.to_vec();
			let mut response_new = HttpResponse::new(body);

			*response_new.status_mut() = status;
			*response_new.version_mut() = version;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

/// Returns `true` for any 2xx status.
pub(crate) fn is_success(response: &HttpResponse) -> bool {
	response.status().is_success()
}

/// Builds an unauthenticated JSON request (used for credential endpoints).
pub(crate) fn json_request<T>(
	method: Method,
	url: &Url,
	body: &T,
) -> Result<HttpRequest, ConfigError>
where
	T: ?Sized + Serialize,
{
	let payload = serde_json::to_vec(body)?;
	let request = ::http::Request::builder()
		.method(method)
		.uri(url.as_str())
		.header(CONTENT_TYPE, APPLICATION_JSON)
		.header(ACCEPT, APPLICATION_JSON)
		.body(payload)?;

	Ok(request)
}

/// Deserializes a JSON response body, keeping the failing path for diagnostics.
pub(crate) fn parse_json<T>(response: &HttpResponse) -> Result<T, ResponseError>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(response.body());

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| ResponseError::Parse { source, status: response.status().as_u16() })
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn success_covers_only_2xx() {
		let mut response = HttpResponse::new(Vec::new());

		assert!(is_success(&response));

		*response.status_mut() = ::http::StatusCode::NO_CONTENT;

		assert!(is_success(&response));

		*response.status_mut() = ::http::StatusCode::FOUND;

		assert!(!is_success(&response));
	}

	#[test]
	fn json_request_sets_media_headers() {
		let url =
			Url::parse("http://localhost:5001/auth/login").expect("Fixture URL should parse.");
		let request = json_request(Method::POST, &url, &serde_json::json!({ "email": "a@b.c" }))
			.expect("JSON request should build.");

		assert_eq!(request.method(), Method::POST);
		assert_eq!(request.uri(), "http://localhost:5001/auth/login");
		assert_eq!(request.headers()[CONTENT_TYPE], APPLICATION_JSON);
		assert_eq!(request.body().as_slice(), br#"{"email":"a@b.c"}"#);
	}

	#[test]
	fn parse_json_reports_failing_path() {
		#[derive(Debug, Deserialize)]
		struct Grant {
			#[allow(dead_code)]
			access_token: String,
		}

		let mut response = HttpResponse::new(br#"{"access_token":7}"#.to_vec());

		*response.status_mut() = ::http::StatusCode::OK;

		let err = parse_json::<Grant>(&response).expect_err("Numeric tokens must be rejected.");
		let ResponseError::Parse { source, status } = err;

		assert_eq!(status, 200);
		assert_eq!(source.path().to_string(), "access_token");
	}
}
