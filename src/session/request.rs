//! Bearer-authorized requests with a single refresh-and-retry on `401 Unauthorized`.

// crates.io
use ::http::{
	HeaderMap, Method, StatusCode,
	header::{AUTHORIZATION, CONTENT_TYPE, HeaderName, HeaderValue},
};
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::ConfigError,
	http::{APPLICATION_JSON, HttpRequest, HttpResponse, SessionHttpClient},
	obs::{self, OpOutcome, OpSpan, SessionOp},
	session::AuthSession,
};

/// Caller-supplied description of an authenticated call.
///
/// The session injects `Authorization` and `Content-Type` on every attempt, replacing any values
/// the caller put under those names; all other headers are sent as given.
#[derive(Clone, Debug)]
pub struct AuthRequest {
	/// HTTP method.
	pub method: Method,
	/// Target URL.
	pub url: Url,
	/// Caller headers.
	pub headers: HeaderMap,
	/// Request body, reused verbatim on retry.
	pub body: Vec<u8>,
}
impl AuthRequest {
	/// Creates a request with no headers and an empty body.
	pub fn new(method: Method, url: Url) -> Self {
		Self { method, url, headers: HeaderMap::new(), body: Vec::new() }
	}

	/// Shorthand for a `GET` request.
	pub fn get(url: Url) -> Self {
		Self::new(Method::GET, url)
	}

	/// Shorthand for a `POST` request.
	pub fn post(url: Url) -> Self {
		Self::new(Method::POST, url)
	}

	/// Shorthand for a `PUT` request.
	pub fn put(url: Url) -> Self {
		Self::new(Method::PUT, url)
	}

	/// Shorthand for a `DELETE` request.
	pub fn delete(url: Url) -> Self {
		Self::new(Method::DELETE, url)
	}

	/// Appends a caller header.
	pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.append(name, value);

		self
	}

	/// Sets a raw body.
	pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
		self.body = body.into();

		self
	}

	/// Serializes `payload` as the JSON body.
	pub fn json<T>(mut self, payload: &T) -> Result<Self, ConfigError>
	where
		T: ?Sized + Serialize,
	{
		self.body = serde_json::to_vec(payload)?;

		Ok(self)
	}

	/// Builds the wire request for one attempt, authorized with `token`.
	pub fn to_http_request(&self, token: &TokenSecret) -> Result<HttpRequest, ConfigError> {
		let authorization =
			token.bearer_header().map_err(|source| ConfigError::InvalidBearer { source })?;
		let mut url = self.url.clone();

		// `http::Uri` rejects fragments, and they are never sent anyway.
		url.set_fragment(None);

		let mut request = ::http::Request::builder()
			.method(self.method.clone())
			.uri(url.as_str())
			.body(self.body.clone())?;
		let headers = request.headers_mut();

		*headers = self.headers.clone();
		headers.insert(AUTHORIZATION, authorization);
		headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));

		Ok(request)
	}
}

/// Decision taken after each send.
#[derive(Debug)]
pub enum RequestStep {
	/// Hand the response to the caller as-is.
	Complete(HttpResponse),
	/// The access token was rejected; refresh and resend.
	Refresh(HttpResponse),
}
impl RequestStep {
	/// Classifies a response: only an exact `401 Unauthorized` asks for a refresh.
	pub fn classify(response: HttpResponse) -> Self {
		if response.status() == StatusCode::UNAUTHORIZED {
			Self::Refresh(response)
		} else {
			Self::Complete(response)
		}
	}
}

impl<C> AuthSession<C>
where
	C: ?Sized + SessionHttpClient,
{
	/// Issues a bearer-authorized request, refreshing and resending once on `401`.
	///
	/// Fails with [`Error::NoAccessToken`] before any network call when logged out. Every status
	/// is returned unmodified: the resent response after a successful refresh, otherwise the
	/// first response (including the original `401` when the refresh failed and the session was
	/// logged out).
	pub async fn request(&self, request: AuthRequest) -> Result<HttpResponse> {
		const OP: SessionOp = SessionOp::Request;

		let span = OpSpan::new(OP, "request");

		obs::record_op_outcome(OP, OpOutcome::Attempt);

		let result = span
			.instrument(async move {
				let token = self.get_access_token().await?.ok_or(Error::NoAccessToken)?;

				match RequestStep::classify(self.send(&request, &token).await?) {
					RequestStep::Complete(response) => Ok(response),
					RequestStep::Refresh(unauthorized) =>
						self.resend_after_refresh(&request, &token, unauthorized).await,
				}
			})
			.await;

		match &result {
			Ok(_) => obs::record_op_outcome(OP, OpOutcome::Success),
			Err(_) => obs::record_op_outcome(OP, OpOutcome::Failure),
		}

		result
	}

	/// Send step: authorizes `request` with `token` and executes it.
	pub(crate) async fn send(
		&self,
		request: &AuthRequest,
		token: &TokenSecret,
	) -> Result<HttpResponse> {
		let wire = request.to_http_request(token)?;

		Ok(self.http_client.execute(wire).await?)
	}

	/// Refresh + resend steps; falls back to `unauthorized` when no new token is available.
	async fn resend_after_refresh(
		&self,
		request: &AuthRequest,
		stale: &TokenSecret,
		unauthorized: HttpResponse,
	) -> Result<HttpResponse> {
		match self.refresh_for_retry(stale).await? {
			Some(fresh) => {
				self.metrics.record_retry();

				self.send(request, &fresh).await
			},
			None => Ok(unauthorized),
		}
	}
}
