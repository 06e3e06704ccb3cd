//! JSON payloads exchanged with the credential and refresh endpoints.

// self
use crate::{
	_prelude::*,
	auth::{TokenPair, TokenSecret, UserRecord},
};

/// Tokens (and the user record) issued by the login or register endpoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenGrant {
	/// Newly issued access token.
	pub access_token: TokenSecret,
	/// Newly issued refresh token.
	pub refresh_token: TokenSecret,
	/// User record returned alongside the tokens.
	#[serde(default)]
	pub user: UserRecord,
	/// Optional human-readable status message.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
}
impl TokenGrant {
	/// Splits the grant into its user record and token pair.
	pub fn into_parts(self) -> (UserRecord, TokenPair) {
		(self.user, TokenPair { access_token: self.access_token, refresh_token: self.refresh_token })
	}
}

/// Body posted to the refresh endpoint.
#[derive(Clone, Copy, Debug, Serialize)]
pub(crate) struct RefreshRequestBody<'a> {
	pub(crate) refresh_token: &'a str,
}

/// Successful refresh endpoint response.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct RefreshGrant {
	pub(crate) access_token: TokenSecret,
}

/// Error body returned by credential endpoints (`{"error": "..."}`).
#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
	#[serde(default)]
	pub(crate) error: Option<String>,
}

/// Email + password pair posted to the login and register endpoints.
#[derive(Clone, Serialize)]
pub struct Credentials {
	/// Account email address.
	pub email: String,
	password: String,
}
impl Credentials {
	/// Creates credentials from an email and password.
	pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
		Self { email: email.into(), password: password.into() }
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("email", &self.email)
			.field("password", &"<redacted>")
			.finish()
	}
}
