//! In-memory session snapshot and lifecycle state.

// self
use crate::{
	_prelude::*,
	auth::{TokenSecret, UserRecord},
};

/// Lifecycle state of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
	/// No tokens are held; authenticated calls fail fast.
	LoggedOut,
	/// Both tokens are held.
	LoggedIn,
}
impl SessionState {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			SessionState::LoggedOut => "logged_out",
			SessionState::LoggedIn => "logged_in",
		}
	}
}
impl Display for SessionState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Access + refresh token pair; a session holds both or neither.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
	/// Short-lived bearer credential.
	pub access_token: TokenSecret,
	/// Longer-lived credential exchanged for new access tokens.
	pub refresh_token: TokenSecret,
}
impl TokenPair {
	/// Creates a pair from the provided secrets.
	pub fn new(access_token: impl Into<TokenSecret>, refresh_token: impl Into<TokenSecret>) -> Self {
		Self { access_token: access_token.into(), refresh_token: refresh_token.into() }
	}
}

/// Snapshot of the currently authenticated user and their tokens.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
	/// Opaque user record, if one is known.
	pub user: Option<UserRecord>,
	/// Token pair, present only while logged in.
	pub tokens: Option<TokenPair>,
}
impl Session {
	/// Builds a logged-in session.
	pub fn authenticated(user: Option<UserRecord>, tokens: TokenPair) -> Self {
		Self { user, tokens: Some(tokens) }
	}

	/// Returns the lifecycle state derived from token presence.
	pub fn state(&self) -> SessionState {
		if self.tokens.is_some() { SessionState::LoggedIn } else { SessionState::LoggedOut }
	}

	/// Returns `true` while a token pair is held.
	pub fn is_authenticated(&self) -> bool {
		self.tokens.is_some()
	}

	/// Borrows the access token, if any.
	pub fn access_token(&self) -> Option<&TokenSecret> {
		self.tokens.as_ref().map(|pair| &pair.access_token)
	}

	/// Borrows the refresh token, if any.
	pub fn refresh_token(&self) -> Option<&TokenSecret> {
		self.tokens.as_ref().map(|pair| &pair.refresh_token)
	}

	/// Replaces the access token after a refresh, keeping the user and refresh token.
	///
	/// Only applies while the session still holds `refresh_token`, the secret that was exchanged.
	/// A cleared or re-logged-in session is left alone and `false` is returned.
	pub fn replace_access_token(
		&mut self,
		access_token: TokenSecret,
		refresh_token: &TokenSecret,
	) -> bool {
		match self.tokens.as_mut() {
			Some(pair) if pair.refresh_token == *refresh_token => {
				pair.access_token = access_token;

				true
			},
			_ => false,
		}
	}

	/// Drops the user and both tokens.
	pub fn clear(&mut self) {
		self.user = None;
		self.tokens = None;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn state_follows_token_presence() {
		let mut session = Session::default();

		assert_eq!(session.state(), SessionState::LoggedOut);
		assert!(session.access_token().is_none());

		session = Session::authenticated(None, TokenPair::new("a1", "r1"));

		assert_eq!(session.state(), SessionState::LoggedIn);
		assert_eq!(session.access_token().map(TokenSecret::expose), Some("a1"));

		session.clear();

		assert_eq!(session, Session::default());
	}

	#[test]
	fn replacing_access_token_keeps_refresh_and_user() {
		let user = UserRecord::new(serde_json::json!({ "id": 1 }));
		let mut session = Session::authenticated(Some(user.clone()), TokenPair::new("a1", "r1"));

		assert!(session.replace_access_token(TokenSecret::new("a2"), &TokenSecret::new("r1")));
		assert_eq!(session.access_token().map(TokenSecret::expose), Some("a2"));
		assert_eq!(session.refresh_token().map(TokenSecret::expose), Some("r1"));
		assert_eq!(session.user, Some(user));
	}

	#[test]
	fn replacing_access_token_leaves_cleared_session_alone() {
		let mut session = Session::default();

		assert!(!session.replace_access_token(TokenSecret::new("a2"), &TokenSecret::new("r1")));
		assert_eq!(session, Session::default());
	}

	#[test]
	fn replacing_access_token_ignores_superseded_refresh_token() {
		let mut session = Session::authenticated(None, TokenPair::new("a9", "r9"));

		assert!(!session.replace_access_token(TokenSecret::new("a2"), &TokenSecret::new("r1")));
		assert_eq!(session.access_token().map(TokenSecret::expose), Some("a9"));
	}
}
