//! Credential sign-in and registration that feed issued tokens into [`AuthSession::login`].

// self
use crate::{
	_prelude::*,
	auth::{Credentials, Session, TokenGrant, grant::ErrorBody},
	error::ConfigError,
	http::{self, SessionHttpClient},
	obs::{self, OpOutcome, OpSpan, SessionOp},
	session::AuthSession,
};

impl<C> AuthSession<C>
where
	C: ?Sized + SessionHttpClient,
{
	/// Exchanges credentials at the login endpoint and logs the session in.
	///
	/// A rejected sign-in fails with [`Error::Rejected`] and leaves the current session untouched.
	pub async fn sign_in(&self, credentials: &Credentials) -> Result<Session> {
		self.exchange_credentials("login", self.config.endpoints.login.as_ref(), credentials).await
	}

	/// Creates an account at the register endpoint and logs the new session in.
	pub async fn register(&self, credentials: &Credentials) -> Result<Session> {
		self.exchange_credentials("register", self.config.endpoints.register.as_ref(), credentials)
			.await
	}

	/// Logs in with a grant obtained elsewhere and returns the resulting snapshot.
	pub async fn login_with_grant(&self, grant: TokenGrant) -> Result<Session> {
		let (user, tokens) = grant.into_parts();

		self.login(user, tokens.access_token, tokens.refresh_token).await?;

		Ok(self.session())
	}

	async fn exchange_credentials(
		&self,
		endpoint: &'static str,
		url: Option<&Url>,
		credentials: &Credentials,
	) -> Result<Session> {
		const OP: SessionOp = SessionOp::SignIn;

		let span = OpSpan::new(OP, endpoint);

		obs::record_op_outcome(OP, OpOutcome::Attempt);

		let result = span
			.instrument(async move {
				let url = url.ok_or(ConfigError::MissingEndpoint { endpoint })?;
				let request = http::json_request(::http::Method::POST, url, credentials)?;
				let response = self.http_client.execute(request).await?;

				if !http::is_success(&response) {
					let status = response.status();
					let reason = serde_json::from_slice::<ErrorBody>(response.body())
						.ok()
						.and_then(|body| body.error)
						.unwrap_or_else(|| {
							status.canonical_reason().unwrap_or("Unexpected status").to_owned()
						});

					return Err(Error::Rejected { status: status.as_u16(), reason });
				}

				let grant: TokenGrant = http::parse_json(&response)?;

				self.login_with_grant(grant).await
			})
			.await;

		match &result {
			Ok(_) => obs::record_op_outcome(OP, OpOutcome::Success),
			Err(_) => obs::record_op_outcome(OP, OpOutcome::Failure),
		}

		result
	}
}
