//! Access token refresh, plus the optional coalescing used by 401 recovery.
//!
//! A refresh either yields a new access token (persisted under the access-token key only) or
//! collapses the entire session through [`AuthSession::logout`]. Failures never reach the caller
//! as errors; [`RefreshFailure`] exists so they can be logged and counted.

// self
use crate::{
	_prelude::*,
	auth::{
		TokenSecret,
		grant::{RefreshGrant, RefreshRequestBody},
	},
	config::RefreshMode,
	error::{ConfigError, ResponseError, TransportError},
	http::{self, SessionHttpClient},
	obs::{self, OpOutcome, OpSpan, SessionOp},
	session::AuthSession,
};

/// Why a refresh collapsed the session.
#[derive(Debug, ThisError)]
pub enum RefreshFailure {
	/// No refresh token was persisted, so the endpoint was not contacted.
	#[error("No refresh token is stored.")]
	MissingRefreshToken,
	/// The refresh request could not be built.
	#[error("Refresh request could not be built.")]
	Request(#[source] ConfigError),
	/// The refresh endpoint was unreachable.
	#[error("Refresh endpoint is unreachable.")]
	Transport(#[source] TransportError),
	/// The refresh endpoint answered with a non-2xx status.
	#[error("Refresh endpoint rejected the refresh token with status {status}.")]
	Rejected {
		/// HTTP status code returned by the endpoint.
		status: u16,
	},
	/// The refresh endpoint answered 2xx without a usable `access_token`.
	#[error("Refresh endpoint returned an unusable body.")]
	Malformed(#[source] ResponseError),
}

impl<C> AuthSession<C>
where
	C: ?Sized + SessionHttpClient,
{
	/// Exchanges the persisted refresh token for a new access token.
	///
	/// Returns `Ok(None)` after logging out when no refresh token is stored, when the endpoint is
	/// unreachable or answers non-2xx, or when its body lacks an `access_token`. Also returns
	/// `Ok(None)`, without touching storage, when the session was logged out or replaced while the
	/// exchange was in flight. `Err` is reserved for storage failures.
	pub async fn refresh_access_token(&self) -> Result<Option<TokenSecret>> {
		const OP: SessionOp = SessionOp::Refresh;

		let span = OpSpan::new(OP, "refresh_access_token");

		obs::record_op_outcome(OP, OpOutcome::Attempt);

		let result = span
			.instrument(async move {
				self.metrics.record_refresh_attempt();

				let Some(refresh_token) =
					self.read_token(&self.config.storage_keys.refresh_token).await?
				else {
					return self.abandon_refresh(RefreshFailure::MissingRefreshToken).await;
				};

				match self.exchange_refresh_token(&refresh_token).await {
					Ok(access_token) => self.apply_refreshed(&refresh_token, access_token).await,
					Err(failure) => self.abandon_refresh(failure).await,
				}
			})
			.await;

		match &result {
			Ok(Some(_)) => obs::record_op_outcome(OP, OpOutcome::Success),
			_ => obs::record_op_outcome(OP, OpOutcome::Failure),
		}

		result
	}

	/// Refresh step of 401 recovery; `stale` is the token the server just rejected.
	///
	/// In [`RefreshMode::Coalesced`] callers queue behind one lock, and a caller that finds a
	/// different token already stored reuses it instead of refreshing again.
	pub(crate) async fn refresh_for_retry(
		&self,
		stale: &TokenSecret,
	) -> Result<Option<TokenSecret>> {
		match self.config.refresh_mode {
			RefreshMode::Independent => self.refresh_access_token().await,
			RefreshMode::Coalesced => {
				let _singleflight = self.refresh_guard.lock().await;

				match self.get_access_token().await? {
					Some(current) if current != *stale => {
						self.metrics.record_coalesced_refresh();
						obs::debug_event(
							SessionOp::Refresh,
							&"Reusing access token refreshed by a concurrent request.",
						);

						Ok(Some(current))
					},
					_ => self.refresh_access_token().await,
				}
			},
		}
	}

	async fn exchange_refresh_token(
		&self,
		refresh_token: &TokenSecret,
	) -> Result<TokenSecret, RefreshFailure> {
		let body = RefreshRequestBody { refresh_token: refresh_token.expose() };
		let request =
			http::json_request(::http::Method::POST, &self.config.endpoints.refresh, &body)
				.map_err(RefreshFailure::Request)?;
		let response =
			self.http_client.execute(request).await.map_err(RefreshFailure::Transport)?;

		if !http::is_success(&response) {
			return Err(RefreshFailure::Rejected { status: response.status().as_u16() });
		}

		let grant: RefreshGrant = http::parse_json(&response).map_err(RefreshFailure::Malformed)?;

		Ok(grant.access_token)
	}

	/// Persists a refreshed access token unless the session moved on during the exchange.
	///
	/// A logout or a new login while the refresh was in flight wins: nothing is written and
	/// `None` is returned.
	async fn apply_refreshed(
		&self,
		refresh_token: &TokenSecret,
		access_token: TokenSecret,
	) -> Result<Option<TokenSecret>> {
		let keys = &self.config.storage_keys;

		if self.read_token(&keys.refresh_token).await?.as_ref() != Some(refresh_token) {
			return Ok(self.discard_refreshed());
		}

		self.store.set(&keys.access_token, access_token.expose().to_owned()).await?;

		// A logout may have landed between the check and the write.
		if self.read_token(&keys.refresh_token).await?.is_none() {
			self.store.remove(&keys.access_token).await?;

			return Ok(self.discard_refreshed());
		}

		self.state.write().replace_access_token(access_token.clone(), refresh_token);
		self.metrics.record_refresh_success();

		Ok(Some(access_token))
	}

	fn discard_refreshed(&self) -> Option<TokenSecret> {
		obs::debug_event(
			SessionOp::Refresh,
			&"Session changed while refreshing; discarding the new access token.",
		);

		None
	}

	async fn abandon_refresh(&self, failure: RefreshFailure) -> Result<Option<TokenSecret>> {
		self.metrics.record_refresh_failure();
		obs::warn_event(
			SessionOp::Refresh,
			&format_args!("Token refresh failed, logging out: {failure}"),
		);
		self.logout().await?;

		Ok(None)
	}
}
