//! The authenticated session: token lifecycle, refresh, and the retry-once request wrapper.
//!
//! [`AuthSession`] owns the transport, the persistent [`SessionStore`], and the in-memory
//! [`Session`] snapshot. Applications build one at their composition root (usually with
//! [`AuthSession::restore`]) and hand clones to every component that issues authenticated calls;
//! clones share state.
//!
//! Authenticated calls run as an explicit step machine: send, and on `401 Unauthorized` refresh
//! the access token and resend exactly once. A failed refresh collapses the whole session.

mod lifecycle;
mod metrics;
mod refresh;
mod request;
mod sign_in;

pub use metrics::SessionMetrics;
pub use refresh::RefreshFailure;
pub use request::*;

// self
use crate::{
	_prelude::*,
	auth::{Session, SessionState, UserRecord},
	config::SessionConfig,
	http::SessionHttpClient,
	store::SessionStore,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Session specialized for the crate's default reqwest transport.
pub type ReqwestSession = AuthSession<ReqwestHttpClient>;

/// Session holder plus authenticated HTTP wrapper.
pub struct AuthSession<C>
where
	C: ?Sized + SessionHttpClient,
{
	/// HTTP client used for every outbound request.
	pub http_client: Arc<C>,
	/// Persistent key-value store mirroring the session.
	pub store: Arc<dyn SessionStore>,
	/// Validated endpoints, storage keys, and refresh policy.
	pub config: SessionConfig,
	metrics: Arc<SessionMetrics>,
	state: Arc<RwLock<Session>>,
	refresh_guard: Arc<AsyncMutex<()>>,
}
impl<C> AuthSession<C>
where
	C: ?Sized + SessionHttpClient,
{
	/// Creates a logged-out session that reuses the caller-provided transport.
	///
	/// Storage is not read; call [`AuthSession::rehydrate`] (or use [`AuthSession::restore`]) to
	/// pick up a persisted session.
	pub fn with_http_client(
		store: Arc<dyn SessionStore>,
		config: SessionConfig,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			store,
			config,
			metrics: Default::default(),
			state: Default::default(),
			refresh_guard: Default::default(),
		}
	}

	/// Creates a session and rehydrates it from the persisted record.
	pub async fn restore(
		store: Arc<dyn SessionStore>,
		config: SessionConfig,
		http_client: impl Into<Arc<C>>,
	) -> Result<Self> {
		let session = Self::with_http_client(store, config, http_client);

		session.rehydrate().await?;

		Ok(session)
	}

	/// Returns a snapshot of the in-memory session.
	pub fn session(&self) -> Session {
		self.state.read().clone()
	}

	/// Returns the current lifecycle state.
	pub fn state(&self) -> SessionState {
		self.state.read().state()
	}

	/// Returns `true` while the in-memory session holds tokens.
	pub fn is_authenticated(&self) -> bool {
		self.state.read().is_authenticated()
	}

	/// Returns the user record of the current session, if any.
	pub fn user(&self) -> Option<UserRecord> {
		self.state.read().user.clone()
	}

	/// Shared counters for refresh and retry activity.
	pub fn metrics(&self) -> &SessionMetrics {
		&self.metrics
	}
}
#[cfg(feature = "reqwest")]
impl AuthSession<ReqwestHttpClient> {
	/// Creates a session with a default reqwest transport and rehydrates it from `store`.
	pub async fn open(store: Arc<dyn SessionStore>, config: SessionConfig) -> Result<Self> {
		Self::restore(store, config, ReqwestHttpClient::default()).await
	}
}
impl<C> Clone for AuthSession<C>
where
	C: ?Sized + SessionHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			store: self.store.clone(),
			config: self.config.clone(),
			metrics: self.metrics.clone(),
			state: self.state.clone(),
			refresh_guard: self.refresh_guard.clone(),
		}
	}
}
impl<C> Debug for AuthSession<C>
where
	C: ?Sized + SessionHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthSession")
			.field("config", &self.config)
			.field("state", &self.state())
			.finish()
	}
}
