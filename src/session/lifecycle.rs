//! Login, logout, token reads, and rehydration from storage.

// self
use crate::{
	_prelude::*,
	auth::{Session, SessionState, TokenPair, TokenSecret, UserRecord},
	http::SessionHttpClient,
	obs::{self, OpOutcome, OpSpan, SessionOp},
	session::AuthSession,
	store::StorageKey,
};

impl<C> AuthSession<C>
where
	C: ?Sized + SessionHttpClient,
{
	/// Overwrites the persisted record and then the in-memory session with the given values.
	///
	/// Tokens are stored as given; their shape is not validated. A `null` user record leaves the
	/// session without a user. A storage failure leaves the in-memory session unchanged.
	pub async fn login(
		&self,
		user: UserRecord,
		access_token: impl Into<TokenSecret>,
		refresh_token: impl Into<TokenSecret>,
	) -> Result<()> {
		let tokens = TokenPair::new(access_token, refresh_token);
		let keys = &self.config.storage_keys;
		let entries = vec![
			(keys.access_token.clone(), tokens.access_token.expose().to_owned()),
			(keys.refresh_token.clone(), tokens.refresh_token.expose().to_owned()),
			(keys.user_data.clone(), user.to_json()),
		];
		let user = (!user.is_null()).then_some(user);

		self.store.set_many(entries).await?;

		*self.state.write() = Session::authenticated(user, tokens);

		Ok(())
	}

	/// Clears the in-memory session and deletes every persisted key. Idempotent.
	pub async fn logout(&self) -> Result<()> {
		const OP: SessionOp = SessionOp::Logout;

		self.state.write().clear();

		let keys = self.config.storage_keys.all();
		let result = self.store.remove_many(&keys).await.map_err(Error::from);

		obs::record_op_outcome(
			OP,
			if result.is_ok() { OpOutcome::Success } else { OpOutcome::Failure },
		);

		result
	}

	/// Reads the current access token from storage, the session's source of truth.
	///
	/// An empty stored value counts as no token.
	pub async fn get_access_token(&self) -> Result<Option<TokenSecret>> {
		self.read_token(&self.config.storage_keys.access_token).await
	}

	pub(crate) async fn read_token(&self, key: &StorageKey) -> Result<Option<TokenSecret>> {
		let raw = self.store.get(key).await?;

		Ok(raw.filter(|raw| !raw.is_empty()).map(TokenSecret::new))
	}

	/// Rebuilds the in-memory session from the persisted record.
	///
	/// Both tokens present yields [`SessionState::LoggedIn`]; an unreadable user record is
	/// dropped. Any partial record (one token, or a user without tokens) is cleared from storage.
	pub async fn rehydrate(&self) -> Result<SessionState> {
		const OP: SessionOp = SessionOp::Restore;

		let span = OpSpan::new(OP, "rehydrate");

		obs::record_op_outcome(OP, OpOutcome::Attempt);

		let result = span
			.instrument(async move {
				let keys = &self.config.storage_keys;
				let access = self.read_token(&keys.access_token).await?;
				let refresh = self.read_token(&keys.refresh_token).await?;
				let user_data = self.store.get(&keys.user_data).await?;

				match (access, refresh) {
					(Some(access), Some(refresh)) => {
						let user = user_data.and_then(|raw| decode_user(&raw));

						*self.state.write() =
							Session::authenticated(user, TokenPair::new(access, refresh));

						Ok(SessionState::LoggedIn)
					},
					(None, None) if user_data.is_none() => {
						self.state.write().clear();

						Ok(SessionState::LoggedOut)
					},
					_ => {
						obs::warn_event(OP, &"Persisted session is incomplete; clearing it.");
						self.logout().await?;

						Ok(SessionState::LoggedOut)
					},
				}
			})
			.await;

		match &result {
			Ok(_) => obs::record_op_outcome(OP, OpOutcome::Success),
			Err(_) => obs::record_op_outcome(OP, OpOutcome::Failure),
		}

		result
	}
}

fn decode_user(raw: &str) -> Option<UserRecord> {
	match UserRecord::from_json(raw) {
		Ok(user) if user.is_null() => None,
		Ok(user) => Some(user),
		Err(e) => {
			obs::warn_event(
				SessionOp::Restore,
				&format_args!("Persisted user record is not valid JSON: {e}."),
			);

			None
		},
	}
}
