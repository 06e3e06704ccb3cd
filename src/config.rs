//! Session configuration: credential endpoints, storage key layout, and refresh behavior.
//!
//! Configs are assembled with [`SessionConfigBuilder`] and validated once at build time so the
//! request path never has to re-check them.

// self
use crate::{_prelude::*, store::StorageKeys};

/// Path of the refresh endpoint relative to the API base URL.
pub const DEFAULT_REFRESH_PATH: &str = "auth/refresh";
/// Path of the login endpoint relative to the API base URL.
pub const DEFAULT_LOGIN_PATH: &str = "auth/login";
/// Path of the register endpoint relative to the API base URL.
pub const DEFAULT_REGISTER_PATH: &str = "auth/register";

/// How concurrent 401 recoveries share refresh calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshMode {
	#[default]
	/// Every request that sees a 401 performs its own refresh call.
	Independent,
	/// 401 recoveries queue behind one in-flight refresh and reuse its token.
	Coalesced,
}

/// Endpoint set used by a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEndpoints {
	/// Token refresh endpoint (`{"refresh_token"}` → `{"access_token"}`).
	pub refresh: Url,
	/// Optional credential login endpoint.
	pub login: Option<Url>,
	/// Optional account registration endpoint.
	pub register: Option<Url>,
}

/// Immutable, validated session configuration.
///
/// Deserialized configs go through the same validation as [`SessionConfigBuilder::build`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedSessionConfig")]
pub struct SessionConfig {
	/// Credential endpoints.
	pub endpoints: SessionEndpoints,
	/// Key names of the persisted session record.
	pub storage_keys: StorageKeys,
	/// Refresh sharing policy for concurrent 401s.
	pub refresh_mode: RefreshMode,
}
impl SessionConfig {
	/// Creates a new builder.
	pub fn builder() -> SessionConfigBuilder {
		SessionConfigBuilder::default()
	}
}

/// Errors raised while constructing or validating a [`SessionConfig`].
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum SessionConfigError {
	/// The refresh endpoint is mandatory.
	#[error("Missing refresh endpoint.")]
	MissingRefreshEndpoint,
	/// An endpoint could not be derived from the base URL.
	#[error("Cannot derive the {endpoint} endpoint from the base URL.")]
	InvalidBaseUrl {
		/// Endpoint being derived.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoints must speak HTTP(S).
	#[error("The {endpoint} endpoint must use http or https: {url}.")]
	UnsupportedScheme {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Credentials embedded in URLs would leak into logs.
	#[error("The {endpoint} endpoint must not embed credentials.")]
	EmbeddedCredentials {
		/// Which endpoint failed validation.
		endpoint: &'static str,
	},
	/// Two storage roles share one key name.
	#[error("Storage keys must be distinct.")]
	DuplicateStorageKeys,
}

/// Builder for [`SessionConfig`] values.
#[derive(Debug, Default)]
pub struct SessionConfigBuilder {
	/// Refresh endpoint (required).
	pub refresh_endpoint: Option<Url>,
	/// Optional login endpoint.
	pub login_endpoint: Option<Url>,
	/// Optional register endpoint.
	pub register_endpoint: Option<Url>,
	/// Storage key layout.
	pub storage_keys: StorageKeys,
	/// Refresh sharing policy.
	pub refresh_mode: RefreshMode,
}
impl SessionConfigBuilder {
	/// Derives the refresh, login, and register endpoints from an API base URL.
	///
	/// A base without a trailing slash is treated as a directory, so
	/// `http://localhost:5001/api` yields `http://localhost:5001/api/auth/refresh`.
	pub fn base_url(mut self, base: &Url) -> Result<Self, SessionConfigError> {
		let mut base = base.clone();

		if !base.path().ends_with('/') {
			let path = format!("{}/", base.path());

			base.set_path(&path);
		}

		let join = |endpoint: &'static str, path: &str| {
			base.join(path).map_err(|source| SessionConfigError::InvalidBaseUrl { endpoint, source })
		};

		self.refresh_endpoint = Some(join("refresh", DEFAULT_REFRESH_PATH)?);
		self.login_endpoint = Some(join("login", DEFAULT_LOGIN_PATH)?);
		self.register_endpoint = Some(join("register", DEFAULT_REGISTER_PATH)?);

		Ok(self)
	}

	/// Sets the refresh endpoint.
	pub fn refresh_endpoint(mut self, url: Url) -> Self {
		self.refresh_endpoint = Some(url);

		self
	}

	/// Sets the login endpoint.
	pub fn login_endpoint(mut self, url: Url) -> Self {
		self.login_endpoint = Some(url);

		self
	}

	/// Sets the register endpoint.
	pub fn register_endpoint(mut self, url: Url) -> Self {
		self.register_endpoint = Some(url);

		self
	}

	/// Overrides the storage key layout.
	pub fn storage_keys(mut self, keys: StorageKeys) -> Self {
		self.storage_keys = keys;

		self
	}

	/// Overrides the refresh sharing policy.
	pub fn refresh_mode(mut self, mode: RefreshMode) -> Self {
		self.refresh_mode = mode;

		self
	}

	/// Consumes the builder and validates the resulting config.
	pub fn build(self) -> Result<SessionConfig, SessionConfigError> {
		let refresh = self.refresh_endpoint.ok_or(SessionConfigError::MissingRefreshEndpoint)?;
		let config = SessionConfig {
			endpoints: SessionEndpoints {
				refresh,
				login: self.login_endpoint,
				register: self.register_endpoint,
			},
			storage_keys: self.storage_keys,
			refresh_mode: self.refresh_mode,
		};

		config.validate()?;

		Ok(config)
	}
}

impl TryFrom<UncheckedSessionConfig> for SessionConfig {
	type Error = SessionConfigError;

	fn try_from(raw: UncheckedSessionConfig) -> Result<Self, Self::Error> {
		let config = Self {
			endpoints: raw.endpoints,
			storage_keys: raw.storage_keys,
			refresh_mode: raw.refresh_mode,
		};

		config.validate()?;

		Ok(config)
	}
}
impl SessionConfig {
	fn validate(&self) -> Result<(), SessionConfigError> {
		validate_endpoint("refresh", &self.endpoints.refresh)?;

		if let Some(login) = self.endpoints.login.as_ref() {
			validate_endpoint("login", login)?;
		}
		if let Some(register) = self.endpoints.register.as_ref() {
			validate_endpoint("register", register)?;
		}
		if !self.storage_keys.are_distinct() {
			return Err(SessionConfigError::DuplicateStorageKeys);
		}

		Ok(())
	}
}

/// Wire shape of [`SessionConfig`] before validation.
#[derive(Deserialize)]
struct UncheckedSessionConfig {
	endpoints: SessionEndpoints,
	#[serde(default)]
	storage_keys: StorageKeys,
	#[serde(default)]
	refresh_mode: RefreshMode,
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), SessionConfigError> {
	if !matches!(url.scheme(), "http" | "https") {
		return Err(SessionConfigError::UnsupportedScheme { endpoint: name, url: url.to_string() });
	}
	if !url.username().is_empty() || url.password().is_some() {
		return Err(SessionConfigError::EmbeddedCredentials { endpoint: name });
	}

	Ok(())
}
