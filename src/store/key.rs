//! Validated storage key names and the default key layout.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

const STORAGE_KEY_MAX_LEN: usize = 128;

/// Error returned when a storage key name fails validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum StorageKeyError {
	/// The key was empty.
	#[error("Storage key cannot be empty.")]
	Empty,
	/// The key contains whitespace characters.
	#[error("Storage key `{0}` contains whitespace.")]
	ContainsWhitespace(String),
	/// The key exceeded the allowed length.
	#[error("Storage key exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted byte length.
		max: usize,
	},
}

/// Name of a single entry in a [`SessionStore`](crate::store::SessionStore).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StorageKey(String);
impl StorageKey {
	/// Creates a new key after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, StorageKeyError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}

	// Only for the compile-time defaults below.
	fn from_static(value: &'static str) -> Self {
		Self(value.to_owned())
	}
}
impl Deref for StorageKey {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for StorageKey {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for StorageKey {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl From<StorageKey> for String {
	fn from(value: StorageKey) -> Self {
		value.0
	}
}
impl TryFrom<String> for StorageKey {
	type Error = StorageKeyError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl FromStr for StorageKey {
	type Err = StorageKeyError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}
impl Debug for StorageKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "StorageKey({})", self.0)
	}
}
impl Display for StorageKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// The three keys that make up a persisted session record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageKeys {
	/// Key holding the access token.
	pub access_token: StorageKey,
	/// Key holding the refresh token.
	pub refresh_token: StorageKey,
	/// Key holding the JSON-serialized user record.
	pub user_data: StorageKey,
}
impl StorageKeys {
	/// Returns the keys in a fixed order (access, refresh, user).
	pub fn all(&self) -> [StorageKey; 3] {
		[self.access_token.clone(), self.refresh_token.clone(), self.user_data.clone()]
	}

	/// Returns `true` when every key name is distinct.
	pub fn are_distinct(&self) -> bool {
		self.access_token != self.refresh_token
			&& self.access_token != self.user_data
			&& self.refresh_token != self.user_data
	}
}
impl Default for StorageKeys {
	fn default() -> Self {
		Self {
			access_token: StorageKey::from_static("accessToken"),
			refresh_token: StorageKey::from_static("refreshToken"),
			user_data: StorageKey::from_static("userData"),
		}
	}
}

fn validate_view(view: &str) -> Result<(), StorageKeyError> {
	if view.is_empty() {
		return Err(StorageKeyError::Empty);
	}
	if view.chars().any(char::is_whitespace) {
		return Err(StorageKeyError::ContainsWhitespace(view.to_owned()));
	}
	if view.len() > STORAGE_KEY_MAX_LEN {
		return Err(StorageKeyError::TooLong { max: STORAGE_KEY_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn keys_reject_blank_and_whitespace() {
		assert_eq!(StorageKey::new(""), Err(StorageKeyError::Empty));
		assert!(matches!(
			StorageKey::new("access token"),
			Err(StorageKeyError::ContainsWhitespace(_))
		));
		assert!(StorageKey::new("a".repeat(STORAGE_KEY_MAX_LEN + 1)).is_err());

		let key = StorageKey::new("app.accessToken").expect("Dotted names should be accepted.");

		assert_eq!(key.as_ref(), "app.accessToken");
	}

	#[test]
	fn serde_enforces_validation() {
		let key: StorageKey =
			serde_json::from_str("\"refreshToken\"").expect("Valid key should deserialize.");

		assert_eq!(&*key, "refreshToken");
		assert!(serde_json::from_str::<StorageKey>("\"\"").is_err());
	}

	#[test]
	fn default_layout_matches_persisted_names() {
		let keys = StorageKeys::default();

		assert!(keys.are_distinct());
		assert_eq!(
			keys.all().iter().map(|key| key.as_ref()).collect::<Vec<_>>(),
			["accessToken", "refreshToken", "userData"]
		);
	}
}
