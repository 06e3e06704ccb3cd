//! Opaque user record carried alongside session tokens.

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::_prelude::*;

/// Opaque JSON user record; the session never inspects its fields.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRecord(serde_json::Value);
impl UserRecord {
	/// Wraps an existing JSON value.
	pub fn new(value: serde_json::Value) -> Self {
		Self(value)
	}

	/// Encodes any serializable profile type into a record.
	pub fn encode<T>(profile: &T) -> Result<Self, serde_json::Error>
	where
		T: ?Sized + Serialize,
	{
		serde_json::to_value(profile).map(Self)
	}

	/// Decodes the record into a caller-defined profile type.
	pub fn decode<T>(&self) -> Result<T, serde_json::Error>
	where
		T: DeserializeOwned,
	{
		T::deserialize(&self.0)
	}

	/// Returns `true` when the record carries no data (`null`).
	pub fn is_null(&self) -> bool {
		self.0.is_null()
	}

	/// Borrows the underlying JSON value.
	pub fn as_value(&self) -> &serde_json::Value {
		&self.0
	}

	/// Serializes the record into the string form kept in persistent storage.
	pub fn to_json(&self) -> String {
		self.0.to_string()
	}

	/// Parses a record previously produced by [`UserRecord::to_json`].
	pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(raw).map(Self)
	}
}
impl From<serde_json::Value> for UserRecord {
	fn from(value: serde_json::Value) -> Self {
		Self(value)
	}
}
