//! Session-level error types shared across the store, transport, and request layers.

// self
use crate::_prelude::*;

/// Session-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration or request construction problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS) while sending a request.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Upstream answered with a body the session could not interpret.
	#[error(transparent)]
	Response(#[from] ResponseError),

	/// An authenticated call was attempted while logged out.
	#[error("No access token is available; log in first.")]
	NoAccessToken,
	/// The credential endpoint refused to issue tokens.
	#[error("Credential endpoint rejected the request with status {status}: {reason}.")]
	Rejected {
		/// HTTP status code returned by the endpoint.
		status: u16,
		/// Server-supplied (or synthesized) reason string.
		reason: String,
	},
}

/// Configuration and request-construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] ::http::Error),
	/// A bearer token cannot be encoded as a header value.
	#[error("Access token cannot be used as an Authorization header value.")]
	InvalidBearer {
		/// Underlying header validation failure.
		#[source]
		source: ::http::header::InvalidHeaderValue,
	},
	/// A JSON body could not be serialized.
	#[error("Request body could not be serialized as JSON.")]
	BodySerialize(#[from] serde_json::Error),
	/// An operation needs an endpoint that was not configured.
	#[error("The {endpoint} endpoint is not configured.")]
	MissingEndpoint {
		/// Endpoint label.
		endpoint: &'static str,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failures interpreting an upstream response body.
#[derive(Debug, ThisError)]
pub enum ResponseError {
	/// Endpoint responded with JSON that does not match the expected shape.
	#[error("Endpoint returned malformed JSON.")]
	Parse {
		/// Structured parsing failure, including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while sending the request.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while sending the request.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn transport_error_keeps_source() {
		let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "peer reset");
		let err: Error = TransportError::network(io).into();

		assert!(matches!(err, Error::Transport(TransportError::Network { .. })));

		let source = StdError::source(&err)
			.expect("Network error should expose the transport failure as its source.");

		assert_eq!(source.to_string(), "peer reset");
	}

	#[test]
	fn rejected_message_includes_status_and_reason() {
		let err = Error::Rejected { status: 401, reason: "Invalid email or password".into() };

		assert_eq!(
			err.to_string(),
			"Credential endpoint rejected the request with status 401: Invalid email or password."
		);
	}
}
