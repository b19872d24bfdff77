//! Broker-level error types shared across flows, stores, and the login client.

// self
use crate::_prelude::*;

/// Broker-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical broker error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Upstream login exchange failure.
	#[error(transparent)]
	Login(#[from] LoginError),

	/// No token is cached for the variant and the process-lifetime auto-login is spent.
	#[error("No session token is available for the `{variant}` variant.")]
	NotAvailable {
		/// App identity variant the read targeted.
		variant: crate::session::AppVariant,
		/// Failure that exhausted the auto-login, when this call was the one to spend it.
		#[source]
		source: Option<Box<Error>>,
	},
}

/// Configuration and validation failures raised by the broker.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Config file could not be read.
	#[error("Config file `{path}` could not be read.")]
	FileRead {
		/// Path the loader attempted to read.
		path: String,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// Config file contents could not be parsed.
	#[error("Config file `{path}` contains malformed JSON.")]
	FileParse {
		/// Path the loader attempted to parse.
		path: String,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Session endpoint URL cannot be parsed.
	#[error("Session endpoint URL is invalid.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Key-value backend URL cannot be parsed.
	#[error("Key-value backend URL is invalid.")]
	InvalidKvUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},

	/// Neither the environment nor the config file supplied upstream credentials.
	#[error("Upstream credentials are missing; set UBI_EMAIL and UBI_PASSWORD.")]
	MissingCredentials,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<reqwest::Error> for ConfigError {
	fn from(e: reqwest::Error) -> Self {
		Self::http_client_build(e)
	}
}

/// Failures raised by the upstream session login exchange.
///
/// Exactly one variant maps to each upstream rejection the service is known to emit,
/// so orchestration code can react per class instead of re-parsing status codes.
#[derive(Debug, ThisError)]
pub enum LoginError {
	/// Upstream rejected the configured credentials (HTTP 401).
	#[error("Upstream rejected the configured credentials.")]
	CredentialsInvalid,
	/// Upstream demands a captcha before issuing sessions (HTTP 409).
	#[error("Upstream requires a captcha challenge before issuing sessions.")]
	CaptchaRequired,
	/// Upstream throttled the login attempt (HTTP 429).
	#[error("Upstream rate limited the login attempt.")]
	RateLimited {
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Upstream returned an unexpected status code.
	#[error("Upstream returned an unexpected status: {status}.")]
	Upstream {
		/// HTTP status code of the response.
		status: u16,
	},
	/// Session endpoint responded with a body that could not be parsed.
	#[error("Session endpoint returned a malformed response body.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Transport failure (DNS, TCP, TLS) surfaced unmodified.
	#[error("Network error occurred while calling the session endpoint.")]
	Transport {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl LoginError {
	/// Wraps a transport-specific network error.
	pub fn transport(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Transport { source: Box::new(src) }
	}
}
impl From<reqwest::Error> for LoginError {
	fn from(e: reqwest::Error) -> Self {
		Self::transport(e)
	}
}
