//! Broker configuration assembled from the environment and an optional JSON file.
//!
//! Environment variables always win over file values, so credentials can stay out of
//! the deployed bundle. The file shape mirrors the service's `config.json`; keys this
//! crate does not consume are ignored.

// std
use std::{fs, io, path::Path};
// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::redirect;
// self
use crate::{_prelude::*, error::ConfigError};

/// Default upstream session endpoint.
pub const DEFAULT_SESSION_ENDPOINT: &str = "https://public-ubiservices.ubi.com/v3/profiles/sessions";
/// Default `User-Agent` header sent on upstream exchanges.
pub const DEFAULT_USER_AGENT: &str = concat!("ubi-session-broker/", env!("CARGO_PKG_VERSION"));

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::seconds(10);
const ENV_EMAIL: &str = "UBI_EMAIL";
const ENV_PASSWORD: &str = "UBI_PASSWORD";
const ENV_USER_AGENT: &str = "HTTP_USER_AGENT";
const ENV_KV_URL: &str = "KV_REST_API_URL";
const ENV_KV_TOKEN: &str = "KV_REST_API_TOKEN";
const ENV_TRIGGER_SECRET: &str = "CRON_SECRET";

/// Upstream account credentials used for the Basic authorization header.
#[derive(Clone)]
pub struct CredentialPair {
	email: String,
	password: String,
}
impl CredentialPair {
	/// Builds a credential pair from an account email and password.
	pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
		Self { email: email.into(), password: password.into() }
	}

	/// Returns the account email.
	pub fn email(&self) -> &str {
		&self.email
	}

	/// Renders the complete `Authorization` header value for the login exchange.
	pub(crate) fn basic_authorization(&self) -> String {
		let raw = format!("{}:{}", self.email, self.password);

		format!("Basic {}", STANDARD.encode(raw))
	}
}
impl Debug for CredentialPair {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CredentialPair")
			.field("email", &self.email)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Connection settings for the durable REST key-value backend.
#[derive(Clone)]
pub struct KvSettings {
	url: Url,
	token: String,
}
impl KvSettings {
	/// Builds settings from the backend base URL and its bearer token.
	pub fn new(url: Url, token: impl Into<String>) -> Self {
		Self { url, token: token.into() }
	}

	pub(crate) fn url(&self) -> &Url {
		&self.url
	}

	pub(crate) fn bearer_token(&self) -> &str {
		&self.token
	}
}
impl Debug for KvSettings {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("KvSettings")
			.field("url", &self.url.as_str())
			.field("token", &"<redacted>")
			.finish()
	}
}

/// Immutable broker configuration, assembled once at process start.
#[derive(Clone)]
pub struct BrokerConfig {
	/// Upstream account credentials.
	pub credentials: CredentialPair,
	/// `User-Agent` header sent on upstream exchanges.
	pub user_agent: String,
	/// Upstream session endpoint receiving login exchanges.
	pub session_endpoint: Url,
	/// Per-request timeout applied to every outbound exchange.
	pub request_timeout: Duration,
	/// Durable key-value backend settings, when one is configured.
	pub kv: Option<KvSettings>,
	/// Shared secret protecting the scheduled refresh trigger.
	pub trigger_secret: Option<String>,
}
impl BrokerConfig {
	/// Creates a config with defaults for every knob except the credentials.
	pub fn new(credentials: CredentialPair) -> Result<Self, ConfigError> {
		Ok(Self {
			credentials,
			user_agent: DEFAULT_USER_AGENT.into(),
			session_endpoint: default_session_endpoint()?,
			request_timeout: DEFAULT_REQUEST_TIMEOUT,
			kv: None,
			trigger_secret: None,
		})
	}

	/// Assembles configuration from process environment variables alone.
	pub fn from_env() -> Result<Self, ConfigError> {
		let env = std::env::vars().collect();

		Self::resolve(FileConfig::default(), &env)
	}

	/// Reads the JSON config file, then applies environment overrides on top.
	///
	/// A missing file is not an error; env-only deployments are the common case and the
	/// file merely provides local-development defaults.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let file = read_file_config(path.as_ref())?;
		let env = std::env::vars().collect();

		Self::resolve(file, &env)
	}

	/// Overrides the session endpoint used for login exchanges.
	pub fn with_session_endpoint(mut self, endpoint: Url) -> Self {
		self.session_endpoint = endpoint;

		self
	}

	/// Overrides the `User-Agent` header value.
	pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = user_agent.into();

		self
	}

	/// Overrides the per-request timeout (defaults to 10 seconds).
	pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = if timeout.is_negative() { Duration::ZERO } else { timeout };

		self
	}

	/// Attaches durable key-value backend settings.
	pub fn with_kv(mut self, kv: KvSettings) -> Self {
		self.kv = Some(kv);

		self
	}

	/// Sets or replaces the shared secret protecting the scheduled trigger.
	pub fn with_trigger_secret(mut self, secret: impl Into<String>) -> Self {
		self.trigger_secret = Some(secret.into());

		self
	}

	/// Builds the HTTP client shared by the login client and the durable store.
	///
	/// Redirect following stays disabled; the session endpoint answers directly and a
	/// redirected exchange would resend the Basic credentials to an unexpected host.
	pub fn http_client(&self) -> Result<ReqwestClient, ConfigError> {
		ReqwestClient::builder()
			.timeout(self.request_timeout.unsigned_abs())
			.redirect(redirect::Policy::none())
			.build()
			.map_err(ConfigError::from)
	}

	fn resolve(file: FileConfig, env: &HashMap<String, String>) -> Result<Self, ConfigError> {
		let email = env_value(env, ENV_EMAIL)
			.or(file.ubi_credentials.email)
			.ok_or(ConfigError::MissingCredentials)?;
		let password = env_value(env, ENV_PASSWORD)
			.or(file.ubi_credentials.password)
			.ok_or(ConfigError::MissingCredentials)?;
		let user_agent = env_value(env, ENV_USER_AGENT)
			.or(file.http.user_agent)
			.unwrap_or_else(|| DEFAULT_USER_AGENT.into());
		let kv = match (env_value(env, ENV_KV_URL), env_value(env, ENV_KV_TOKEN)) {
			(Some(url), Some(token)) => {
				let url =
					Url::parse(&url).map_err(|source| ConfigError::InvalidKvUrl { source })?;

				Some(KvSettings::new(url, token))
			},
			_ => None,
		};

		Ok(Self {
			credentials: CredentialPair::new(email, password),
			user_agent,
			session_endpoint: default_session_endpoint()?,
			request_timeout: DEFAULT_REQUEST_TIMEOUT,
			kv,
			trigger_secret: env_value(env, ENV_TRIGGER_SECRET),
		})
	}
}
impl Debug for BrokerConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BrokerConfig")
			.field("credentials", &self.credentials)
			.field("user_agent", &self.user_agent)
			.field("session_endpoint", &self.session_endpoint.as_str())
			.field("request_timeout", &self.request_timeout)
			.field("kv", &self.kv)
			.field("trigger_secret_set", &self.trigger_secret.is_some())
			.finish()
	}
}

/// On-disk config file shape; keys this crate does not consume are ignored.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
	#[serde(default)]
	http: FileHttp,
	#[serde(default)]
	ubi_credentials: FileCredentials,
}

#[derive(Debug, Default, Deserialize)]
struct FileHttp {
	user_agent: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FileCredentials {
	email: Option<String>,
	password: Option<String>,
}

fn default_session_endpoint() -> Result<Url, ConfigError> {
	Url::parse(DEFAULT_SESSION_ENDPOINT).map_err(|source| ConfigError::InvalidEndpoint { source })
}

/// Returns the env value, treating empty strings as absent.
fn env_value(env: &HashMap<String, String>, key: &str) -> Option<String> {
	env.get(key).filter(|value| !value.is_empty()).cloned()
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
	let bytes = match fs::read(path) {
		Ok(bytes) => bytes,
		Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(FileConfig::default()),
		Err(source) =>
			return Err(ConfigError::FileRead { path: path.display().to_string(), source }),
	};
	let mut deserializer = serde_json::Deserializer::from_slice(&bytes);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| ConfigError::FileParse { path: path.display().to_string(), source })
}
