//! Upstream session login client and its orchestration-facing contract.
//!
//! [`LoginClient`] performs exactly one `POST` per call against the configured session
//! endpoint: Basic authorization built from the credential pair, the variant's fixed
//! `Ubi-AppId`, and the constant `{"rememberMe":true}` body. Rejections map onto the
//! [`LoginError`] taxonomy without any internal retry; cadence is owned by the caller
//! because upstream throttles repeated logins aggressively.

// crates.io
use reqwest::{
	StatusCode,
	header::{self, HeaderMap},
};
use time::{OffsetDateTime, format_description::well_known::Rfc2822};
// self
use crate::{
	_prelude::*,
	config::BrokerConfig,
	error::{ConfigError, LoginError},
	session::{AppVariant, SessionToken},
};

/// Future returned by [`SessionLogin`] implementations.
pub type LoginFuture<'a> =
	Pin<Box<dyn Future<Output = Result<SessionToken, LoginError>> + 'a + Send>>;

/// Upstream login contract the orchestrator depends on.
pub trait SessionLogin
where
	Self: Send + Sync,
{
	/// Performs exactly one credential exchange for the variant.
	fn login(&self, variant: AppVariant) -> LoginFuture<'_>;
}

/// Fixed request body sent with every login exchange.
const LOGIN_BODY: &str = "{\"rememberMe\":true}";

/// Reqwest-backed session login client.
#[derive(Clone)]
pub struct LoginClient {
	client: ReqwestClient,
	authorization: String,
	user_agent: String,
	endpoint: Url,
}
impl LoginClient {
	/// Builds a client from broker configuration, provisioning its own transport.
	pub fn new(config: &BrokerConfig) -> Result<Self, ConfigError> {
		Ok(Self::with_client(config.http_client()?, config))
	}

	/// Wraps an existing HTTP client, reusing its connection pool.
	pub fn with_client(client: ReqwestClient, config: &BrokerConfig) -> Self {
		Self {
			client,
			authorization: config.credentials.basic_authorization(),
			user_agent: config.user_agent.clone(),
			endpoint: config.session_endpoint.clone(),
		}
	}

	async fn exchange(&self, variant: AppVariant) -> Result<SessionToken, LoginError> {
		let response = self
			.client
			.post(self.endpoint.clone())
			.header(header::AUTHORIZATION, &self.authorization)
			.header(header::USER_AGENT, &self.user_agent)
			.header(header::CONTENT_TYPE, "application/json")
			.header(header::ACCEPT, "application/json")
			.header(header::CONNECTION, "Keep-Alive")
			.header("Ubi-AppId", variant.app_id())
			.body(LOGIN_BODY)
			.send()
			.await?;
		let status = response.status();

		if !status.is_success() {
			let retry_after = parse_retry_after(response.headers());

			return Err(match status {
				StatusCode::UNAUTHORIZED => LoginError::CredentialsInvalid,
				StatusCode::CONFLICT => LoginError::CaptchaRequired,
				StatusCode::TOO_MANY_REQUESTS => LoginError::RateLimited { retry_after },
				other => LoginError::Upstream { status: other.as_u16() },
			});
		}

		let bytes = response.bytes().await?;
		let mut deserializer = serde_json::Deserializer::from_slice(&bytes);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| LoginError::ResponseParse { source, status: Some(status.as_u16()) })
	}
}
impl Debug for LoginClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LoginClient")
			.field("endpoint", &self.endpoint.as_str())
			.field("user_agent", &self.user_agent)
			.finish()
	}
}
impl SessionLogin for LoginClient {
	fn login(&self, variant: AppVariant) -> LoginFuture<'_> {
		Box::pin(self.exchange(variant))
	}
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(header::RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return Some(Duration::seconds(secs as i64));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}
