// crates.io
use httpmock::prelude::*;
use time::Duration;
use url::Url;
// self
use ubi_session_broker::{
	config::{BrokerConfig, CredentialPair},
	error::LoginError,
	login::{LoginClient, SessionLogin},
	session::AppVariant,
};

const EMAIL: &str = "user@example.com";
const PASSWORD: &str = "hunter2";
const BASIC_FIXTURE: &str = "Basic dXNlckBleGFtcGxlLmNvbTpodW50ZXIy";
const USER_AGENT: &str = "broker-tests/1.0";
const LOGIN_PATH: &str = "/v3/profiles/sessions";
const SESSION_BODY: &str = "{\"platformType\":\"uplay\",\"ticket\":\"ep1-ticket\",\"profileId\":\"prof-1\",\"sessionId\":\"sid-1\",\"expiration\":\"2026-08-25T12:00:00.0000000Z\"}";

fn login_client(server: &MockServer) -> LoginClient {
	let config = BrokerConfig::new(CredentialPair::new(EMAIL, PASSWORD))
		.expect("Test config should build.")
		.with_session_endpoint(
			Url::parse(&server.url(LOGIN_PATH))
				.expect("Mock session endpoint should parse successfully."),
		)
		.with_user_agent(USER_AGENT);

	LoginClient::new(&config).expect("Login client should build successfully.")
}

#[tokio::test]
async fn login_sends_the_documented_headers_and_body() {
	let server = MockServer::start_async().await;
	let client = login_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(LOGIN_PATH)
				.header("authorization", BASIC_FIXTURE)
				.header("ubi-appid", AppVariant::V2.app_id())
				.header("user-agent", USER_AGENT)
				.header("content-type", "application/json")
				.header("accept", "application/json")
				.header("connection", "Keep-Alive")
				.body("{\"rememberMe\":true}");
			then.status(200).header("content-type", "application/json").body(SESSION_BODY);
		})
		.await;
	let token = client
		.login(AppVariant::V2)
		.await
		.expect("A well-formed session reply should produce a token.");

	mock.assert_async().await;

	assert_eq!(token.ticket.expose(), "ep1-ticket");
	assert_eq!(
		token.details.get("sessionId").and_then(|value| value.as_str()),
		Some("sid-1"),
		"Extra upstream fields must be preserved on the token."
	);
}

#[tokio::test]
async fn each_variant_sends_its_own_app_id() {
	let server = MockServer::start_async().await;
	let client = login_client(&server);
	let v2_mock = server
		.mock_async(|when, then| {
			when.method(POST).path(LOGIN_PATH).header("ubi-appid", AppVariant::V2.app_id());
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"ticket\":\"v2-ticket\"}");
		})
		.await;
	let v3_mock = server
		.mock_async(|when, then| {
			when.method(POST).path(LOGIN_PATH).header("ubi-appid", AppVariant::V3.app_id());
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"ticket\":\"v3-ticket\"}");
		})
		.await;
	let v2 = client.login(AppVariant::V2).await.expect("The v2 login should succeed.");
	let v3 = client.login(AppVariant::V3).await.expect("The v3 login should succeed.");

	v2_mock.assert_async().await;
	v3_mock.assert_async().await;

	assert_eq!(v2.ticket.expose(), "v2-ticket");
	assert_eq!(v3.ticket.expose(), "v3-ticket");
}

#[tokio::test]
async fn invalid_credentials_surface_as_credentials_invalid() {
	let server = MockServer::start_async().await;
	let client = login_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(LOGIN_PATH);
			then.status(401)
				.header("content-type", "application/json")
				.body("{\"message\":\"Invalid credentials\"}");
		})
		.await;
	let err = client
		.login(AppVariant::V2)
		.await
		.expect_err("An HTTP 401 must be classified, not parsed as a token.");

	mock.assert_async().await;

	assert!(matches!(err, LoginError::CredentialsInvalid));
}

#[tokio::test]
async fn captcha_challenges_surface_as_captcha_required() {
	let server = MockServer::start_async().await;
	let client = login_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(LOGIN_PATH);
			then.status(409)
				.header("content-type", "application/json")
				.body("{\"message\":\"Captcha needed\"}");
		})
		.await;
	let err = client
		.login(AppVariant::V3)
		.await
		.expect_err("An HTTP 409 must be classified as a captcha challenge.");

	mock.assert_async().await;

	assert!(matches!(err, LoginError::CaptchaRequired));
}

#[tokio::test]
async fn rate_limits_carry_the_retry_after_hint() {
	let server = MockServer::start_async().await;
	let client = login_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(LOGIN_PATH);
			then.status(429).header("retry-after", "120").body("");
		})
		.await;
	let err = client
		.login(AppVariant::V2)
		.await
		.expect_err("An HTTP 429 must be classified as rate limiting.");

	mock.assert_async().await;

	assert!(matches!(
		err,
		LoginError::RateLimited { retry_after: Some(hint) } if hint == Duration::seconds(120)
	));
}

#[tokio::test]
async fn unexpected_statuses_surface_with_their_code() {
	let server = MockServer::start_async().await;
	let client = login_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(LOGIN_PATH);
			then.status(503).body("upstream maintenance");
		})
		.await;
	let err = client
		.login(AppVariant::V2)
		.await
		.expect_err("An unexpected status must not be treated as success.");

	mock.assert_async().await;

	assert!(matches!(err, LoginError::Upstream { status: 503 }));
}

#[tokio::test]
async fn malformed_success_bodies_surface_as_response_parse() {
	let server = MockServer::start_async().await;
	let client = login_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(LOGIN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"profileId\":\"prof-1\"}");
		})
		.await;
	let err = client
		.login(AppVariant::V2)
		.await
		.expect_err("A success body without a ticket must fail parsing.");

	mock.assert_async().await;

	assert!(matches!(err, LoginError::ResponseParse { status: Some(200), .. }));
}
