// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP contract tests for the Discord OAuth client against a mock API.

use gatelog_common_http::RetryConfig;
use gatelog_common_secret::SecretString;
use gatelog_server_auth_discord::{
	DiscordOAuthClient, DiscordOAuthConfig, GuildJoin, OAuthError, DEFAULT_AUTHORIZE_URL,
};
use std::time::Duration;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> DiscordOAuthClient {
	let config = DiscordOAuthConfig {
		client_id: "1100".to_string(),
		client_secret: SecretString::new("shh".to_string()),
		redirect_uri: "http://localhost:10000/callback".to_string(),
		scopes: vec!["identify".to_string(), "email".to_string()],
		api_url: server.uri(),
		authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
	};
	DiscordOAuthClient::new(config, Duration::from_secs(2))
		.unwrap()
		.with_retry(RetryConfig {
			base_delay: Duration::from_millis(1),
			max_delay: Duration::from_millis(5),
			..RetryConfig::with_max_attempts(3)
		})
}

#[tokio::test]
async fn exchange_code_posts_form_and_parses_token() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/oauth2/token"))
		.and(body_string_contains("grant_type=authorization_code"))
		.and(body_string_contains("code=abc123"))
		.and(body_string_contains("client_secret=shh"))
		.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
			"access_token": "user-token",
			"token_type": "Bearer",
			"expires_in": 604800,
			"scope": "identify email"
		})))
		.expect(1)
		.mount(&server)
		.await;

	let token = client_for(&server).exchange_code("abc123").await.unwrap();
	assert_eq!(token.access_token.unwrap().expose(), "user-token");
}

#[tokio::test]
async fn exchange_code_reports_missing_access_token_as_none() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/oauth2/token"))
		.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
			"token_type": "Bearer"
		})))
		.mount(&server)
		.await;

	let token = client_for(&server).exchange_code("abc").await.unwrap();
	assert!(token.access_token.is_none());
}

#[tokio::test]
async fn exchange_code_is_not_retried_on_server_error() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/oauth2/token"))
		.respond_with(ResponseTemplate::new(503))
		.expect(1)
		.mount(&server)
		.await;

	let err = client_for(&server).exchange_code("abc").await.unwrap_err();
	assert!(matches!(err, OAuthError::DiscordError { status, .. } if status.as_u16() == 503));
}

#[tokio::test]
async fn exchange_code_surfaces_discord_error_description() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/oauth2/token"))
		.respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
			"error": "invalid_grant",
			"error_description": "Invalid \"code\" in request."
		})))
		.mount(&server)
		.await;

	match client_for(&server).exchange_code("stale").await {
		Err(OAuthError::DiscordError { status, message }) => {
			assert_eq!(status.as_u16(), 400);
			assert!(message.contains("Invalid"));
		}
		other => panic!("expected DiscordError, got {other:?}"),
	}
}

#[tokio::test]
async fn get_user_sends_bearer_token() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/users/@me"))
		.and(header("authorization", "Bearer user-token"))
		.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
			"id": "123",
			"username": "tester",
			"discriminator": "0",
			"email": "tester@example.com",
			"avatar": "abc"
		})))
		.mount(&server)
		.await;

	let user = client_for(&server).get_user("user-token").await.unwrap();
	assert_eq!(user.id, "123");
	assert_eq!(user.email.as_deref(), Some("tester@example.com"));
	assert_eq!(
		user.avatar_url(),
		"https://cdn.discordapp.com/avatars/123/abc.png?size=1024"
	);
}

#[tokio::test]
async fn get_user_retries_transient_failures() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/users/@me"))
		.respond_with(ResponseTemplate::new(502))
		.up_to_n_times(1)
		.mount(&server)
		.await;
	Mock::given(method("GET"))
		.and(path("/users/@me"))
		.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
			"id": "9",
			"username": "late"
		})))
		.mount(&server)
		.await;

	let user = client_for(&server).get_user("t").await.unwrap();
	assert_eq!(user.username, "late");
	assert_eq!(user.discriminator, "");
}

#[tokio::test]
async fn get_user_does_not_retry_unauthorized() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/users/@me"))
		.respond_with(
			ResponseTemplate::new(401)
				.set_body_json(serde_json::json!({"message": "401: Unauthorized", "code": 0})),
		)
		.expect(1)
		.mount(&server)
		.await;

	let err = client_for(&server).get_user("bad").await.unwrap_err();
	assert!(err.to_string().contains("401: Unauthorized"));
}

#[tokio::test]
async fn add_guild_member_uses_bot_auth_and_user_token() {
	let server = MockServer::start().await;
	Mock::given(method("PUT"))
		.and(path("/guilds/42/members/123"))
		.and(header("authorization", "Bot bot-token"))
		.and(body_json(serde_json::json!({"access_token": "user-token"})))
		.respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({})))
		.mount(&server)
		.await;

	let joined = client_for(&server)
		.add_guild_member(
			"42",
			&SecretString::new("bot-token".to_string()),
			"123",
			"user-token",
		)
		.await
		.unwrap();
	assert_eq!(joined, GuildJoin::Added);
}

#[tokio::test]
async fn add_guild_member_reports_existing_membership() {
	let server = MockServer::start().await;
	Mock::given(method("PUT"))
		.and(path("/guilds/42/members/123"))
		.respond_with(ResponseTemplate::new(204))
		.mount(&server)
		.await;

	let joined = client_for(&server)
		.add_guild_member("42", &SecretString::new("b".to_string()), "123", "u")
		.await
		.unwrap();
	assert_eq!(joined, GuildJoin::AlreadyMember);
}

#[tokio::test]
async fn add_guild_member_forbidden_is_error() {
	let server = MockServer::start().await;
	Mock::given(method("PUT"))
		.and(path("/guilds/42/members/123"))
		.respond_with(
			ResponseTemplate::new(403)
				.set_body_json(serde_json::json!({"message": "Missing Permissions", "code": 50013})),
		)
		.mount(&server)
		.await;

	let err = client_for(&server)
		.add_guild_member("42", &SecretString::new("b".to_string()), "123", "u")
		.await
		.unwrap_err();
	assert!(matches!(err, OAuthError::DiscordError { ref message, .. } if message == "Missing Permissions"));
}
