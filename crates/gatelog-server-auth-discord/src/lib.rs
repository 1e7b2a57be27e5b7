// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Discord OAuth 2.0 authentication for gatelog.
//!
//! Implements the authorization code flow against Discord plus the one bot-side
//! call the login pipeline needs (adding the user to a guild).
//!
//! # OAuth Flow
//!
//! 1. **Authorization URL**: the user is sent to Discord with `client_id`,
//!    `redirect_uri`, `response_type=code` and the requested scopes.
//!
//! 2. **Callback**: Discord redirects back to `redirect_uri` with a `code`.
//!
//! 3. **Code Exchange**: the code is exchanged for an access token at
//!    `{api}/oauth2/token`. Codes are single-use, so this call is never retried.
//!
//! 4. **API Access**: the access token fetches `{api}/users/@me`, and together
//!    with the bot token can add the user to a guild.
//!
//! # Example
//!
//! ```rust,no_run
//! use gatelog_server_auth_discord::{DiscordOAuthClient, DiscordOAuthConfig};
//! use std::time::Duration;
//!
//! # async fn example(config: DiscordOAuthConfig) -> Result<(), Box<dyn std::error::Error>> {
//! let client = DiscordOAuthClient::new(config, Duration::from_secs(10))?;
//!
//! let auth_url = client.authorization_url();
//!
//! let token = client.exchange_code("authorization-code-from-callback").await?;
//! if let Some(access_token) = token.access_token {
//! 	let user = client.get_user(access_token.expose()).await?;
//! 	println!("{} logged in", user.display_name());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Security Considerations
//!
//! - The `client_secret`, bot token and access tokens are wrapped in [`SecretString`].
//! - Tracing instrumentation skips codes and tokens.

use gatelog_common_http::{retry, RetryConfig, RetryableError, RETRYABLE_STATUSES};
use gatelog_common_secret::SecretString;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://discord.com/api/v10";
pub const DEFAULT_AUTHORIZE_URL: &str = "https://discord.com/oauth2/authorize";

const CDN_AVATAR_BASE: &str = "https://cdn.discordapp.com/avatars";

/// Shown for users without a custom avatar.
pub const DEFAULT_AVATAR_URL: &str = "https://cdn.discordapp.com/embed/avatars/0.png";

// =============================================================================
// Errors
// =============================================================================

/// Errors that can occur when validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// A configuration value was empty or invalid.
	#[error("invalid configuration: {0}")]
	InvalidConfig(String),
}

/// Errors that can occur during OAuth operations.
#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
	/// The HTTP request to Discord failed (network error, timeout, etc.).
	#[error("HTTP request failed: {0}")]
	HttpRequest(#[from] reqwest::Error),

	/// The response from Discord could not be parsed as expected.
	#[error("failed to parse response: {0}")]
	ParseError(String),

	/// Discord answered with a non-success status.
	#[error("Discord API error ({status}): {message}")]
	DiscordError { status: StatusCode, message: String },

	#[error(transparent)]
	Config(#[from] ConfigError),
}

impl RetryableError for OAuthError {
	fn is_retryable(&self) -> bool {
		match self {
			OAuthError::HttpRequest(e) => e.is_retryable(),
			OAuthError::DiscordError { status, .. } => RETRYABLE_STATUSES.contains(status),
			OAuthError::ParseError(_) | OAuthError::Config(_) => false,
		}
	}
}

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the Discord OAuth client.
#[derive(Debug, Clone)]
pub struct DiscordOAuthConfig {
	/// The OAuth application client ID.
	pub client_id: String,
	/// The OAuth application client secret (wrapped to prevent logging).
	pub client_secret: SecretString,
	/// The callback URL where Discord redirects after authorization.
	pub redirect_uri: String,
	/// OAuth scopes to request (e.g., "identify", "guilds.join").
	pub scopes: Vec<String>,
	/// REST API base, without trailing slash.
	pub api_url: String,
	pub authorize_url: String,
}

impl DiscordOAuthConfig {
	/// Validate that all configuration fields are non-empty.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.client_id.is_empty() {
			return Err(ConfigError::InvalidConfig(
				"client_id cannot be empty".to_string(),
			));
		}
		if self.client_secret.is_blank() {
			return Err(ConfigError::InvalidConfig(
				"client_secret cannot be empty".to_string(),
			));
		}
		if self.redirect_uri.is_empty() {
			return Err(ConfigError::InvalidConfig(
				"redirect_uri cannot be empty".to_string(),
			));
		}
		if self.scopes.is_empty() {
			return Err(ConfigError::InvalidConfig(
				"at least one scope is required".to_string(),
			));
		}
		Ok(())
	}

	/// Join scopes into a space-separated string for the authorization URL.
	pub fn scopes_string(&self) -> String {
		self.scopes.join(" ")
	}
}

// =============================================================================
// Response types
// =============================================================================

/// Response from Discord's token endpoint.
///
/// `access_token` is optional: a 2xx body without one is reported to the caller
/// rather than treated as a parse failure.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordTokenResponse {
	#[serde(default)]
	pub access_token: Option<SecretString>,
	#[serde(default)]
	pub token_type: Option<String>,
	#[serde(default)]
	pub expires_in: Option<u64>,
	#[serde(default)]
	pub refresh_token: Option<SecretString>,
	#[serde(default)]
	pub scope: Option<String>,
}

/// The authenticated user from `/users/@me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscordUser {
	/// Snowflake, stable across username changes.
	pub id: String,
	pub username: String,
	/// `"0"` for accounts migrated to unique usernames.
	#[serde(default)]
	pub discriminator: String,
	#[serde(default)]
	pub global_name: Option<String>,
	/// Present only with the `email` scope.
	#[serde(default)]
	pub email: Option<String>,
	/// Avatar hash, `None` for the default avatar.
	#[serde(default)]
	pub avatar: Option<String>,
}

impl DiscordUser {
	/// CDN URL for the user's avatar, or the default asset when none is set.
	pub fn avatar_url(&self) -> String {
		match self.avatar.as_deref().filter(|h| !h.is_empty()) {
			Some(hash) => format!("{CDN_AVATAR_BASE}/{}/{hash}.png?size=1024", self.id),
			None => DEFAULT_AVATAR_URL.to_string(),
		}
	}

	pub fn display_name(&self) -> String {
		display_name(&self.username, &self.discriminator)
	}
}

/// `username#discriminator`, or just the username for migrated accounts.
pub fn display_name(username: &str, discriminator: &str) -> String {
	match discriminator {
		"" | "0" => username.to_string(),
		disc => format!("{username}#{disc}"),
	}
}

/// Outcome of a guild join request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuildJoin {
	Added,
	AlreadyMember,
}

#[derive(Debug, Deserialize)]
struct DiscordErrorResponse {
	#[serde(default)]
	error: Option<String>,
	#[serde(default)]
	error_description: Option<String>,
	#[serde(default)]
	message: Option<String>,
}

impl DiscordErrorResponse {
	fn into_message(self) -> Option<String> {
		self.error_description.or(self.message).or(self.error)
	}
}

async fn error_from_response(response: reqwest::Response) -> OAuthError {
	let status = response.status();
	let body = response.text().await.unwrap_or_default();
	let message = serde_json::from_str::<DiscordErrorResponse>(&body)
		.ok()
		.and_then(DiscordErrorResponse::into_message)
		.unwrap_or(body);
	OAuthError::DiscordError { status, message }
}

// =============================================================================
// Client
// =============================================================================

/// OAuth client for authenticating users via Discord.
#[derive(Debug, Clone)]
pub struct DiscordOAuthClient {
	config: DiscordOAuthConfig,
	authorize_url: Url,
	http_client: reqwest::Client,
	retry: RetryConfig,
}

impl DiscordOAuthClient {
	/// Create a client whose requests are all bounded by `timeout`.
	#[tracing::instrument(skip_all, name = "DiscordOAuthClient::new")]
	pub fn new(config: DiscordOAuthConfig, timeout: Duration) -> Result<Self, OAuthError> {
		config.validate()?;

		let authorize_url = Url::parse(&config.authorize_url).map_err(|e| {
			ConfigError::InvalidConfig(format!(
				"invalid authorize_url '{}': {e}",
				config.authorize_url
			))
		})?;
		let http_client = gatelog_common_http::client_with_timeout(timeout)?;

		Ok(Self {
			config,
			authorize_url,
			http_client,
			retry: RetryConfig::default(),
		})
	}

	/// Override the retry policy used for idempotent calls.
	pub fn with_retry(mut self, retry: RetryConfig) -> Self {
		self.retry = retry;
		self
	}

	pub fn config(&self) -> &DiscordOAuthConfig {
		&self.config
	}

	fn api(&self, path: &str) -> String {
		format!("{}{path}", self.config.api_url.trim_end_matches('/'))
	}

	/// The Discord authorization URL the login page links to.
	#[tracing::instrument(skip(self), fields(client_id = %self.config.client_id))]
	pub fn authorization_url(&self) -> String {
		let mut url = self.authorize_url.clone();

		url
			.query_pairs_mut()
			.append_pair("client_id", &self.config.client_id)
			.append_pair("redirect_uri", &self.config.redirect_uri)
			.append_pair("response_type", "code")
			.append_pair("scope", &self.config.scopes_string());

		url.to_string()
	}

	/// Exchange an authorization code for an access token.
	///
	/// # Errors
	///
	/// - [`OAuthError::HttpRequest`]: network error or timeout.
	/// - [`OAuthError::DiscordError`]: Discord rejected the code.
	/// - [`OAuthError::ParseError`]: the success body was not JSON.
	#[tracing::instrument(skip(self, code), name = "DiscordOAuthClient::exchange_code")]
	pub async fn exchange_code(&self, code: &str) -> Result<DiscordTokenResponse, OAuthError> {
		tracing::debug!("exchanging authorization code for access token");

		let scope = self.config.scopes_string();
		let response = self
			.http_client
			.post(self.api("/oauth2/token"))
			.header("Accept", "application/json")
			.form(&[
				("client_id", self.config.client_id.as_str()),
				("client_secret", self.config.client_secret.expose().as_str()),
				("grant_type", "authorization_code"),
				("code", code),
				("redirect_uri", self.config.redirect_uri.as_str()),
				("scope", scope.as_str()),
			])
			.send()
			.await?;

		if !response.status().is_success() {
			return Err(error_from_response(response).await);
		}

		let body = response.text().await?;
		serde_json::from_str(&body)
			.map_err(|e| OAuthError::ParseError(format!("failed to parse token response: {e}")))
	}

	/// Fetch the authenticated user's profile. Transient failures are retried.
	#[tracing::instrument(skip(self, access_token), name = "DiscordOAuthClient::get_user")]
	pub async fn get_user(&self, access_token: &str) -> Result<DiscordUser, OAuthError> {
		tracing::debug!("fetching Discord user info");

		retry(&self.retry, move || async move {
			let response = self
				.http_client
				.get(self.api("/users/@me"))
				.header("Accept", "application/json")
				.bearer_auth(access_token)
				.send()
				.await?;

			if !response.status().is_success() {
				return Err(error_from_response(response).await);
			}

			response
				.json::<DiscordUser>()
				.await
				.map_err(|e| OAuthError::ParseError(format!("failed to parse user response: {e}")))
		})
		.await
	}

	/// Add the user to a guild using the bot token and the user's access token.
	///
	/// Requires the `guilds.join` scope on the user's token and the bot being a
	/// member of the guild.
	#[tracing::instrument(
		skip(self, bot_token, access_token),
		fields(guild_id = %guild_id),
		name = "DiscordOAuthClient::add_guild_member"
	)]
	pub async fn add_guild_member(
		&self,
		guild_id: &str,
		bot_token: &SecretString,
		user_id: &str,
		access_token: &str,
	) -> Result<GuildJoin, OAuthError> {
		tracing::debug!("adding user to guild");

		let response = self
			.http_client
			.put(self.api(&format!("/guilds/{guild_id}/members/{user_id}")))
			.header("Authorization", format!("Bot {}", bot_token.expose()))
			.json(&serde_json::json!({ "access_token": access_token }))
			.send()
			.await?;

		match response.status() {
			StatusCode::CREATED | StatusCode::OK => Ok(GuildJoin::Added),
			StatusCode::NO_CONTENT => Ok(GuildJoin::AlreadyMember),
			_ => Err(error_from_response(response).await),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn config() -> DiscordOAuthConfig {
		DiscordOAuthConfig {
			client_id: "1100".to_string(),
			client_secret: SecretString::new("test_secret".to_string()),
			redirect_uri: "https://example.com/callback".to_string(),
			scopes: vec!["identify".to_string(), "guilds.join".to_string()],
			api_url: DEFAULT_API_URL.to_string(),
			authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
		}
	}

	fn user(avatar: Option<&str>, discriminator: &str) -> DiscordUser {
		DiscordUser {
			id: "123".to_string(),
			username: "tester".to_string(),
			discriminator: discriminator.to_string(),
			global_name: None,
			email: None,
			avatar: avatar.map(str::to_string),
		}
	}

	#[test]
	fn authorization_url_contains_required_params() {
		let client = DiscordOAuthClient::new(config(), Duration::from_secs(5)).unwrap();
		let url = client.authorization_url();

		assert!(url.starts_with("https://discord.com/oauth2/authorize?"));
		assert!(url.contains("client_id=1100"));
		assert!(url.contains("redirect_uri=https%3A%2F%2Fexample.com%2Fcallback"));
		assert!(url.contains("response_type=code"));
		assert!(url.contains("scope=identify+guilds.join"));
	}

	#[test]
	fn new_rejects_invalid_config() {
		let mut bad = config();
		bad.client_secret = SecretString::new(String::new());
		assert!(matches!(
			DiscordOAuthClient::new(bad, Duration::from_secs(5)),
			Err(OAuthError::Config(_))
		));

		let mut bad = config();
		bad.authorize_url = "not a url".to_string();
		assert!(matches!(
			DiscordOAuthClient::new(bad, Duration::from_secs(5)),
			Err(OAuthError::Config(_))
		));
	}

	#[test]
	fn avatar_url_embeds_id_and_hash() {
		assert_eq!(
			user(Some("abc"), "0").avatar_url(),
			"https://cdn.discordapp.com/avatars/123/abc.png?size=1024"
		);
	}

	#[test]
	fn missing_avatar_uses_default_asset() {
		assert_eq!(user(None, "0").avatar_url(), DEFAULT_AVATAR_URL);
		assert_eq!(user(Some(""), "0").avatar_url(), DEFAULT_AVATAR_URL);
	}

	#[test]
	fn display_name_handles_migrated_accounts() {
		assert_eq!(user(None, "0").display_name(), "tester");
		assert_eq!(user(None, "").display_name(), "tester");
		assert_eq!(user(None, "4242").display_name(), "tester#4242");
	}

	#[test]
	fn display_name_from_stored_parts() {
		assert_eq!(display_name("nelly", "1337"), "nelly#1337");
		assert_eq!(display_name("nelly", "0"), "nelly");
	}

	#[test]
	fn discord_user_deserializes_with_null_fields() {
		let json = r#"{
            "id": "80351110224678912",
            "username": "nelly",
            "discriminator": "1337",
            "global_name": null,
            "avatar": null
        }"#;

		let user: DiscordUser = serde_json::from_str(json).unwrap();
		assert_eq!(user.id, "80351110224678912");
		assert!(user.email.is_none());
		assert!(user.avatar.is_none());
	}

	#[test]
	fn token_response_without_access_token_parses() {
		let token: DiscordTokenResponse =
			serde_json::from_str(r#"{"token_type": "Bearer"}"#).unwrap();
		assert!(token.access_token.is_none());

		let token: DiscordTokenResponse = serde_json::from_str(
			r#"{"access_token": "tok", "token_type": "Bearer", "expires_in": 604800, "refresh_token": "r", "scope": "identify"}"#,
		)
		.unwrap();
		assert_eq!(token.access_token.unwrap().expose(), "tok");
		assert_eq!(token.expires_in, Some(604800));
	}

	#[test]
	fn token_response_debug_redacts_tokens() {
		let token: DiscordTokenResponse =
			serde_json::from_str(r#"{"access_token": "super-secret-token"}"#).unwrap();
		assert!(!format!("{token:?}").contains("super-secret-token"));
	}

	#[test]
	fn only_transient_statuses_are_retryable() {
		let transient = OAuthError::DiscordError {
			status: StatusCode::SERVICE_UNAVAILABLE,
			message: String::new(),
		};
		let unauthorized = OAuthError::DiscordError {
			status: StatusCode::UNAUTHORIZED,
			message: String::new(),
		};
		assert!(transient.is_retryable());
		assert!(!unauthorized.is_retryable());
		assert!(!OAuthError::ParseError("x".to_string()).is_retryable());
	}
}
