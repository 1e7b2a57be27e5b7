// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Discord OAuth application configuration.

use crate::error::ConfigError;
use gatelog_common_secret::SecretString;
use serde::Deserialize;

pub const DEFAULT_DISCORD_API_URL: &str = "https://discord.com/api/v10";
pub const DEFAULT_DISCORD_AUTHORIZE_URL: &str = "https://discord.com/oauth2/authorize";

/// Scopes requested on the authorization URL.
pub const DEFAULT_DISCORD_SCOPES: [&str; 6] = [
	"identify",
	"email",
	"guilds",
	"connections",
	"guilds.join",
	"applications.commands",
];

/// Configuration layer for Discord OAuth (all fields optional for layering).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscordConfigLayer {
	pub client_id: Option<String>,
	pub client_secret: Option<SecretString>,
	pub redirect_uri: Option<String>,
	pub scopes: Option<Vec<String>>,
	pub api_url: Option<String>,
	pub authorize_url: Option<String>,
}

impl DiscordConfigLayer {
	pub fn merge(&mut self, other: DiscordConfigLayer) {
		if other.client_id.is_some() {
			self.client_id = other.client_id;
		}
		if other.client_secret.is_some() {
			self.client_secret = other.client_secret;
		}
		if other.redirect_uri.is_some() {
			self.redirect_uri = other.redirect_uri;
		}
		if other.scopes.is_some() {
			self.scopes = other.scopes;
		}
		if other.api_url.is_some() {
			self.api_url = other.api_url;
		}
		if other.authorize_url.is_some() {
			self.authorize_url = other.authorize_url;
		}
	}

	/// Build the final config. `Ok(None)` when no client id is set.
	pub fn build(self) -> Result<Option<DiscordConfig>, ConfigError> {
		let Some(client_id) = self.client_id.filter(|s| !s.is_empty()) else {
			return Ok(None);
		};

		let client_secret = self.client_secret.ok_or_else(|| {
			ConfigError::Validation(
				"Discord client_secret is required when client_id is set".to_string(),
			)
		})?;
		if client_secret.is_blank() {
			return Err(ConfigError::Validation(
				"Discord client_secret cannot be empty".to_string(),
			));
		}

		let redirect_uri = self
			.redirect_uri
			.filter(|s| !s.is_empty())
			.ok_or_else(|| {
				ConfigError::Validation(
					"Discord redirect_uri is required when client_id is set".to_string(),
				)
			})?;

		let scopes = self
			.scopes
			.filter(|s| !s.is_empty())
			.unwrap_or_else(|| DEFAULT_DISCORD_SCOPES.iter().map(|s| s.to_string()).collect());

		Ok(Some(DiscordConfig {
			client_id,
			client_secret,
			redirect_uri,
			scopes,
			api_url: self
				.api_url
				.unwrap_or_else(|| DEFAULT_DISCORD_API_URL.to_string()),
			authorize_url: self
				.authorize_url
				.unwrap_or_else(|| DEFAULT_DISCORD_AUTHORIZE_URL.to_string()),
		}))
	}
}

/// Validated Discord OAuth configuration.
#[derive(Debug, Clone)]
pub struct DiscordConfig {
	pub client_id: String,
	pub client_secret: SecretString,
	pub redirect_uri: String,
	pub scopes: Vec<String>,
	pub api_url: String,
	pub authorize_url: String,
}

/// Split a scope list on spaces or commas.
pub fn parse_scopes(scope_str: &str) -> Vec<String> {
	scope_str
		.split([' ', ','])
		.map(|s| s.trim().to_string())
		.filter(|s| !s.is_empty())
		.collect()
}
