// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Discord bot configuration: guild auto-join, login notices and role grants.

use crate::error::ConfigError;
use crate::sections::discord::DEFAULT_DISCORD_API_URL;
use gatelog_common_secret::SecretString;
use serde::Deserialize;

pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BotConfigLayer {
	pub token: Option<SecretString>,
	pub guild_id: Option<String>,
	pub log_channel_id: Option<String>,
	pub role_id: Option<String>,
	pub api_url: Option<String>,
	pub queue_capacity: Option<usize>,
}

impl BotConfigLayer {
	pub fn merge(&mut self, other: BotConfigLayer) {
		if other.token.is_some() {
			self.token = other.token;
		}
		if other.guild_id.is_some() {
			self.guild_id = other.guild_id;
		}
		if other.log_channel_id.is_some() {
			self.log_channel_id = other.log_channel_id;
		}
		if other.role_id.is_some() {
			self.role_id = other.role_id;
		}
		if other.api_url.is_some() {
			self.api_url = other.api_url;
		}
		if other.queue_capacity.is_some() {
			self.queue_capacity = other.queue_capacity;
		}
	}

	/// `Ok(None)` when no bot token is configured.
	pub fn build(self) -> Result<Option<BotConfig>, ConfigError> {
		let Some(token) = self.token.filter(|t| !t.is_blank()) else {
			return Ok(None);
		};

		let queue_capacity = self.queue_capacity.unwrap_or(DEFAULT_QUEUE_CAPACITY);
		if queue_capacity == 0 {
			return Err(ConfigError::Validation(
				"bot queue_capacity must be greater than zero".to_string(),
			));
		}

		let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

		Ok(Some(BotConfig {
			token,
			guild_id: non_empty(self.guild_id),
			log_channel_id: non_empty(self.log_channel_id),
			role_id: non_empty(self.role_id),
			api_url: self
				.api_url
				.unwrap_or_else(|| DEFAULT_DISCORD_API_URL.to_string()),
			queue_capacity,
		}))
	}
}

#[derive(Debug, Clone)]
pub struct BotConfig {
	pub token: SecretString,
	pub guild_id: Option<String>,
	pub log_channel_id: Option<String>,
	pub role_id: Option<String>,
	pub api_url: String,
	pub queue_capacity: usize,
}
