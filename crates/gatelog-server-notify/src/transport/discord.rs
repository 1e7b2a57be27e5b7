// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Discord REST transport authenticated with the bot token.

use std::time::Duration;

use async_trait::async_trait;
use gatelog_common_secret::SecretString;
use gatelog_server_config::BotConfig;
use serde::Serialize;
use tracing::debug;

use super::NotificationTransport;
use crate::error::{NotifyError, Result};
use crate::event::{LoginNotice, Notification};

#[derive(Serialize)]
struct CreateMessage<'a> {
	embeds: [Embed<'a>; 1],
}

#[derive(Serialize)]
struct Embed<'a> {
	title: &'a str,
	description: &'a str,
	thumbnail: Thumbnail<'a>,
}

#[derive(Serialize)]
struct Thumbnail<'a> {
	url: &'a str,
}

impl<'a> From<&'a LoginNotice> for CreateMessage<'a> {
	fn from(notice: &'a LoginNotice) -> Self {
		Self {
			embeds: [Embed {
				title: &notice.title,
				description: &notice.description,
				thumbnail: Thumbnail {
					url: &notice.thumbnail_url,
				},
			}],
		}
	}
}

pub struct DiscordBotTransport {
	client: reqwest::Client,
	api_url: String,
	token: SecretString,
	guild_id: Option<String>,
	log_channel_id: Option<String>,
	role_id: Option<String>,
}

impl DiscordBotTransport {
	pub fn new(config: &BotConfig, timeout: Duration) -> Result<Self> {
		Ok(Self {
			client: gatelog_common_http::client_with_timeout(timeout)?,
			api_url: config.api_url.trim_end_matches('/').to_string(),
			token: config.token.clone(),
			guild_id: config.guild_id.clone(),
			log_channel_id: config.log_channel_id.clone(),
			role_id: config.role_id.clone(),
		})
	}

	fn authorization(&self) -> String {
		format!("Bot {}", self.token.expose())
	}

	async fn check(response: reqwest::Response) -> Result<()> {
		let status = response.status();
		if status.is_success() {
			return Ok(());
		}
		let body = response.text().await.unwrap_or_default();
		Err(NotifyError::Api { status, body })
	}

	async fn post_notice(&self, notice: &LoginNotice) -> Result<()> {
		let Some(channel_id) = &self.log_channel_id else {
			debug!("no log channel configured, skipping login notice");
			return Ok(());
		};

		let response = self
			.client
			.post(format!("{}/channels/{channel_id}/messages", self.api_url))
			.header("Authorization", self.authorization())
			.json(&CreateMessage::from(notice))
			.send()
			.await?;
		Self::check(response).await
	}

	async fn assign_role(&self, user_id: &str) -> Result<()> {
		let (Some(guild_id), Some(role_id)) = (&self.guild_id, &self.role_id) else {
			debug!("guild or role not configured, skipping role assignment");
			return Ok(());
		};

		let response = self
			.client
			.put(format!(
				"{}/guilds/{guild_id}/members/{user_id}/roles/{role_id}",
				self.api_url
			))
			.header("Authorization", self.authorization())
			.header("Content-Length", "0")
			.send()
			.await?;
		Self::check(response).await
	}
}

#[async_trait]
impl NotificationTransport for DiscordBotTransport {
	fn name(&self) -> &str {
		"discord-bot"
	}

	async fn deliver(&self, event: &Notification) -> Result<()> {
		match event {
			Notification::LoginRecorded(notice) => self.post_notice(notice).await,
			Notification::AssignRole { user_id } => self.assign_role(user_id).await,
		}
	}
}
