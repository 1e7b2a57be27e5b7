// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Application state and router.

use std::sync::Arc;

use axum::{routing::get, Router};
use gatelog_common_http::RetryConfig;
use gatelog_server_access_log::AccessLogStore;
use gatelog_server_auth_discord::{DiscordOAuthClient, DiscordOAuthConfig};
use gatelog_server_config::ServerConfig;
use gatelog_server_geoip::GeoIpService;
use gatelog_server_notify::NotificationSink;

use crate::{
	error::ServerError,
	login::{GuildJoinTarget, LoginPipeline},
	routes,
};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
	pub login: Arc<LoginPipeline>,
	pub access_log: Arc<AccessLogStore>,
	pub admin_ip: String,
	pub bot_configured: bool,
}

/// Build the shared state from configuration.
///
/// `notifier` receives login notices and role grants; pass a
/// [`gatelog_server_notify::NoopNotifier`] when no bot is configured.
pub fn create_app_state(
	config: &ServerConfig,
	notifier: Arc<dyn NotificationSink>,
) -> Result<AppState, ServerError> {
	let timeout = config.enrichment.timeout;
	let retry = RetryConfig::with_max_attempts(config.enrichment.retry_attempts);

	let oauth = match &config.discord {
		Some(discord) => {
			let client = DiscordOAuthClient::new(
				DiscordOAuthConfig {
					client_id: discord.client_id.clone(),
					client_secret: discord.client_secret.clone(),
					redirect_uri: discord.redirect_uri.clone(),
					scopes: discord.scopes.clone(),
					api_url: discord.api_url.clone(),
					authorize_url: discord.authorize_url.clone(),
				},
				timeout,
			)?
			.with_retry(retry.clone());
			Some(Arc::new(client))
		}
		None => {
			tracing::warn!("Discord OAuth not configured, login routes will answer 501");
			None
		}
	};

	let guild = config.bot.as_ref().and_then(|bot| {
		bot.guild_id.as_ref().map(|guild_id| GuildJoinTarget {
			guild_id: guild_id.clone(),
			bot_token: bot.token.clone(),
		})
	});

	let geoip = GeoIpService::new(
		&config.enrichment.geo_api_url,
		&config.enrichment.public_ip_url,
		timeout,
	)?
	.with_retry(retry);

	let access_log = Arc::new(AccessLogStore::new(config.access_log.path.clone()));

	let login = LoginPipeline::new(
		oauth,
		guild,
		Arc::new(geoip),
		Arc::clone(&access_log),
		notifier,
	);

	Ok(AppState {
		login: Arc::new(login),
		access_log,
		admin_ip: config.admin.ip.clone(),
		bot_configured: config.bot.is_some(),
	})
}

pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/", get(routes::home::index))
		.route("/callback", get(routes::callback::callback))
		.route("/logs", get(routes::logs::view_logs))
		.route("/health", get(routes::health::health_check))
		.with_state(state)
}
