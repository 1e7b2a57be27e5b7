// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! The login pipeline behind `/callback`.
//!
//! Steps run strictly in order: code exchange, identity fetch, guild join,
//! client IP resolution, geo and user agent enrichment, log append, and
//! notification. Only the code exchange, identity fetch and log append can fail
//! the request. Everything after the append is best-effort, and nothing already
//! done is rolled back.

use std::sync::Arc;

use gatelog_common_secret::SecretString;
use gatelog_server_access_log::{AccessLogError, AccessLogStore, LogEntry, LoggedIdentity, LoginRecord};
use gatelog_server_auth_discord::{DiscordOAuthClient, DiscordUser, GuildJoin, OAuthError};
use gatelog_server_geoip::{GeoIpService, GeoRecord, UNKNOWN};
use gatelog_server_notify::{LoginNotice, Notification, NotificationSink};
use gatelog_server_useragent::classify_header;
use tracing::{debug, info, instrument, warn};

use crate::client_info::{is_private_ip, ClientAddr};

pub const LOGIN_NOTICE_TITLE: &str = "✅ New login recorded";

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
	#[error("missing authorization code")]
	MissingCode,

	#[error("Discord OAuth is not configured")]
	NotConfigured,

	#[error("token exchange failed: {0}")]
	TokenExchange(#[source] OAuthError),

	#[error("token response did not include an access token")]
	MissingAccessToken,

	#[error("failed to fetch Discord identity: {0}")]
	IdentityFetch(#[source] OAuthError),

	#[error("failed to record login: {0}")]
	Persist(#[from] AccessLogError),
}

/// Bot credentials for adding users to a guild on login.
#[derive(Debug, Clone)]
pub struct GuildJoinTarget {
	pub guild_id: String,
	pub bot_token: SecretString,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
	pub user: DiscordUser,
	pub entry: LogEntry,
}

pub struct LoginPipeline {
	oauth: Option<Arc<DiscordOAuthClient>>,
	guild: Option<GuildJoinTarget>,
	geoip: Arc<GeoIpService>,
	store: Arc<AccessLogStore>,
	notifier: Arc<dyn NotificationSink>,
}

impl LoginPipeline {
	pub fn new(
		oauth: Option<Arc<DiscordOAuthClient>>,
		guild: Option<GuildJoinTarget>,
		geoip: Arc<GeoIpService>,
		store: Arc<AccessLogStore>,
		notifier: Arc<dyn NotificationSink>,
	) -> Self {
		Self {
			oauth,
			guild,
			geoip,
			store,
			notifier,
		}
	}

	pub fn oauth(&self) -> Option<&DiscordOAuthClient> {
		self.oauth.as_deref()
	}

	pub fn guild_join_enabled(&self) -> bool {
		self.guild.is_some()
	}

	#[instrument(skip_all)]
	pub async fn run(
		&self,
		code: Option<&str>,
		client: &ClientAddr,
		user_agent: Option<&str>,
	) -> Result<LoginOutcome, LoginError> {
		let code = code
			.map(str::trim)
			.filter(|c| !c.is_empty())
			.ok_or(LoginError::MissingCode)?;
		let oauth = self.oauth.as_deref().ok_or(LoginError::NotConfigured)?;

		let token = oauth
			.exchange_code(code)
			.await
			.map_err(LoginError::TokenExchange)?;
		let access_token = token
			.access_token
			.filter(|t| !t.is_blank())
			.ok_or(LoginError::MissingAccessToken)?;

		let user = oauth
			.get_user(access_token.expose())
			.await
			.map_err(LoginError::IdentityFetch)?;

		self.join_guild(oauth, &user, &access_token).await;

		let geo = match self.resolve_client_ip(client).await {
			Some(ip) => self.geoip.lookup(&ip).await,
			None => {
				debug!("no client address available, skipping geo lookup");
				GeoRecord::unknown(UNKNOWN)
			}
		};

		let record = LoginRecord {
			identity: LoggedIdentity {
				username: user.username.clone(),
				discriminator: user.discriminator.clone(),
				id: user.id.clone(),
				email: user.email.clone(),
				avatar_url: user.avatar_url(),
			},
			geo,
			user_agent: classify_header(user_agent),
		};
		let entry = self.store.append(&user.id, record).await?;

		info!(
			user_id = %user.id,
			ip = %entry.geo.masked_ip,
			device = %entry.user_agent.device_class,
			"login recorded"
		);

		self.notify(&user, &entry);

		Ok(LoginOutcome { user, entry })
	}

	async fn join_guild(&self, oauth: &DiscordOAuthClient, user: &DiscordUser, access_token: &SecretString) {
		let Some(target) = &self.guild else {
			debug!("guild join not configured");
			return;
		};

		match oauth
			.add_guild_member(&target.guild_id, &target.bot_token, &user.id, access_token.expose())
			.await
		{
			Ok(GuildJoin::Added) => info!(user_id = %user.id, "user added to guild"),
			Ok(GuildJoin::AlreadyMember) => debug!(user_id = %user.id, "user already in guild"),
			Err(e) => warn!(user_id = %user.id, error = %e, "guild join failed"),
		}
	}

	/// Client address to geolocate. Private and loopback addresses are
	/// replaced by this host's public address when it can be determined.
	async fn resolve_client_ip(&self, client: &ClientAddr) -> Option<String> {
		let resolved = client.resolved();
		if let Some(ip) = resolved.as_deref() {
			if !is_private_ip(ip) {
				return resolved;
			}
		}

		match self.geoip.public_ip().await {
			Ok(public) => Some(public.to_string()),
			Err(e) => {
				warn!(error = %e, "public IP lookup failed, keeping resolved address");
				resolved
			}
		}
	}

	fn notify(&self, user: &DiscordUser, entry: &LogEntry) {
		let events = [
			Notification::LoginRecorded(build_login_notice(user, entry)),
			Notification::AssignRole {
				user_id: user.id.clone(),
			},
		];
		for event in events {
			let kind = event.kind();
			if let Err(e) = self.notifier.notify(event) {
				warn!(kind, error = %e, "failed to hand off notification");
			}
		}
	}
}

/// Embed summarizing a recorded login for the log channel.
pub fn build_login_notice(user: &DiscordUser, entry: &LogEntry) -> LoginNotice {
	let geo = &entry.geo;
	let ua = &entry.user_agent;
	let email = entry.identity.email.as_deref().unwrap_or(UNKNOWN);

	let description = format!(
		"**Name:** {name}\n\
		 **ID:** {id}\n\
		 **Email:** {email}\n\
		 **IP:** {ip} / Proxy: {proxy} / Hosting: {hosting}\n\
		 **Location:** {location}\n\
		 **User-Agent:** {raw}\n\
		 **OS / Browser:** {os} / {browser}\n\
		 **Device:** {device}",
		name = user.display_name(),
		id = user.id,
		ip = geo.masked_ip,
		proxy = geo.is_proxy,
		hosting = geo.is_hosting,
		location = geo.location_string(),
		raw = ua.raw_string,
		os = ua.os_family,
		browser = ua.browser_family,
		device = ua.device_class,
	);

	LoginNotice {
		title: LOGIN_NOTICE_TITLE.to_string(),
		description,
		thumbnail_url: entry.identity.avatar_url.clone(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use gatelog_server_useragent::classify;

	fn user() -> DiscordUser {
		DiscordUser {
			id: "123".to_string(),
			username: "tester".to_string(),
			discriminator: "4242".to_string(),
			global_name: None,
			email: None,
			avatar: Some("abc".to_string()),
		}
	}

	fn entry(user: &DiscordUser) -> LogEntry {
		LoginRecord {
			identity: LoggedIdentity {
				username: user.username.clone(),
				discriminator: user.discriminator.clone(),
				id: user.id.clone(),
				email: user.email.clone(),
				avatar_url: user.avatar_url(),
			},
			geo: GeoRecord::unknown("203.0.113.7"),
			user_agent: classify("Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1"),
		}
		.stamp("2025-01-01 00:00:00".to_string())
	}

	#[test]
	fn notice_carries_masked_ip_and_avatar() {
		let user = user();
		let notice = build_login_notice(&user, &entry(&user));

		assert_eq!(notice.title, LOGIN_NOTICE_TITLE);
		assert_eq!(
			notice.thumbnail_url,
			"https://cdn.discordapp.com/avatars/123/abc.png?size=1024"
		);
		assert!(notice.description.contains("**Name:** tester#4242"));
		assert!(notice.description.contains("**Email:** unknown"));
		assert!(notice.description.contains("203.0.***.***"));
		assert!(!notice.description.contains("203.0.113.7"));
		assert!(notice.description.contains("**Device:** Mobile"));
	}

	#[test]
	fn notice_lines_are_not_indented() {
		let user = user();
		let notice = build_login_notice(&user, &entry(&user));
		for line in notice.description.lines() {
			assert!(line.starts_with("**"), "unexpected line {line:?}");
		}
	}
}
