// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections for gatelog-server.

pub mod access_log;
pub mod admin;
pub mod bot;
pub mod discord;
pub mod enrichment;
pub mod http;
pub mod logging;

pub use access_log::{AccessLogConfig, AccessLogConfigLayer};
pub use admin::{AdminConfig, AdminConfigLayer};
pub use bot::{BotConfig, BotConfigLayer};
pub use discord::{
	parse_scopes, DiscordConfig, DiscordConfigLayer, DEFAULT_DISCORD_AUTHORIZE_URL, DEFAULT_DISCORD_SCOPES,
};
pub use enrichment::{EnrichmentConfig, EnrichmentConfigLayer};
pub use http::{HttpConfig, HttpConfigLayer};
pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
