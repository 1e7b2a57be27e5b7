// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: built-in defaults, a TOML file, and environment variables.

use std::path::PathBuf;

use gatelog_common_secret::{load_secret_env, SecretString};
use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{
	parse_scopes, AccessLogConfigLayer, AdminConfigLayer, BotConfigLayer, DiscordConfigLayer,
	EnrichmentConfigLayer, HttpConfigLayer, LogFormat, LoggingConfigLayer,
};

/// Default system config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/gatelog/server.toml";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		Ok(ServerConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file is skipped.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new(SYSTEM_CONFIG_PATH)
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: `GATELOG_SERVER_<SECTION>_<FIELD>`. The bare names used by older
/// deployments (`DISCORD_CLIENT_ID`, `ADMIN_IP`, ...) are read as a fallback.
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		Ok(ServerConfigLayer {
			http: Some(load_http_from_env()?),
			discord: Some(load_discord_from_env()?),
			bot: Some(load_bot_from_env()?),
			admin: Some(AdminConfigLayer {
				ip: env_var_or("GATELOG_SERVER_ADMIN_IP", "ADMIN_IP"),
			}),
			access_log: Some(AccessLogConfigLayer {
				path: env_var("GATELOG_SERVER_ACCESS_LOG_PATH").map(PathBuf::from),
			}),
			enrichment: Some(load_enrichment_from_env()?),
			logging: Some(LoggingConfigLayer {
				level: env_var("GATELOG_SERVER_LOG_LEVEL"),
				format: env_var("GATELOG_SERVER_LOG_FORMAT").map(|v| LogFormat::parse(&v)),
			}),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_var_or(name: &str, legacy: &str) -> Option<String> {
	env_var(name).or_else(|| env_var(legacy))
}

fn secret_env_or(name: &str, legacy: &str) -> Result<Option<SecretString>, ConfigError> {
	match load_secret_env(name)? {
		Some(secret) => Ok(Some(secret)),
		None => Ok(load_secret_env(legacy)?),
	}
}

fn parse_env<T: std::str::FromStr>(name: &str, value: Option<String>) -> Result<Option<T>, ConfigError> {
	match value {
		Some(v) => v.trim().parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid {} value '{v}'", std::any::type_name::<T>()),
		}),
		None => Ok(None),
	}
}

fn load_http_from_env() -> Result<HttpConfigLayer, ConfigError> {
	Ok(HttpConfigLayer {
		host: env_var("GATELOG_SERVER_HOST"),
		port: parse_env("GATELOG_SERVER_PORT", env_var_or("GATELOG_SERVER_PORT", "PORT"))?,
	})
}

fn load_discord_from_env() -> Result<DiscordConfigLayer, ConfigError> {
	Ok(DiscordConfigLayer {
		client_id: env_var_or("GATELOG_SERVER_DISCORD_CLIENT_ID", "DISCORD_CLIENT_ID"),
		client_secret: secret_env_or("GATELOG_SERVER_DISCORD_CLIENT_SECRET", "DISCORD_CLIENT_SECRET")?,
		redirect_uri: env_var_or("GATELOG_SERVER_DISCORD_REDIRECT_URI", "DISCORD_REDIRECT_URI"),
		scopes: env_var("GATELOG_SERVER_DISCORD_SCOPES").map(|s| parse_scopes(&s)),
		api_url: env_var("GATELOG_SERVER_DISCORD_API_URL"),
		authorize_url: env_var("GATELOG_SERVER_DISCORD_AUTHORIZE_URL"),
	})
}

fn load_bot_from_env() -> Result<BotConfigLayer, ConfigError> {
	Ok(BotConfigLayer {
		token: secret_env_or("GATELOG_SERVER_DISCORD_BOT_TOKEN", "DISCORD_BOT_TOKEN")?,
		guild_id: env_var_or("GATELOG_SERVER_DISCORD_GUILD_ID", "DISCORD_GUILD_ID"),
		log_channel_id: env_var_or(
			"GATELOG_SERVER_DISCORD_LOG_CHANNEL_ID",
			"DISCORD_LOG_CHANNEL_ID",
		),
		role_id: env_var_or("GATELOG_SERVER_DISCORD_ROLE_ID", "DISCORD_ROLE_ID"),
		api_url: env_var("GATELOG_SERVER_DISCORD_API_URL"),
		queue_capacity: parse_env(
			"GATELOG_SERVER_NOTIFY_QUEUE_CAPACITY",
			env_var("GATELOG_SERVER_NOTIFY_QUEUE_CAPACITY"),
		)?,
	})
}

fn load_enrichment_from_env() -> Result<EnrichmentConfigLayer, ConfigError> {
	Ok(EnrichmentConfigLayer {
		geo_api_url: env_var("GATELOG_SERVER_GEO_API_URL"),
		public_ip_url: env_var("GATELOG_SERVER_PUBLIC_IP_URL"),
		timeout_secs: parse_env(
			"GATELOG_SERVER_OUTBOUND_TIMEOUT_SECS",
			env_var("GATELOG_SERVER_OUTBOUND_TIMEOUT_SECS"),
		)?,
		retry_attempts: parse_env(
			"GATELOG_SERVER_OUTBOUND_RETRY_ATTEMPTS",
			env_var("GATELOG_SERVER_OUTBOUND_RETRY_ATTEMPTS"),
		)?,
	})
}
