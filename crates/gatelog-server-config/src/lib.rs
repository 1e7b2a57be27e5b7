// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Layered configuration for gatelog-server.
//!
//! Precedence, highest first:
//! 1. Environment variables (`GATELOG_SERVER_*`, with legacy bare names as fallback)
//! 2. TOML config file (`/etc/gatelog/server.toml` or `--config`)
//! 3. Built-in defaults
//!
//! ```ignore
//! let config = gatelog_server_config::load_config(None)?;
//! println!("listening on {}", config.socket_addr());
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use std::path::PathBuf;
use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	/// `None` when no OAuth application is configured.
	pub discord: Option<DiscordConfig>,
	/// `None` when no bot token is configured.
	pub bot: Option<BotConfig>,
	pub admin: AdminConfig,
	pub access_log: AccessLogConfig,
	pub enrichment: EnrichmentConfig,
	pub logging: LoggingConfig,
}

impl ServerConfig {
	/// Socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from defaults, a TOML file and the environment.
///
/// `config_path` overrides the system config file location.
pub fn load_config(config_path: Option<PathBuf>) -> Result<ServerConfig, ConfigError> {
	let toml = match config_path {
		Some(path) => TomlSource::new(path),
		None => TomlSource::system(),
	};

	let mut sources: Vec<Box<dyn ConfigSource>> =
		vec![Box::new(EnvSource), Box::new(toml), Box::new(DefaultsSource)];
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	finalize(merged)
}

/// Resolve a merged layer into a validated configuration.
pub fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let discord = layer.discord.unwrap_or_default().build()?;
	let bot = layer.bot.unwrap_or_default().build()?;
	let admin = layer.admin.unwrap_or_default().finalize();
	let access_log = layer.access_log.unwrap_or_default().finalize();
	let enrichment = layer.enrichment.unwrap_or_default().finalize()?;
	let logging = layer.logging.unwrap_or_default().finalize();

	info!(
		host = %http.host,
		port = http.port,
		discord_configured = discord.is_some(),
		bot_configured = bot.is_some(),
		guild_join = bot.as_ref().is_some_and(|b| b.guild_id.is_some()),
		access_log = %access_log.path.display(),
		timeout_secs = enrichment.timeout.as_secs(),
		"server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		discord,
		bot,
		admin,
		access_log,
		enrichment,
		logging,
	})
}
