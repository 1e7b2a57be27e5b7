// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration layer for merging from multiple sources.

use serde::Deserialize;

use crate::sections::{
	AccessLogConfigLayer, AdminConfigLayer, BotConfigLayer, DiscordConfigLayer,
	EnrichmentConfigLayer, HttpConfigLayer, LoggingConfigLayer,
};

/// Server configuration layer - all fields are Option for merging.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfigLayer {
	#[serde(default)]
	pub http: Option<HttpConfigLayer>,
	#[serde(default)]
	pub discord: Option<DiscordConfigLayer>,
	#[serde(default)]
	pub bot: Option<BotConfigLayer>,
	#[serde(default)]
	pub admin: Option<AdminConfigLayer>,
	#[serde(default)]
	pub access_log: Option<AccessLogConfigLayer>,
	#[serde(default)]
	pub enrichment: Option<EnrichmentConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
}

impl ServerConfigLayer {
	/// Merge another layer into this one. Other layer takes precedence.
	pub fn merge(&mut self, other: ServerConfigLayer) {
		merge_option(&mut self.http, other.http, HttpConfigLayer::merge);
		merge_option(&mut self.discord, other.discord, DiscordConfigLayer::merge);
		merge_option(&mut self.bot, other.bot, BotConfigLayer::merge);
		merge_option(&mut self.admin, other.admin, AdminConfigLayer::merge);
		merge_option(
			&mut self.access_log,
			other.access_log,
			AccessLogConfigLayer::merge,
		);
		merge_option(
			&mut self.enrichment,
			other.enrichment,
			EnrichmentConfigLayer::merge,
		);
		merge_option(&mut self.logging, other.logging, LoggingConfigLayer::merge);
	}
}

fn merge_option<T, F>(target: &mut Option<T>, source: Option<T>, merge_fn: F)
where
	F: FnOnce(&mut T, T),
{
	match (target.as_mut(), source) {
		(Some(t), Some(s)) => merge_fn(t, s),
		(None, Some(s)) => *target = Some(s),
		_ => {}
	}
}
