// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Outbound enrichment endpoints and the timeout/retry bounds shared by every
//! upstream call.

use crate::error::ConfigError;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_GEO_API_URL: &str = "http://ip-api.com/json";
pub const DEFAULT_PUBLIC_IP_URL: &str = "https://api.ipify.org";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct EnrichmentConfigLayer {
	pub geo_api_url: Option<String>,
	pub public_ip_url: Option<String>,
	pub timeout_secs: Option<u64>,
	pub retry_attempts: Option<u32>,
}

impl EnrichmentConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.geo_api_url.is_some() {
			self.geo_api_url = other.geo_api_url;
		}
		if other.public_ip_url.is_some() {
			self.public_ip_url = other.public_ip_url;
		}
		if other.timeout_secs.is_some() {
			self.timeout_secs = other.timeout_secs;
		}
		if other.retry_attempts.is_some() {
			self.retry_attempts = other.retry_attempts;
		}
	}

	pub fn finalize(self) -> Result<EnrichmentConfig, ConfigError> {
		let timeout_secs = self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
		if timeout_secs == 0 {
			return Err(ConfigError::Validation(
				"outbound timeout_secs must be greater than zero".to_string(),
			));
		}

		Ok(EnrichmentConfig {
			geo_api_url: self
				.geo_api_url
				.unwrap_or_else(|| DEFAULT_GEO_API_URL.to_string()),
			public_ip_url: self
				.public_ip_url
				.unwrap_or_else(|| DEFAULT_PUBLIC_IP_URL.to_string()),
			timeout: Duration::from_secs(timeout_secs),
			retry_attempts: self.retry_attempts.unwrap_or(DEFAULT_RETRY_ATTEMPTS).max(1),
		})
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentConfig {
	pub geo_api_url: String,
	pub public_ip_url: String,
	/// Applied to every outbound client, not only enrichment.
	pub timeout: Duration,
	pub retry_attempts: u32,
}

impl Default for EnrichmentConfig {
	fn default() -> Self {
		Self {
			geo_api_url: DEFAULT_GEO_API_URL.to_string(),
			public_ip_url: DEFAULT_PUBLIC_IP_URL.to_string(),
			timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
			retry_attempts: DEFAULT_RETRY_ATTEMPTS,
		}
	}
}
