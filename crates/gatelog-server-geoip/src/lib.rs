// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! IP geolocation enrichment for gatelog.
//!
//! Looks up client addresses against an ip-api.com compatible JSON endpoint and
//! resolves the server's own public address when the client address is private.
//! A lookup never fails: any upstream problem yields [`GeoRecord::unknown`].
//!
//! # Usage
//!
//! ```ignore
//! use gatelog_server_geoip::GeoIpService;
//!
//! let service = GeoIpService::new("http://ip-api.com/json", "https://api.ipify.org", timeout)?;
//! let record = service.lookup("8.8.8.8").await;
//! println!("{} / {}", record.masked_ip, record.country);
//! ```

use std::net::{IpAddr, Ipv6Addr};
use std::time::Duration;

use gatelog_common_http::{retry, RetryConfig, RetryableError, RETRYABLE_STATUSES};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

/// Placeholder for any field the lookup could not provide.
pub const UNKNOWN: &str = "unknown";

const MASK: &str = "***";
const LOOKUP_FIELDS: &str = "country,regionName,city,zip,proxy,hosting,query";

#[derive(Debug, thiserror::Error)]
pub enum GeoIpError {
	#[error("invalid service URL '{url}': {source}")]
	InvalidUrl {
		url: String,
		#[source]
		source: url::ParseError,
	},

	/// Built with the request URL stripped.
	#[error("HTTP request failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("upstream returned status {0}")]
	Status(StatusCode),

	#[error("failed to parse response: {0}")]
	Parse(String),

	#[error("invalid IP address in response: {0}")]
	InvalidIp(String),
}

impl RetryableError for GeoIpError {
	fn is_retryable(&self) -> bool {
		match self {
			GeoIpError::Http(e) => e.is_retryable(),
			GeoIpError::Status(status) => RETRYABLE_STATUSES.contains(status),
			_ => false,
		}
	}
}

pub type Result<T> = std::result::Result<T, GeoIpError>;

/// Replace everything after the first two dot-separated parts with `***.***`.
///
/// Applied to any string, valid address or not: `1.2.3.4` becomes `1.2.***.***`
/// and `abc` becomes `abc.***.***`. A dotless IPv6 address keeps its first two
/// hextets instead: `2001:db8::1` becomes `2001:db8:***:***`.
pub fn mask_ip(ip: &str) -> String {
	if !ip.contains('.') {
		if let Ok(v6) = ip.parse::<Ipv6Addr>() {
			if let Some(v4) = v6.to_ipv4_mapped() {
				return mask_ip(&v4.to_string());
			}
			let [a, b, ..] = v6.segments();
			return format!("{a:x}:{b:x}:{MASK}:{MASK}");
		}
	}

	let mut parts: Vec<&str> = ip.split('.').take(2).collect();
	parts.extend([MASK, MASK]);
	parts.join(".")
}

/// Location data attached to a login. The address is always masked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoRecord {
	#[serde(rename = "ip")]
	pub masked_ip: String,
	pub country: String,
	pub region: String,
	pub city: String,
	#[serde(rename = "zip")]
	pub postal_code: String,
	#[serde(rename = "proxy")]
	pub is_proxy: bool,
	#[serde(rename = "hosting")]
	pub is_hosting: bool,
}

impl GeoRecord {
	/// The fallback record for a failed lookup.
	pub fn unknown(ip: &str) -> Self {
		Self {
			masked_ip: mask_ip(ip),
			country: UNKNOWN.to_string(),
			region: UNKNOWN.to_string(),
			city: UNKNOWN.to_string(),
			postal_code: UNKNOWN.to_string(),
			is_proxy: false,
			is_hosting: false,
		}
	}

	/// `country - region - city (zip)`
	pub fn location_string(&self) -> String {
		format!(
			"{} - {} - {} ({})",
			self.country, self.region, self.city, self.postal_code
		)
	}
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
	country: Option<String>,
	#[serde(rename = "regionName")]
	region_name: Option<String>,
	city: Option<String>,
	zip: Option<String>,
	proxy: Option<bool>,
	hosting: Option<bool>,
	query: Option<String>,
}

impl IpApiResponse {
	fn into_record(self, requested_ip: &str) -> GeoRecord {
		let or_unknown = |v: Option<String>| v.unwrap_or_else(|| UNKNOWN.to_string());
		GeoRecord {
			masked_ip: mask_ip(self.query.as_deref().unwrap_or(requested_ip)),
			country: or_unknown(self.country),
			region: or_unknown(self.region_name),
			city: or_unknown(self.city),
			postal_code: or_unknown(self.zip),
			is_proxy: self.proxy.unwrap_or(false),
			is_hosting: self.hosting.unwrap_or(false),
		}
	}
}

#[derive(Debug, Clone)]
pub struct GeoIpService {
	client: reqwest::Client,
	geo_api_url: Url,
	public_ip_url: Url,
	retry: RetryConfig,
}

impl GeoIpService {
	#[tracing::instrument(level = "info", skip_all, fields(geo_api_url = %geo_api_url))]
	pub fn new(geo_api_url: &str, public_ip_url: &str, timeout: Duration) -> Result<Self> {
		let parse = |url: &str| {
			Url::parse(url).map_err(|source| GeoIpError::InvalidUrl {
				url: url.to_string(),
				source,
			})
		};

		let geo_api_url = parse(geo_api_url)?;
		if geo_api_url.cannot_be_a_base() {
			return Err(GeoIpError::InvalidUrl {
				url: geo_api_url.to_string(),
				source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
			});
		}

		Ok(Self {
			client: gatelog_common_http::client_with_timeout(timeout)?,
			geo_api_url,
			public_ip_url: parse(public_ip_url)?,
			retry: RetryConfig::default(),
		})
	}

	pub fn with_retry(mut self, retry: RetryConfig) -> Self {
		self.retry = retry;
		self
	}

	/// `{geo_api_url}/{ip}?fields=...`, with `ip` encoded as one path segment.
	fn lookup_url(&self, ip: &str) -> Url {
		let mut url = self.geo_api_url.clone();
		if let Ok(mut segments) = url.path_segments_mut() {
			segments.pop_if_empty().push(ip);
		}
		url.query_pairs_mut().append_pair("fields", LOOKUP_FIELDS);
		url
	}

	async fn try_lookup(&self, ip: &str) -> Result<GeoRecord> {
		let url = &self.lookup_url(ip);
		let body: IpApiResponse = retry(&self.retry, move || async move {
			let response = self
				.client
				.get(url.clone())
				.send()
				.await
				.map_err(|e| GeoIpError::Http(e.without_url()))?;
			if !response.status().is_success() {
				return Err(GeoIpError::Status(response.status()));
			}
			response
				.json::<IpApiResponse>()
				.await
				.map_err(|e| GeoIpError::Parse(e.without_url().to_string()))
		})
		.await?;

		Ok(body.into_record(ip))
	}

	/// Geolocate `ip`. Never fails; upstream errors yield [`GeoRecord::unknown`].
	#[tracing::instrument(level = "debug", skip_all, fields(ip = %mask_ip(ip)))]
	pub async fn lookup(&self, ip: &str) -> GeoRecord {
		match self.try_lookup(ip).await {
			Ok(record) => record,
			Err(e) => {
				tracing::warn!(error = %e, "geo lookup failed, using fallback record");
				GeoRecord::unknown(ip)
			}
		}
	}

	/// This host's public address, as reported by the public IP service.
	#[tracing::instrument(level = "debug", skip(self))]
	pub async fn public_ip(&self) -> Result<IpAddr> {
		let text = retry(&self.retry, move || async move {
			let response = self
				.client
				.get(self.public_ip_url.clone())
				.send()
				.await
				.map_err(|e| GeoIpError::Http(e.without_url()))?;
			if !response.status().is_success() {
				return Err(GeoIpError::Status(response.status()));
			}
			response
				.text()
				.await
				.map_err(|e| GeoIpError::Http(e.without_url()))
		})
		.await?;

		let trimmed = text.trim();
		trimmed
			.parse()
			.map_err(|_| GeoIpError::InvalidIp(trimmed.chars().take(64).collect()))
	}
}
