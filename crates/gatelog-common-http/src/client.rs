// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP client with a fixed User-Agent and a mandatory timeout.

use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Used when a caller has no configured bound of its own.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client builder carrying the gatelog User-Agent.
pub fn builder() -> ClientBuilder {
	Client::builder().user_agent(user_agent())
}

/// Build a client whose requests (connect + body) are capped at `timeout`.
pub fn client_with_timeout(timeout: Duration) -> Result<Client, reqwest::Error> {
	builder()
		.timeout(timeout)
		.connect_timeout(timeout.min(Duration::from_secs(5)))
		.build()
}

/// `gatelog/{version}`
pub fn user_agent() -> String {
	format!("gatelog/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn user_agent_has_product_and_version() {
		let ua = user_agent();
		let parts: Vec<&str> = ua.split('/').collect();
		assert_eq!(parts.len(), 2);
		assert_eq!(parts[0], "gatelog");
		assert!(!parts[1].is_empty());
	}

	#[test]
	fn client_builds_with_timeout() {
		assert!(client_with_timeout(Duration::from_millis(250)).is_ok());
		assert!(client_with_timeout(DEFAULT_TIMEOUT).is_ok());
	}
}
