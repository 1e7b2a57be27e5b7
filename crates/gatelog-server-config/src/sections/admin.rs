// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Admin log viewer gate.

use serde::Deserialize;

pub const DEFAULT_ADMIN_IP: &str = "127.0.0.1";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AdminConfigLayer {
	pub ip: Option<String>,
}

impl AdminConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.ip.is_some() {
			self.ip = other.ip;
		}
	}

	pub fn finalize(self) -> AdminConfig {
		AdminConfig {
			ip: self
				.ip
				.map(|ip| ip.trim().to_string())
				.filter(|ip| !ip.is_empty())
				.unwrap_or_else(|| DEFAULT_ADMIN_IP.to_string()),
		}
	}
}

/// The single address allowed to read the access log.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminConfig {
	pub ip: String,
}

impl Default for AdminConfig {
	fn default() -> Self {
		AdminConfigLayer::default().finalize()
	}
}
