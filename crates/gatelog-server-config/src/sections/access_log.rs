// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Access log file location.

use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_ACCESS_LOG_PATH: &str = "access_log.json";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AccessLogConfigLayer {
	pub path: Option<PathBuf>,
}

impl AccessLogConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.path.is_some() {
			self.path = other.path;
		}
	}

	pub fn finalize(self) -> AccessLogConfig {
		AccessLogConfig {
			path: self
				.path
				.unwrap_or_else(|| PathBuf::from(DEFAULT_ACCESS_LOG_PATH)),
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccessLogConfig {
	pub path: PathBuf,
}

impl Default for AccessLogConfig {
	fn default() -> Self {
		AccessLogConfigLayer::default().finalize()
	}
}
