// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum AccessLogError {
	#[error("access log I/O error at {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("access log at {path} is not valid JSON: {source}")]
	Corrupt {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("failed to encode access log: {0}")]
	Encode(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AccessLogError>;
