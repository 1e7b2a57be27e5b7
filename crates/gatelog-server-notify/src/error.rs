// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use gatelog_common_http::{RetryableError, RETRYABLE_STATUSES};
use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
	#[error("notification queue is full")]
	QueueFull,

	#[error("notification service is shut down")]
	Closed,

	#[error("HTTP request failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("Discord API returned {status}: {body}")]
	Api { status: StatusCode, body: String },
}

impl RetryableError for NotifyError {
	fn is_retryable(&self) -> bool {
		match self {
			NotifyError::Http(e) => e.is_retryable(),
			NotifyError::Api { status, .. } => RETRYABLE_STATUSES.contains(status),
			NotifyError::QueueFull | NotifyError::Closed => false,
		}
	}
}

pub type Result<T> = std::result::Result<T, NotifyError>;
