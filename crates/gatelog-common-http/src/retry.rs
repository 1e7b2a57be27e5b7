// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Bounded retry with exponential backoff for idempotent upstream calls.

use reqwest::StatusCode;
use std::time::Duration;
use tracing::warn;

/// Statuses worth a second attempt.
pub const RETRYABLE_STATUSES: [StatusCode; 6] = [
	StatusCode::TOO_MANY_REQUESTS,
	StatusCode::REQUEST_TIMEOUT,
	StatusCode::INTERNAL_SERVER_ERROR,
	StatusCode::BAD_GATEWAY,
	StatusCode::SERVICE_UNAVAILABLE,
	StatusCode::GATEWAY_TIMEOUT,
];

#[derive(Debug, Clone)]
pub struct RetryConfig {
	pub max_attempts: u32,
	pub base_delay: Duration,
	pub max_delay: Duration,
	pub backoff_factor: f64,
	pub jitter: bool,
}

impl Default for RetryConfig {
	fn default() -> Self {
		Self {
			max_attempts: 3,
			base_delay: Duration::from_millis(200),
			max_delay: Duration::from_secs(2),
			backoff_factor: 2.0,
			jitter: true,
		}
	}
}

impl RetryConfig {
	/// Default backoff with a different attempt budget. Zero is treated as one.
	pub fn with_max_attempts(max_attempts: u32) -> Self {
		Self {
			max_attempts: max_attempts.max(1),
			..Self::default()
		}
	}

	/// A single attempt, no retries.
	pub fn none() -> Self {
		Self::with_max_attempts(1)
	}
}

pub trait RetryableError {
	fn is_retryable(&self) -> bool;
}

impl RetryableError for reqwest::Error {
	fn is_retryable(&self) -> bool {
		if self.is_timeout() || self.is_connect() {
			return true;
		}

		self
			.status()
			.is_some_and(|status| RETRYABLE_STATUSES.contains(&status))
	}
}

fn calculate_delay(cfg: &RetryConfig, attempt: u32) -> Duration {
	let exponential_delay = cfg.base_delay.as_secs_f64() * cfg.backoff_factor.powi(attempt as i32);
	let capped_delay = exponential_delay.min(cfg.max_delay.as_secs_f64());

	let final_delay = if cfg.jitter {
		capped_delay * (0.5 + fastrand::f64())
	} else {
		capped_delay
	};

	Duration::from_secs_f64(final_delay)
}

/// Run `f` until it succeeds, returns a non-retryable error, or the attempt
/// budget is spent. The last error is returned unchanged.
pub async fn retry<F, Fut, T, E>(cfg: &RetryConfig, mut f: F) -> Result<T, E>
where
	F: FnMut() -> Fut,
	Fut: std::future::Future<Output = Result<T, E>>,
	E: RetryableError + std::fmt::Display,
{
	let mut attempt = 0;

	loop {
		match f().await {
			Ok(result) => return Ok(result),
			Err(err) => {
				attempt += 1;

				if !err.is_retryable() {
					return Err(err);
				}

				if attempt >= cfg.max_attempts {
					warn!(
						error = %err,
						attempt,
						max_attempts = cfg.max_attempts,
						"upstream retries exhausted"
					);
					return Err(err);
				}

				let delay = calculate_delay(cfg, attempt - 1);
				warn!(
					error = %err,
					attempt,
					max_attempts = cfg.max_attempts,
					delay_ms = delay.as_millis() as u64,
					"retrying upstream call"
				);

				tokio::time::sleep(delay).await;
			}
		}
	}
}
