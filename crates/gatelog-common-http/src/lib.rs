// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Outbound HTTP for gatelog.
//!
//! Every upstream call (Discord, geolocation, public IP) goes through a client
//! from [`client_with_timeout`], so no request can outlive the configured bound.
//! Idempotent calls may additionally be wrapped in [`retry`].

mod client;
mod retry;

pub use client::{builder, client_with_timeout, user_agent, DEFAULT_TIMEOUT};
pub use retry::{retry, RetryConfig, RetryableError, RETRYABLE_STATUSES};
