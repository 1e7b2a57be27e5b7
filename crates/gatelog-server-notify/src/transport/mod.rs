// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod discord;

pub use discord::DiscordBotTransport;

use async_trait::async_trait;

use crate::error::Result;
use crate::event::Notification;

/// Delivers one notification to the chat platform.
///
/// Errors that report `is_retryable()` are retried by the service.
#[async_trait]
pub trait NotificationTransport: Send + Sync {
	fn name(&self) -> &str;

	async fn deliver(&self, event: &Notification) -> Result<()>;
}
