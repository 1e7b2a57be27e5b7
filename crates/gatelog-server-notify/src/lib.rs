// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Fire-and-forget Discord bot notifications.
//!
//! Request handlers hand a [`Notification`] to a [`NotificationSink`] and move
//! on. The [`NotificationService`] owns a bounded queue and a background task
//! that delivers each event through a [`NotificationTransport`], retrying
//! transient failures. A failed or dropped notification is logged and never
//! reaches the login response.

pub mod error;
pub mod event;
pub mod service;
pub mod transport;

pub use error::{NotifyError, Result};
pub use event::{LoginNotice, Notification};
pub use service::{NoopNotifier, NotificationService, NotificationSink};
pub use transport::{DiscordBotTransport, NotificationTransport};
