// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;
use std::time::Duration;

use gatelog_common_http::{retry, RetryConfig};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::error::{NotifyError, Result};
use crate::event::Notification;
use crate::transport::NotificationTransport;

/// Hand-off point used by request handlers. Never waits on delivery.
pub trait NotificationSink: Send + Sync {
	fn notify(&self, event: Notification) -> Result<()>;
}

/// Accepts and discards everything. Used when no bot is configured.
pub struct NoopNotifier;

impl NotificationSink for NoopNotifier {
	fn notify(&self, event: Notification) -> Result<()> {
		debug!(kind = event.kind(), "bot not configured, dropping notification");
		Ok(())
	}
}

/// Bounded queue in front of a supervising task that owns the transport.
pub struct NotificationService {
	tx: mpsc::Sender<Notification>,
	shutdown_tx: broadcast::Sender<()>,
	handle: Mutex<Option<JoinHandle<()>>>,
}

impl NotificationService {
	pub fn new(
		transport: Arc<dyn NotificationTransport>,
		queue_capacity: usize,
		retry: RetryConfig,
	) -> Self {
		let (tx, rx) = mpsc::channel(queue_capacity.max(1));
		let (shutdown_tx, _) = broadcast::channel(1);
		let shutdown_rx = shutdown_tx.subscribe();

		info!(
			transport = transport.name(),
			queue_capacity, "notification service started"
		);
		let handle = tokio::spawn(Self::supervisor(rx, shutdown_rx, transport, retry));

		Self {
			tx,
			shutdown_tx,
			handle: Mutex::new(Some(handle)),
		}
	}

	async fn supervisor(
		mut rx: mpsc::Receiver<Notification>,
		mut shutdown_rx: broadcast::Receiver<()>,
		transport: Arc<dyn NotificationTransport>,
		retry_config: RetryConfig,
	) {
		loop {
			tokio::select! {
				event = rx.recv() => match event {
					Some(event) => deliver(transport.as_ref(), &retry_config, event).await,
					None => break,
				},
				_ = shutdown_rx.recv() => {
					rx.close();
					while let Some(event) = rx.recv().await {
						deliver(transport.as_ref(), &retry_config, event).await;
					}
					break;
				}
			}
		}
		debug!("notification supervisor exited");
	}

	/// Stop accepting events, deliver what is queued, and wait at most `grace`.
	#[instrument(skip(self))]
	pub async fn shutdown(&self, grace: Duration) {
		let _ = self.shutdown_tx.send(());

		let Some(mut handle) = self.handle.lock().await.take() else {
			return;
		};
		if tokio::time::timeout(grace, &mut handle).await.is_err() {
			warn!("notification drain exceeded grace period, dropping remaining events");
			handle.abort();
		}

		info!("notification service shut down");
	}
}

impl NotificationSink for NotificationService {
	#[instrument(skip(self, event), fields(kind = event.kind()))]
	fn notify(&self, event: Notification) -> Result<()> {
		self.tx.try_send(event).map_err(|e| match e {
			TrySendError::Full(_) => NotifyError::QueueFull,
			TrySendError::Closed(_) => NotifyError::Closed,
		})
	}
}

async fn deliver(transport: &dyn NotificationTransport, retry_config: &RetryConfig, event: Notification) {
	let result = retry(retry_config, || transport.deliver(&event)).await;
	match result {
		Ok(()) => debug!(kind = event.kind(), transport = transport.name(), "notification delivered"),
		Err(e) => warn!(
			kind = event.kind(),
			transport = transport.name(),
			error = %e,
			"notification delivery failed"
		),
	}
}
