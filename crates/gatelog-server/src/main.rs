// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! gatelog server binary.

use clap::{Parser, Subcommand};
use gatelog_common_http::RetryConfig;
use gatelog_server::{create_app_state, create_router};
use gatelog_server_config::{LogFormat, ServerConfig};
use gatelog_server_notify::{
	DiscordBotTransport, NoopNotifier, NotificationService, NotificationSink,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How long queued notifications may take to drain on shutdown.
const NOTIFY_SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// gatelog - Discord login gateway with an enriched access log.
#[derive(Parser, Debug)]
#[command(
	name = "gatelog-server",
	about = "Discord login gateway with an enriched access log",
	version
)]
struct Args {
	/// Path to a TOML config file (overrides /etc/gatelog/server.toml)
	#[arg(long, env = "GATELOG_SERVER_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version information
	Version,
}

fn init_tracing(config: &ServerConfig) {
	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| config.logging.level.clone().into());

	match config.logging.format {
		LogFormat::Json => tracing_subscriber::registry()
			.with(filter)
			.with(tracing_subscriber::fmt::layer().json())
			.init(),
		LogFormat::Text => tracing_subscriber::registry()
			.with(filter)
			.with(tracing_subscriber::fmt::layer())
			.init(),
	}
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		tracing::error!(error = %e, "failed to listen for shutdown signal");
		std::future::pending::<()>().await;
	}
	tracing::info!("received shutdown signal");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("gatelog-server {}", env!("CARGO_PKG_VERSION"));
		return Ok(());
	}

	dotenvy::dotenv().ok();

	let config = gatelog_server_config::load_config(args.config)?;

	init_tracing(&config);

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		access_log = %config.access_log.path.display(),
		"starting gatelog-server"
	);

	let notifier = match &config.bot {
		Some(bot) => {
			let transport = DiscordBotTransport::new(bot, config.enrichment.timeout)?;
			Some(Arc::new(NotificationService::new(
				Arc::new(transport),
				bot.queue_capacity,
				RetryConfig::with_max_attempts(config.enrichment.retry_attempts),
			)))
		}
		None => {
			tracing::info!("Discord bot not configured, notifications disabled");
			None
		}
	};
	let sink: Arc<dyn NotificationSink> = match &notifier {
		Some(service) => Arc::clone(service) as Arc<dyn NotificationSink>,
		None => Arc::new(NoopNotifier),
	};

	let state = create_app_state(&config, sink)?;
	let app = create_router(state).layer(TraceLayer::new_for_http());

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);

	let listener = tokio::net::TcpListener::bind(&addr).await?;

	if let Err(e) = axum::serve(
		listener,
		app.into_make_service_with_connect_info::<SocketAddr>(),
	)
	.with_graceful_shutdown(shutdown_signal())
	.await
	{
		tracing::error!(error = %e, "server error");
	}

	if let Some(service) = notifier {
		tracing::info!("draining notification queue");
		service.shutdown(NOTIFY_SHUTDOWN_GRACE).await;
	}

	tracing::info!("server shutdown complete");
	Ok(())
}
