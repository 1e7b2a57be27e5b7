// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Health HTTP handler.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::api::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
	pub status: &'static str,
	pub version: &'static str,
	pub oauth_configured: bool,
	pub bot_configured: bool,
	pub guild_join_enabled: bool,
	pub admin_viewer_configured: bool,
	pub access_log_readable: bool,
}

/// GET /health - configuration summary and access log readability.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
	let access_log_readable = match state.access_log.load().await {
		Ok(_) => true,
		Err(e) => {
			tracing::warn!(error = %e, "access log is not readable");
			false
		}
	};

	Json(HealthResponse {
		status: if access_log_readable { "healthy" } else { "degraded" },
		version: env!("CARGO_PKG_VERSION"),
		oauth_configured: state.login.oauth().is_some(),
		bot_configured: state.bot_configured,
		guild_join_enabled: state.login.guild_join_enabled(),
		admin_viewer_configured: !state.admin_ip.is_empty(),
		access_log_readable,
	})
}
