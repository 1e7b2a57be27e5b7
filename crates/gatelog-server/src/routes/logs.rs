// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Admin access log viewer.

use axum::{extract::State, response::Html};
use gatelog_server_geoip::mask_ip;

use crate::{
	api::AppState,
	client_info::ClientAddr,
	error::ServerError,
	templates::{render, LogsTemplate},
};

/// GET /logs - full access log, for the configured admin address only.
pub async fn view_logs(
	State(state): State<AppState>,
	client: ClientAddr,
) -> Result<Html<String>, ServerError> {
	let caller = client.resolved();
	if caller.as_deref() != Some(state.admin_ip.as_str()) {
		return Err(ServerError::Forbidden(format!(
			"log viewer denied for {}",
			caller.as_deref().map(mask_ip).unwrap_or_else(|| "unknown".to_string())
		)));
	}

	let log = state.access_log.load().await?;
	tracing::debug!(identities = log.len(), "serving access log");

	Ok(render(&LogsTemplate::from_log(&log), "logs"))
}
