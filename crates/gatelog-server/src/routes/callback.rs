// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! OAuth redirect target.

use axum::{
	extract::{Query, State},
	http::{header::USER_AGENT, HeaderMap},
	response::Html,
};
use serde::Deserialize;

use crate::{
	api::AppState,
	client_info::ClientAddr,
	error::ServerError,
	templates::{render, WelcomeTemplate},
};

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
	#[serde(default)]
	pub code: Option<String>,
}

/// GET /callback?code=... - runs the login pipeline and renders the welcome page.
pub async fn callback(
	State(state): State<AppState>,
	client: ClientAddr,
	headers: HeaderMap,
	Query(params): Query<CallbackParams>,
) -> Result<Html<String>, ServerError> {
	let user_agent = headers.get(USER_AGENT).and_then(|v| v.to_str().ok());

	let outcome = state
		.login
		.run(params.code.as_deref(), &client, user_agent)
		.await?;

	let display_name = outcome.user.display_name();
	Ok(render(
		&WelcomeTemplate {
			display_name: &display_name,
			avatar_url: &outcome.entry.identity.avatar_url,
		},
		"welcome",
	))
}
