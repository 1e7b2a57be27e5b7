// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Login landing page.

use axum::{extract::State, response::Html};

use crate::{
	api::AppState,
	error::ServerError,
	templates::{render, IndexTemplate},
};

/// GET / - page linking to the Discord authorization URL.
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, ServerError> {
	let oauth = state
		.login
		.oauth()
		.ok_or_else(|| ServerError::NotImplemented("Discord OAuth is not configured".to_string()))?;

	let authorization_url = oauth.authorization_url();
	Ok(render(
		&IndexTemplate {
			authorization_url: &authorization_url,
		},
		"index",
	))
}
