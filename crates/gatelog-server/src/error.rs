// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Server error types and HTTP response conversions.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use serde::Serialize;

use crate::login::LoginError;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	/// Invalid request input.
	#[error("Invalid request: {0}")]
	BadRequest(String),

	/// Caller is not allowed to see the resource.
	#[error("Forbidden: {0}")]
	Forbidden(String),

	/// Upstream service failed or answered with an error.
	#[error("Upstream error: {0}")]
	UpstreamError(String),

	/// Internal server error.
	#[error("Internal error: {0}")]
	Internal(String),

	/// The feature is not configured on this deployment.
	#[error("Not implemented: {0}")]
	NotImplemented(String),

	#[error("Discord client error: {0}")]
	OAuth(#[from] gatelog_server_auth_discord::OAuthError),

	#[error("Geo client error: {0}")]
	GeoIp(#[from] gatelog_server_geoip::GeoIpError),

	#[error("Access log error: {0}")]
	AccessLog(#[from] gatelog_server_access_log::AccessLogError),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
	pub error: String,
	pub message: String,
}

impl ErrorResponse {
	fn new(error: &str, message: impl Into<String>) -> Self {
		Self {
			error: error.to_string(),
			message: message.into(),
		}
	}
}

impl From<LoginError> for ServerError {
	fn from(err: LoginError) -> Self {
		let message = err.to_string();
		match err {
			LoginError::MissingCode | LoginError::MissingAccessToken => {
				ServerError::BadRequest(message)
			}
			LoginError::NotConfigured => ServerError::NotImplemented(message),
			LoginError::TokenExchange(_) | LoginError::Persist(_) => ServerError::Internal(message),
			LoginError::IdentityFetch(_) => ServerError::UpstreamError(message),
		}
	}
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		let (status, error_response) = match &self {
			ServerError::BadRequest(msg) => (
				StatusCode::BAD_REQUEST,
				ErrorResponse::new("bad_request", msg.clone()),
			),
			ServerError::Forbidden(msg) => {
				tracing::warn!(error = %msg, "forbidden");
				(
					StatusCode::FORBIDDEN,
					ErrorResponse::new("forbidden", msg.clone()),
				)
			}
			ServerError::UpstreamError(msg) => {
				tracing::warn!(error = %msg, "upstream error");
				(
					StatusCode::BAD_GATEWAY,
					ErrorResponse::new("upstream_error", msg.clone()),
				)
			}
			ServerError::Internal(msg) => {
				tracing::error!(error = %msg, "internal error");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					ErrorResponse::new("internal_error", "An internal error occurred"),
				)
			}
			ServerError::NotImplemented(msg) => (
				StatusCode::NOT_IMPLEMENTED,
				ErrorResponse::new("not_implemented", msg.clone()),
			),
			ServerError::OAuth(e) => {
				tracing::error!(error = %e, "discord client error");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					ErrorResponse::new("internal_error", "An internal error occurred"),
				)
			}
			ServerError::GeoIp(e) => {
				tracing::error!(error = %e, "geo client error");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					ErrorResponse::new("internal_error", "An internal error occurred"),
				)
			}
			ServerError::AccessLog(e) => {
				tracing::error!(error = %e, "access log error");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					ErrorResponse::new("access_log_error", "The access log could not be read"),
				)
			}
		};

		(status, Json(error_response)).into_response()
	}
}
