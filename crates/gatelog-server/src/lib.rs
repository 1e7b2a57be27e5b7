// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Discord login gateway.
//!
//! Serves a login page, runs the OAuth callback through the login pipeline,
//! and exposes the resulting access log to a single admin address.

pub mod api;
pub mod client_info;
pub mod error;
pub mod login;
pub mod routes;
pub mod templates;

pub use api::{create_app_state, create_router, AppState};
pub use error::ServerError;
pub use gatelog_server_config::ServerConfig;
pub use login::{LoginError, LoginOutcome, LoginPipeline};
