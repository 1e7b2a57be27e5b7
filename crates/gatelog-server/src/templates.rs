// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! HTML views.

use askama::Template;
use axum::response::Html;
use gatelog_server_access_log::{AccessLog, LogEntry};
use gatelog_server_auth_discord::display_name;
use tracing::warn;

#[derive(Template)]
#[template(path = "index.html", escape = "html")]
pub struct IndexTemplate<'a> {
	pub authorization_url: &'a str,
}

#[derive(Template)]
#[template(path = "welcome.html", escape = "html")]
pub struct WelcomeTemplate<'a> {
	pub display_name: &'a str,
	pub avatar_url: &'a str,
}

#[derive(Template)]
#[template(path = "logs.html", escape = "html")]
pub struct LogsTemplate {
	pub users: Vec<UserLogView>,
	pub total_entries: usize,
}

pub struct UserLogView {
	pub id: String,
	pub entries: Vec<EntryView>,
}

pub struct EntryView {
	pub timestamp: String,
	pub username: String,
	pub email: String,
	pub ip: String,
	pub location: String,
	pub proxy: bool,
	pub hosting: bool,
	pub os: String,
	pub browser: String,
	pub device: String,
	pub is_bot: bool,
	pub user_agent: String,
}

impl From<&LogEntry> for EntryView {
	fn from(entry: &LogEntry) -> Self {
		let identity = &entry.identity;
		Self {
			timestamp: entry.timestamp.clone(),
			username: display_name(&identity.username, &identity.discriminator),
			email: identity.email.clone().unwrap_or_default(),
			ip: entry.geo.masked_ip.clone(),
			location: entry.geo.location_string(),
			proxy: entry.geo.is_proxy,
			hosting: entry.geo.is_hosting,
			os: entry.user_agent.os_family.clone(),
			browser: entry.user_agent.browser_family.clone(),
			device: entry.user_agent.device_class.to_string(),
			is_bot: entry.user_agent.is_bot,
			user_agent: entry.user_agent.raw_string.clone(),
		}
	}
}

impl LogsTemplate {
	pub fn from_log(log: &AccessLog) -> Self {
		let users: Vec<UserLogView> = log
			.iter()
			.map(|(id, history)| UserLogView {
				id: id.clone(),
				entries: history.history.iter().map(EntryView::from).collect(),
			})
			.collect();
		let total_entries = users.iter().map(|u| u.entries.len()).sum();

		Self {
			users,
			total_entries,
		}
	}
}

/// Render `template`, or an empty page if rendering fails.
pub fn render<T: Template>(template: &T, name: &str) -> Html<String> {
	match template.render() {
		Ok(html) => Html(html),
		Err(e) => {
			warn!(error = %e, template = name, "failed to render template");
			Html(String::new())
		}
	}
}
