// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

/// Embed posted to the log channel for each recorded login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginNotice {
	pub title: String,
	pub description: String,
	pub thumbnail_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
	LoginRecorded(LoginNotice),
	/// Grant the configured member role to `user_id`.
	AssignRole { user_id: String },
}

impl Notification {
	pub fn kind(&self) -> &'static str {
		match self {
			Notification::LoginRecorded(_) => "login_recorded",
			Notification::AssignRole { .. } => "assign_role",
		}
	}
}
