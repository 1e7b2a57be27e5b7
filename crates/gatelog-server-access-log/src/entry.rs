// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Records stored in the access log document.

use gatelog_server_geoip::GeoRecord;
use gatelog_server_useragent::UserAgentRecord;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// strftime pattern for [`LogEntry::timestamp`], in server local time.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The whole document: identity id to history, in first-login order.
pub type AccessLog = IndexMap<String, UserHistory>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserHistory {
	pub history: Vec<LogEntry>,
}

/// Identity snapshot taken at login time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedIdentity {
	pub username: String,
	pub discriminator: String,
	pub id: String,
	pub email: Option<String>,
	pub avatar_url: String,
}

/// Everything known about a login before the store stamps it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRecord {
	pub identity: LoggedIdentity,
	pub geo: GeoRecord,
	pub user_agent: UserAgentRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
	#[serde(rename = "discord")]
	pub identity: LoggedIdentity,
	#[serde(rename = "ip_info")]
	pub geo: GeoRecord,
	pub user_agent: UserAgentRecord,
	pub timestamp: String,
}

impl LoginRecord {
	pub fn stamp(self, timestamp: String) -> LogEntry {
		LogEntry {
			identity: self.identity,
			geo: self.geo,
			user_agent: self.user_agent,
			timestamp,
		}
	}
}
