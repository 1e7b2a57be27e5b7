// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::entry::{AccessLog, LogEntry, LoginRecord, TIMESTAMP_FORMAT};
use crate::error::{AccessLogError, Result};

/// File-backed access log.
///
/// All appends through one store are serialized, so concurrent logins cannot
/// overwrite each other's entries. Run one store per file.
pub struct AccessLogStore {
	path: PathBuf,
	write_lock: Mutex<()>,
}

impl AccessLogStore {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		let path = path.into();
		info!(path = %path.display(), "access log store initialized");
		Self {
			path,
			write_lock: Mutex::new(()),
		}
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	fn io_error(&self, source: std::io::Error) -> AccessLogError {
		AccessLogError::Io {
			path: self.path.clone(),
			source,
		}
	}

	/// Read the whole document. A missing file is an empty log.
	pub async fn load(&self) -> Result<AccessLog> {
		let contents = match tokio::fs::read(&self.path).await {
			Ok(contents) => contents,
			Err(e) if e.kind() == ErrorKind::NotFound => {
				debug!(path = %self.path.display(), "access log not found, starting empty");
				return Ok(AccessLog::new());
			}
			Err(e) => return Err(self.io_error(e)),
		};

		serde_json::from_slice(&contents).map_err(|source| AccessLogError::Corrupt {
			path: self.path.clone(),
			source,
		})
	}

	/// Stamp `record` with the current local time and append it to the history
	/// of `identity_id`. Returns the stored entry.
	pub async fn append(&self, identity_id: &str, record: LoginRecord) -> Result<LogEntry> {
		let _guard = self.write_lock.lock().await;

		let mut log = self.load().await?;
		let entry = record.stamp(chrono::Local::now().format(TIMESTAMP_FORMAT).to_string());

		let history = &mut log.entry(identity_id.to_string()).or_default().history;
		history.push(entry.clone());
		let count = history.len();

		self.save(&log).await?;

		debug!(
			path = %self.path.display(),
			identities = log.len(),
			entries_for_identity = count,
			"appended access log entry"
		);

		Ok(entry)
	}

	async fn save(&self, log: &AccessLog) -> Result<()> {
		if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
			tokio::fs::create_dir_all(parent)
				.await
				.map_err(|e| self.io_error(e))?;
		}

		let tmp_path = self.path.with_extension("json.tmp");
		let json = to_pretty_json(log)?;

		tokio::fs::write(&tmp_path, &json)
			.await
			.map_err(|e| self.io_error(e))?;
		tokio::fs::rename(&tmp_path, &self.path)
			.await
			.map_err(|e| self.io_error(e))?;

		Ok(())
	}
}

/// Four-space indented JSON with non-ASCII text left unescaped.
fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
	let mut buf = Vec::new();
	let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
	let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
	value
		.serialize(&mut serializer)
		.map_err(AccessLogError::Encode)?;
	Ok(buf)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::entry::LoggedIdentity;
	use gatelog_server_geoip::GeoRecord;
	use gatelog_server_useragent::classify;
	use tempfile::TempDir;

	fn record(id: &str, username: &str) -> LoginRecord {
		LoginRecord {
			identity: LoggedIdentity {
				username: username.to_string(),
				discriminator: "0".to_string(),
				id: id.to_string(),
				email: None,
				avatar_url: "https://cdn.discordapp.com/embed/avatars/0.png".to_string(),
			},
			geo: GeoRecord::unknown("203.0.113.9"),
			user_agent: classify("curl/8.5.0"),
		}
	}

	fn create_test_store() -> (AccessLogStore, TempDir) {
		let tmp = TempDir::new().unwrap();
		let store = AccessLogStore::new(tmp.path().join("access_log.json"));
		(store, tmp)
	}

	#[tokio::test]
	async fn missing_file_loads_empty() {
		let (store, _tmp) = create_test_store();
		assert!(store.load().await.unwrap().is_empty());
		assert!(!store.path().exists());
	}

	#[tokio::test]
	async fn append_creates_file_and_history() {
		let (store, _tmp) = create_test_store();
		let entry = store.append("1", record("1", "alice")).await.unwrap();

		let log = store.load().await.unwrap();
		assert_eq!(log.len(), 1);
		assert_eq!(log["1"].history, vec![entry]);
	}

	#[tokio::test]
	async fn timestamp_uses_local_format() {
		let (store, _tmp) = create_test_store();
		let entry = store.append("1", record("1", "alice")).await.unwrap();
		assert!(
			chrono::NaiveDateTime::parse_from_str(&entry.timestamp, TIMESTAMP_FORMAT).is_ok(),
			"unexpected timestamp {}",
			entry.timestamp
		);
	}

	#[tokio::test]
	async fn identities_keep_first_login_order() {
		let (store, _tmp) = create_test_store();
		for id in ["30", "10", "20", "10"] {
			store.append(id, record(id, "u")).await.unwrap();
		}

		let log = store.load().await.unwrap();
		let keys: Vec<&str> = log.keys().map(String::as_str).collect();
		assert_eq!(keys, vec!["30", "10", "20"]);
		assert_eq!(log["10"].history.len(), 2);
	}

	#[tokio::test]
	async fn file_uses_four_space_indent_and_raw_unicode() {
		let (store, _tmp) = create_test_store();
		store.append("1", record("1", "ユーザー")).await.unwrap();

		let text = std::fs::read_to_string(store.path()).unwrap();
		assert!(text.starts_with("{\n    \"1\": {\n        \"history\": ["));
		assert!(text.contains("ユーザー"));
		assert!(!text.contains("\\u"));
		assert!(text.contains("\"ip_info\""));
		assert!(text.contains("\"discord\""));
	}

	#[tokio::test]
	async fn corrupt_file_is_error_and_left_untouched() {
		let (store, _tmp) = create_test_store();
		std::fs::write(store.path(), b"{ not json").unwrap();

		let err = store.append("1", record("1", "alice")).await.unwrap_err();
		assert!(matches!(err, AccessLogError::Corrupt { .. }));
		assert_eq!(std::fs::read(store.path()).unwrap(), b"{ not json");
	}

	#[tokio::test]
	async fn no_temp_file_left_behind() {
		let (store, tmp) = create_test_store();
		store.append("1", record("1", "alice")).await.unwrap();

		let names: Vec<String> = std::fs::read_dir(tmp.path())
			.unwrap()
			.map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
			.collect();
		assert_eq!(names, vec!["access_log.json".to_string()]);
	}

	#[tokio::test]
	async fn creates_missing_parent_directories() {
		let tmp = TempDir::new().unwrap();
		let store = AccessLogStore::new(tmp.path().join("nested/dir/log.json"));
		store.append("1", record("1", "alice")).await.unwrap();
		assert!(store.path().exists());
	}

	#[test]
	fn pretty_json_keeps_non_ascii() {
		let bytes = to_pretty_json(&serde_json::json!({"k": "東京"})).unwrap();
		assert_eq!(String::from_utf8(bytes).unwrap(), "{\n    \"k\": \"東京\"\n}");
	}
}
