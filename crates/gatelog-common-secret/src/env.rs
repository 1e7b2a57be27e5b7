// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Loading secrets from the environment with the `VAR` / `VAR_FILE` convention.

use std::path::PathBuf;
use std::{env, fs};

use thiserror::Error;

use crate::SecretString;

#[derive(Debug, Error)]
pub enum SecretEnvError {
	#[error("failed to read secret file at {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("secret file path in {var} is empty")]
	EmptyPath { var: String },
}

/// Load a secret from `{var}_FILE` (a path, one trailing newline stripped) or,
/// failing that, from `{var}` itself. Empty values count as unset.
pub fn load_secret_env(var: &str) -> Result<Option<SecretString>, SecretEnvError> {
	let file_var = format!("{var}_FILE");

	if let Ok(path_str) = env::var(&file_var) {
		if path_str.is_empty() {
			return Err(SecretEnvError::EmptyPath { var: file_var });
		}

		let path = PathBuf::from(&path_str);
		let content = fs::read_to_string(&path).map_err(|e| SecretEnvError::Io {
			path: path.clone(),
			source: e,
		})?;

		let secret = content.strip_suffix('\n').unwrap_or(&content).to_string();
		return Ok(Some(SecretString::new(secret)));
	}

	match env::var(var) {
		Ok(value) if !value.is_empty() => Ok(Some(SecretString::new(value))),
		_ => Ok(None),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	// Each test owns a unique variable name so they can run in parallel.

	#[test]
	fn reads_direct_value() {
		env::set_var("GATELOG_TEST_SECRET_DIRECT", "direct-value");
		let secret = load_secret_env("GATELOG_TEST_SECRET_DIRECT").unwrap();
		assert_eq!(secret.unwrap().expose(), "direct-value");
		env::remove_var("GATELOG_TEST_SECRET_DIRECT");
	}

	#[test]
	fn file_takes_precedence_and_strips_newline() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("token");
		let mut file = fs::File::create(&path).unwrap();
		writeln!(file, "from-file").unwrap();

		env::set_var("GATELOG_TEST_SECRET_BOTH", "from-env");
		env::set_var("GATELOG_TEST_SECRET_BOTH_FILE", path.to_str().unwrap());
		let secret = load_secret_env("GATELOG_TEST_SECRET_BOTH").unwrap();
		assert_eq!(secret.unwrap().expose(), "from-file");
		env::remove_var("GATELOG_TEST_SECRET_BOTH");
		env::remove_var("GATELOG_TEST_SECRET_BOTH_FILE");
	}

	#[test]
	fn missing_is_none() {
		assert!(load_secret_env("GATELOG_TEST_SECRET_NEVER_SET")
			.unwrap()
			.is_none());
	}

	#[test]
	fn empty_file_path_is_error() {
		env::set_var("GATELOG_TEST_SECRET_EMPTY_PATH_FILE", "");
		let result = load_secret_env("GATELOG_TEST_SECRET_EMPTY_PATH");
		assert!(matches!(result, Err(SecretEnvError::EmptyPath { .. })));
		env::remove_var("GATELOG_TEST_SECRET_EMPTY_PATH_FILE");
	}

	#[test]
	fn unreadable_file_is_error() {
		env::set_var(
			"GATELOG_TEST_SECRET_MISSING_FILE_FILE",
			"/nonexistent/gatelog/secret",
		);
		let result = load_secret_env("GATELOG_TEST_SECRET_MISSING_FILE");
		assert!(matches!(result, Err(SecretEnvError::Io { .. })));
		env::remove_var("GATELOG_TEST_SECRET_MISSING_FILE_FILE");
	}
}
