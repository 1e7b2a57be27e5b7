// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Redacting wrapper for OAuth client secrets, bot tokens and access tokens.
//!
//! [`Secret<T>`] keeps credentials out of logs, config dumps and error messages:
//!
//! - `Debug` and `Display` print `[REDACTED]`
//! - `Serialize` writes `"[REDACTED]"`
//! - the inner value is zeroized on drop
//! - reading the value requires an explicit [`Secret::expose`]
//!
//! ```
//! use gatelog_common_secret::SecretString;
//!
//! let token = SecretString::new("bot-token".to_string());
//! assert_eq!(format!("{token}"), "[REDACTED]");
//! assert_eq!(token.expose(), "bot-token");
//! ```

pub mod env;

use std::fmt;
use zeroize::Zeroize;

pub use env::{load_secret_env, SecretEnvError};

/// Placeholder printed in place of any secret value.
pub const REDACTED: &str = "[REDACTED]";

/// A value that must never be printed.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct Secret<T>
where
	T: Zeroize,
{
	inner: T,
}

/// The common case: a secret string such as a bot token.
pub type SecretString = Secret<String>;

impl<T> Secret<T>
where
	T: Zeroize,
{
	pub fn new(inner: T) -> Self {
		Self { inner }
	}

	/// Borrow the wrapped value. Call sites opt in to seeing the secret.
	pub fn expose(&self) -> &T {
		&self.inner
	}
}

impl SecretString {
	/// True when the wrapped string is empty or only whitespace.
	pub fn is_blank(&self) -> bool {
		self.inner.trim().is_empty()
	}
}

impl<T> Clone for Secret<T>
where
	T: Zeroize + Clone,
{
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}

impl<T> fmt::Debug for Secret<T>
where
	T: Zeroize,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Secret").field(&REDACTED).finish()
	}
}

impl<T> fmt::Display for Secret<T>
where
	T: Zeroize,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl<T> PartialEq for Secret<T>
where
	T: Zeroize + PartialEq,
{
	fn eq(&self, other: &Self) -> bool {
		self.inner == other.inner
	}
}

impl<T> Eq for Secret<T> where T: Zeroize + Eq {}

impl From<String> for SecretString {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}

#[cfg(feature = "serde")]
mod serde_impl {
	use super::{Secret, REDACTED};
	use serde::{Deserialize, Deserializer, Serialize, Serializer};
	use zeroize::Zeroize;

	impl<T> Serialize for Secret<T>
	where
		T: Serialize + Zeroize,
	{
		fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
		where
			S: Serializer,
		{
			serializer.serialize_str(REDACTED)
		}
	}

	impl<'de, T> Deserialize<'de> for Secret<T>
	where
		T: Deserialize<'de> + Zeroize,
	{
		fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
		where
			D: Deserializer<'de>,
		{
			T::deserialize(deserializer).map(Secret::new)
		}
	}
}


#[cfg(test)]
mod proptests {
	use super::*;
	use proptest::prelude::*;

	proptest! {
		#[test]
		fn formatted_output_never_contains_value(value in "[a-zA-Z0-9._-]{12,64}") {
			let secret = SecretString::new(value.clone());
			let debug_output = format!("{secret:?}");
			let display_output = format!("{secret}");
			prop_assert!(!debug_output.contains(&value));
			prop_assert!(!display_output.contains(&value));
		}
	}
}
