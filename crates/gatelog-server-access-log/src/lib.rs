// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Append-only login history, stored as one pretty-printed JSON document.
//!
//! The document maps each identity id to `{"history": [...]}`. Entries are
//! only ever appended; the file is rewritten in full on every append through a
//! sibling `.json.tmp` file and an atomic rename.

pub mod entry;
pub mod error;
pub mod store;

pub use entry::{AccessLog, LogEntry, LoggedIdentity, LoginRecord, UserHistory, TIMESTAMP_FORMAT};
pub use error::{AccessLogError, Result};
pub use store::AccessLogStore;
