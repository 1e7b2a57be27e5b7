// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Client address extraction.
//!
//! The caller's address is the first `X-Forwarded-For` entry when present,
//! otherwise the TCP peer address. The peer address is only known when the
//! router is served with `into_make_service_with_connect_info::<SocketAddr>()`.

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use axum::{
	extract::{ConnectInfo, FromRequestParts},
	http::{request::Parts, HeaderMap},
};

/// Addresses known for the current request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientAddr {
	pub forwarded_for: Option<String>,
	pub peer: Option<IpAddr>,
}

impl ClientAddr {
	pub fn from_parts(headers: &HeaderMap, peer: Option<IpAddr>) -> Self {
		Self {
			forwarded_for: extract_forwarded_for(headers),
			peer,
		}
	}

	/// Forwarded-for first, else the connection address.
	pub fn resolved(&self) -> Option<String> {
		self
			.forwarded_for
			.clone()
			.or_else(|| self.peer.map(|ip| ip.to_string()))
	}
}

impl<S> FromRequestParts<S> for ClientAddr
where
	S: Send + Sync,
{
	type Rejection = Infallible;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		let peer = parts
			.extensions
			.get::<ConnectInfo<SocketAddr>>()
			.map(|ConnectInfo(addr)| addr.ip());
		Ok(Self::from_parts(&parts.headers, peer))
	}
}

/// First entry of `X-Forwarded-For`, trimmed.
fn extract_forwarded_for(headers: &HeaderMap) -> Option<String> {
	headers
		.get("x-forwarded-for")?
		.to_str()
		.ok()?
		.split(',')
		.next()
		.map(str::trim)
		.filter(|ip| !ip.is_empty())
		.map(str::to_string)
}

/// Whether `ip` cannot be geolocated: private, loopback, link-local or
/// unspecified. Unparseable input is not considered private.
pub fn is_private_ip(ip: &str) -> bool {
	match ip.trim().parse::<IpAddr>() {
		Ok(IpAddr::V4(v4)) => {
			v4.is_private() || v4.is_loopback() || v4.is_link_local() || v4.is_unspecified()
		}
		Ok(IpAddr::V6(v6)) => {
			if let Some(v4) = v6.to_ipv4_mapped() {
				return is_private_ip(&v4.to_string());
			}
			let first = v6.segments()[0];
			v6.is_loopback()
				|| v6.is_unspecified()
				|| (first & 0xfe00) == 0xfc00
				|| (first & 0xffc0) == 0xfe80
		}
		Err(_) => false,
	}
}
