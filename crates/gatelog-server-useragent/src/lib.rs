// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! User-Agent classification for the access log.
//!
//! [`classify`] is a pure function: any input, including garbage, produces a
//! record. Unrecognised agents report `"Other"` families and [`DeviceClass::Other`].

mod rules;

use serde::{Deserialize, Serialize};
use std::fmt;

use rules::{ANDROID, BOT_HINT, BROWSER_RULES, CRAWLER, DESKTOP, IPAD, MOBILE, OS_RULES, TABLET};

/// Recorded when the request carried no User-Agent header.
pub const UNKNOWN_USER_AGENT: &str = "unknown";

const OTHER: &str = "Other";

/// Coarse device type. Exactly one class is assigned per agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceClass {
	Mobile,
	#[serde(rename = "PC")]
	Pc,
	Tablet,
	Other,
}

impl DeviceClass {
	/// Pick one class from independent detection flags, Mobile > PC > Tablet.
	pub fn from_flags(is_mobile: bool, is_pc: bool, is_tablet: bool) -> Self {
		if is_mobile {
			DeviceClass::Mobile
		} else if is_pc {
			DeviceClass::Pc
		} else if is_tablet {
			DeviceClass::Tablet
		} else {
			DeviceClass::Other
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			DeviceClass::Mobile => "Mobile",
			DeviceClass::Pc => "PC",
			DeviceClass::Tablet => "Tablet",
			DeviceClass::Other => "Other",
		}
	}
}

impl fmt::Display for DeviceClass {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAgentRecord {
	#[serde(rename = "raw")]
	pub raw_string: String,
	#[serde(rename = "os")]
	pub os_family: String,
	#[serde(rename = "browser")]
	pub browser_family: String,
	#[serde(rename = "device")]
	pub device_class: DeviceClass,
	pub is_bot: bool,
}

/// Classify an optional header value, substituting [`UNKNOWN_USER_AGENT`].
pub fn classify_header(header: Option<&str>) -> UserAgentRecord {
	classify(header.unwrap_or(UNKNOWN_USER_AGENT))
}

pub fn classify(raw: &str) -> UserAgentRecord {
	let crawler = CRAWLER.find(raw).map(|m| m.as_str());
	let is_bot = crawler.is_some() || BOT_HINT.is_match(raw);

	// Crawlers that spoof a phone or desktop are still not a device.
	let device_class = if is_bot {
		DeviceClass::Other
	} else {
		let is_ipad = IPAD.is_match(raw);
		let is_android = ANDROID.is_match(raw);
		let is_mobile = !is_ipad && MOBILE.is_match(raw);
		let is_tablet = TABLET.is_match(raw) || (is_android && !MOBILE.is_match(raw));
		let is_pc = !is_android && DESKTOP.is_match(raw);
		DeviceClass::from_flags(is_mobile, is_pc, is_tablet)
	};

	let os_family = OS_RULES
		.iter()
		.find(|(pattern, _)| pattern.is_match(raw))
		.map_or(OTHER, |(_, family)| *family);

	let browser_family = match crawler {
		Some(name) => name,
		None => browser_family(raw),
	};

	UserAgentRecord {
		raw_string: raw.to_string(),
		os_family: os_family.to_string(),
		browser_family: browser_family.to_string(),
		device_class,
		is_bot,
	}
}

fn browser_family(raw: &str) -> &'static str {
	let Some(rule) = BROWSER_RULES.iter().find(|r| r.pattern.is_match(raw)) else {
		return OTHER;
	};
	match rule.mobile_family {
		Some(mobile) if MOBILE.is_match(raw) => mobile,
		_ => rule.family,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const WIN_CHROME: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
	const MAC_SAFARI: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_4) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15";
	const IPHONE_SAFARI: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1";
	const IPAD_SAFARI: &str = "Mozilla/5.0 (iPad; CPU OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1";
	const ANDROID_CHROME: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Mobile Safari/537.36";
	const ANDROID_TABLET: &str = "Mozilla/5.0 (Linux; Android 13; SM-X710) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
	const SAMSUNG: &str = "Mozilla/5.0 (Linux; Android 14; SM-S918B) AppleWebKit/537.36 (KHTML, like Gecko) SamsungBrowser/24.0 Chrome/117.0.0.0 Mobile Safari/537.36";
	const LINUX_FIREFOX: &str = "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0";
	const WIN_EDGE: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 Edg/124.0.2478.51";
	const WIN_OPERA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 OPR/110.0.0.0";
	const IE11: &str = "Mozilla/5.0 (Windows NT 6.1; Trident/7.0; rv:11.0) like Gecko";
	const CHROMEBOOK: &str = "Mozilla/5.0 (X11; CrOS x86_64 14541.0.0) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
	const GOOGLEBOT: &str = "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";
	const GOOGLEBOT_MOBILE: &str = "Mozilla/5.0 (Linux; Android 6.0.1; Nexus 5X Build/MMB29P) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Mobile Safari/537.36 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";
	const DISCORDBOT: &str = "Mozilla/5.0 (compatible; Discordbot/2.0; +https://discordapp.com)";

	fn check(raw: &str, os: &str, browser: &str, device: DeviceClass) {
		let record = classify(raw);
		assert_eq!(record.os_family, os, "os for {raw}");
		assert_eq!(record.browser_family, browser, "browser for {raw}");
		assert_eq!(record.device_class, device, "device for {raw}");
	}

	#[test]
	fn desktop_browsers() {
		check(WIN_CHROME, "Windows", "Chrome", DeviceClass::Pc);
		check(MAC_SAFARI, "Mac OS X", "Safari", DeviceClass::Pc);
		check(LINUX_FIREFOX, "Linux", "Firefox", DeviceClass::Pc);
		check(WIN_EDGE, "Windows", "Edge", DeviceClass::Pc);
		check(WIN_OPERA, "Windows", "Opera", DeviceClass::Pc);
		check(IE11, "Windows", "IE", DeviceClass::Pc);
		check(CHROMEBOOK, "Chrome OS", "Chrome", DeviceClass::Pc);
	}

	#[test]
	fn handheld_browsers() {
		check(IPHONE_SAFARI, "iOS", "Mobile Safari", DeviceClass::Mobile);
		check(ANDROID_CHROME, "Android", "Chrome Mobile", DeviceClass::Mobile);
		check(SAMSUNG, "Android", "Samsung Internet", DeviceClass::Mobile);
	}

	#[test]
	fn tablets() {
		check(IPAD_SAFARI, "iOS", "Mobile Safari", DeviceClass::Tablet);
		check(ANDROID_TABLET, "Android", "Chrome", DeviceClass::Tablet);
	}

	#[test]
	fn crawlers_report_their_name() {
		let record = classify(GOOGLEBOT);
		assert!(record.is_bot);
		assert_eq!(record.browser_family, "Googlebot");
		assert_eq!(record.device_class, DeviceClass::Other);

		let record = classify(DISCORDBOT);
		assert!(record.is_bot);
		assert_eq!(record.browser_family, "Discordbot");
	}

	#[test]
	fn crawler_spoofing_phone_is_not_a_device() {
		let record = classify(GOOGLEBOT_MOBILE);
		assert!(record.is_bot);
		assert_eq!(record.os_family, "Android");
		assert_eq!(record.device_class, DeviceClass::Other);
	}

	#[test]
	fn generic_bot_hint_without_known_name() {
		let record = classify("acme-link-crawler/1.0");
		assert!(record.is_bot);
		assert_eq!(record.browser_family, "Other");
	}

	#[test]
	fn unknown_sentinel_is_generic() {
		let record = classify_header(None);
		assert_eq!(record.raw_string, UNKNOWN_USER_AGENT);
		assert_eq!(record.os_family, "Other");
		assert_eq!(record.browser_family, "Other");
		assert_eq!(record.device_class, DeviceClass::Other);
		assert!(!record.is_bot);
	}

	#[test]
	fn non_browser_clients_are_other() {
		check("curl/8.5.0", "Other", "Other", DeviceClass::Other);
		check("", "Other", "Other", DeviceClass::Other);
	}

	#[test]
	fn mobile_wins_over_tablet() {
		assert_eq!(DeviceClass::from_flags(true, false, true), DeviceClass::Mobile);
		assert_eq!(DeviceClass::from_flags(true, true, true), DeviceClass::Mobile);
	}

	#[test]
	fn pc_wins_over_tablet() {
		assert_eq!(DeviceClass::from_flags(false, true, true), DeviceClass::Pc);
		assert_eq!(DeviceClass::from_flags(false, false, true), DeviceClass::Tablet);
		assert_eq!(DeviceClass::from_flags(false, false, false), DeviceClass::Other);
	}

	#[test]
	fn windows_touch_tablet_counts_as_pc() {
		let raw = "Mozilla/5.0 (Windows NT 10.0; Win64; x64; Tablet PC 2.0) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
		check(raw, "Windows", "Chrome", DeviceClass::Pc);
	}

	#[test]
	fn record_serializes_with_log_keys() {
		let json = serde_json::to_value(classify(WIN_CHROME)).unwrap();
		assert_eq!(json["raw"], WIN_CHROME);
		assert_eq!(json["os"], "Windows");
		assert_eq!(json["browser"], "Chrome");
		assert_eq!(json["device"], "PC");
		assert_eq!(json["is_bot"], false);
	}

	#[test]
	fn device_class_round_trips_through_log_names() {
		for class in [
			DeviceClass::Mobile,
			DeviceClass::Pc,
			DeviceClass::Tablet,
			DeviceClass::Other,
		] {
			let json = serde_json::to_string(&class).unwrap();
			assert_eq!(json, format!("\"{class}\""));
			let back: DeviceClass = serde_json::from_str(&json).unwrap();
			assert_eq!(back, class);
		}
	}
}
