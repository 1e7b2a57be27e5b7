// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Ordered pattern tables. The first matching rule wins.

use regex::Regex;
use std::sync::LazyLock;

fn compile(pattern: &str) -> Regex {
	Regex::new(pattern).expect("user agent patterns are static and valid")
}

pub(crate) static CRAWLER: LazyLock<Regex> = LazyLock::new(|| {
	compile(
		r"(?i)(Googlebot|bingbot|YandexBot|DuckDuckBot|Baiduspider|Applebot|facebookexternalhit|Twitterbot|Slackbot|Discordbot|AhrefsBot|SemrushBot|Bytespider|GPTBot)",
	)
});

pub(crate) static BOT_HINT: LazyLock<Regex> =
	LazyLock::new(|| compile(r"(?i)(bot\b|bot/|crawler|spider|slurp|preview|headlesschrome)"));

pub(crate) static OS_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
	[
		(r"Windows Phone", "Windows Phone"),
		(r"iPhone|iPad|iPod", "iOS"),
		(r"Android", "Android"),
		(r"CrOS", "Chrome OS"),
		(r"Windows", "Windows"),
		(r"Mac OS X|Macintosh", "Mac OS X"),
		(r"Linux|X11", "Linux"),
	]
	.into_iter()
	.map(|(pattern, family)| (compile(pattern), family))
	.collect()
});

pub(crate) struct BrowserRule {
	pub pattern: Regex,
	pub family: &'static str,
	/// Family reported on handheld devices, when it differs.
	pub mobile_family: Option<&'static str>,
}

pub(crate) static BROWSER_RULES: LazyLock<Vec<BrowserRule>> = LazyLock::new(|| {
	[
		(r"Edg(e|A|iOS)?/", "Edge", None),
		(r"OPR/|Opera", "Opera", None),
		(r"SamsungBrowser/", "Samsung Internet", None),
		(r"Firefox/|FxiOS/", "Firefox", None),
		(r"Chrome/|CriOS/", "Chrome", Some("Chrome Mobile")),
		(r"Version/[\d.]+.*Safari/", "Safari", Some("Mobile Safari")),
		(r"(iPhone|iPad|iPod).*AppleWebKit", "Safari", Some("Mobile Safari")),
		(r"MSIE |Trident/", "IE", None),
	]
	.into_iter()
	.map(|(pattern, family, mobile_family)| BrowserRule {
		pattern: compile(pattern),
		family,
		mobile_family,
	})
	.collect()
});

pub(crate) static IPAD: LazyLock<Regex> = LazyLock::new(|| compile(r"iPad"));

pub(crate) static ANDROID: LazyLock<Regex> = LazyLock::new(|| compile(r"Android"));

pub(crate) static MOBILE: LazyLock<Regex> = LazyLock::new(|| {
	compile(r"iPhone|iPod|Windows Phone|BlackBerry|BB10|Opera Mini|IEMobile|Mobi")
});

pub(crate) static TABLET: LazyLock<Regex> =
	LazyLock::new(|| compile(r"iPad|Tablet|Kindle|Silk/|PlayBook"));

pub(crate) static DESKTOP: LazyLock<Regex> =
	LazyLock::new(|| compile(r"Windows NT|Macintosh|CrOS|X11|Linux x86_64|Linux i686"));
