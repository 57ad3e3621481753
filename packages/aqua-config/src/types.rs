use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub api: Api,
	#[serde(default)]
	pub auth: Auth,
	#[serde(default)]
	pub priorities: Priorities,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

/// Remote water-resource API.
#[derive(Debug, Deserialize)]
pub struct Api {
	/// Base URL including the version prefix, e.g. "https://host/api/v1".
	pub base_url: String,
	pub timeout_ms: u64,
	/// Page size used by list requests; the map page of the web client used 50.
	#[serde(default = "default_page_size")]
	pub page_size: u32,
	/// Upper bound on pages walked by a full fetch.
	#[serde(default = "default_max_pages")]
	pub max_pages: u32,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct Auth {
	/// Optional. Blank values are treated as absent.
	pub access_token: Option<String>,
	/// Sent as the bearer credential of `/auth/refresh`. Blank values are treated as absent.
	pub refresh_token: Option<String>,
	#[serde(default = "default_true")]
	pub refresh_on_unauthorized: bool,
}
impl Default for Auth {
	fn default() -> Self {
		Self { access_token: None, refresh_token: None, refresh_on_unauthorized: true }
	}
}

#[derive(Debug, Deserialize)]
pub struct Priorities {
	/// Page size for the full snapshot behind the priorities table.
	#[serde(default = "default_fetch_limit")]
	pub fetch_limit: u32,
}
impl Default for Priorities {
	fn default() -> Self {
		Self { fetch_limit: default_fetch_limit() }
	}
}

fn default_page_size() -> u32 {
	50
}

fn default_max_pages() -> u32 {
	100
}

fn default_fetch_limit() -> u32 {
	1_000
}

fn default_true() -> bool {
	true
}
