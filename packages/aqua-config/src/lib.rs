mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Api, Auth, Config, Priorities, Service};

use std::{fs, path::Path};

pub const MAX_PAGE_SIZE: u32 = 1_000;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::invalid("service.log_level", "must be non-empty."));
	}

	let base_url = cfg.api.base_url.trim();

	if base_url.is_empty() {
		return Err(Error::invalid("api.base_url", "must be non-empty."));
	}
	if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
		return Err(Error::invalid("api.base_url", "must start with http:// or https://."));
	}
	if cfg.api.timeout_ms == 0 {
		return Err(Error::invalid("api.timeout_ms", "must be greater than zero."));
	}
	if cfg.api.page_size == 0 || cfg.api.page_size > MAX_PAGE_SIZE {
		return Err(Error::invalid(
			"api.page_size",
			format!("must be in the range 1-{MAX_PAGE_SIZE}."),
		));
	}
	if cfg.api.max_pages == 0 {
		return Err(Error::invalid("api.max_pages", "must be greater than zero."));
	}

	for (key, value) in &cfg.api.default_headers {
		if !value.is_string() {
			return Err(Error::invalid(format!("api.default_headers.{key}"), "must be a string."));
		}
	}

	if cfg.priorities.fetch_limit == 0 || cfg.priorities.fetch_limit > MAX_PAGE_SIZE {
		return Err(Error::invalid(
			"priorities.fetch_limit",
			format!("must be in the range 1-{MAX_PAGE_SIZE}."),
		));
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	for token in [&mut cfg.auth.access_token, &mut cfg.auth.refresh_token] {
		if token.as_deref().map(|token| token.trim().is_empty()).unwrap_or(false) {
			*token = None;
		}
	}

	let trimmed = cfg.api.base_url.trim().trim_end_matches('/');

	if trimmed.len() != cfg.api.base_url.len() {
		cfg.api.base_url = trimmed.to_string();
	}
}
