pub mod auth;
pub mod waters;

mod error;

pub use auth::LoginResponse;
pub use error::{Error, Result};
pub use waters::WaterPage;

use std::{
	sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
	time::Duration,
};

use reqwest::{
	Client, Method, RequestBuilder, Response, StatusCode,
	header::{AUTHORIZATION, HeaderMap, HeaderName},
};
use serde_json::{Map, Value};
use tokio::sync::Mutex;

#[derive(Clone, Debug, Default)]
struct Tokens {
	access: Option<String>,
	refresh: Option<String>,
}

/// Typed client for the remote water-resource API.
///
/// Requests carry `Authorization: Bearer <access token>` once a token is known. A 401 on any
/// call other than the refresh call triggers one token refresh and one retry; concurrent
/// callers that hit a 401 together share a single refresh.
pub struct WaterClient {
	http: Client,
	base_url: String,
	default_headers: Map<String, Value>,
	page_size: u32,
	max_pages: u32,
	refresh_on_unauthorized: bool,
	tokens: RwLock<Tokens>,
	refresh_gate: Mutex<()>,
}
impl WaterClient {
	pub fn new(cfg: &aqua_config::Config) -> Result<Self> {
		let http = Client::builder().timeout(Duration::from_millis(cfg.api.timeout_ms)).build()?;

		// Default headers are validated once, up front.
		auth_headers(None, &cfg.api.default_headers)?;

		Ok(Self {
			http,
			base_url: cfg.api.base_url.trim_end_matches('/').to_string(),
			default_headers: cfg.api.default_headers.clone(),
			page_size: cfg.api.page_size,
			max_pages: cfg.api.max_pages,
			refresh_on_unauthorized: cfg.auth.refresh_on_unauthorized,
			tokens: RwLock::new(Tokens {
				access: cfg.auth.access_token.clone(),
				refresh: cfg.auth.refresh_token.clone(),
			}),
			refresh_gate: Mutex::new(()),
		})
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	pub fn page_size(&self) -> u32 {
		self.page_size
	}

	pub fn max_pages(&self) -> u32 {
		self.max_pages
	}

	pub fn access_token(&self) -> Option<String> {
		self.read_tokens().access.clone()
	}

	pub fn refresh_token(&self) -> Option<String> {
		self.read_tokens().refresh.clone()
	}

	pub fn set_tokens(&self, access: Option<String>, refresh: Option<String>) {
		*self.write_tokens() = Tokens { access, refresh };
	}

	fn set_access_token(&self, access: String) {
		self.write_tokens().access = Some(access);
	}

	fn set_refresh_token(&self, refresh: String) {
		self.write_tokens().refresh = Some(refresh);
	}

	fn read_tokens(&self) -> RwLockReadGuard<'_, Tokens> {
		self.tokens.read().unwrap_or_else(|err| err.into_inner())
	}

	fn write_tokens(&self) -> RwLockWriteGuard<'_, Tokens> {
		self.tokens.write().unwrap_or_else(|err| err.into_inner())
	}

	fn url(&self, path: &str) -> String {
		format!("{}{path}", self.base_url)
	}

	/// Sends an authorized request, refreshing the access token and retrying once on 401.
	async fn send(
		&self,
		method: Method,
		path: &str,
		build: impl Fn(RequestBuilder) -> RequestBuilder,
	) -> Result<Response> {
		let url = self.url(path);
		let token = self.access_token();
		let res = self.dispatch(&method, &url, token.as_deref(), &build).await?;

		if res.status() != StatusCode::UNAUTHORIZED {
			return Ok(res);
		}
		if !self.refresh_on_unauthorized {
			return Err(Error::Unauthorized { message: format!("{method} {path} was rejected.") });
		}

		tracing::warn!(%method, path, "Request was unauthorized. Refreshing the access token.");

		let fresh = self.refresh_after(token.as_deref()).await?;
		let res = self.dispatch(&method, &url, Some(&fresh), &build).await?;

		if res.status() == StatusCode::UNAUTHORIZED {
			return Err(Error::Unauthorized {
				message: format!("{method} {path} was rejected after a token refresh."),
			});
		}

		Ok(res)
	}

	async fn dispatch(
		&self,
		method: &Method,
		url: &str,
		token: Option<&str>,
		build: &impl Fn(RequestBuilder) -> RequestBuilder,
	) -> Result<Response> {
		let request =
			self.http.request(method.clone(), url).headers(auth_headers(token, &self.default_headers)?);

		Ok(build(request).send().await?)
	}

	/// Refreshes unless another caller already replaced the `stale` token while this one
	/// waited for the gate.
	async fn refresh_after(&self, stale: Option<&str>) -> Result<String> {
		let _gate = self.refresh_gate.lock().await;

		if let Some(current) = self.access_token()
			&& Some(current.as_str()) != stale
		{
			return Ok(current);
		}

		self.request_new_access_token().await
	}
}

pub fn auth_headers(token: Option<&str>, default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	if let Some(token) = token {
		headers.insert(AUTHORIZATION, format!("Bearer {token}").parse()?);
	}

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: "Default header values must be strings.".to_string(),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}
