use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result, WaterClient, auth_headers};

const LOGIN_PATH: &str = "/auth/email/login";
const REFRESH_PATH: &str = "/auth/refresh";

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
	pub token: String,
	#[serde(default)]
	pub refresh_token: Option<String>,
	/// Expiry as sent by the server, in epoch milliseconds.
	#[serde(default)]
	pub token_expires: Option<i64>,
	#[serde(default)]
	pub user: Value,
}

impl WaterClient {
	/// Exchanges credentials for tokens and keeps them for subsequent calls.
	pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
		let body = serde_json::json!({ "email": email, "password": password });
		let res = self
			.http
			.post(self.url(LOGIN_PATH))
			.headers(auth_headers(None, &self.default_headers)?)
			.json(&body)
			.send()
			.await?;
		let json: Value = res.error_for_status()?.json().await?;
		let login: LoginResponse = serde_json::from_value(json)?;

		self.set_tokens(Some(login.token.clone()), login.refresh_token.clone());

		tracing::info!(email, "Logged in.");

		Ok(login)
	}

	pub async fn refresh(&self) -> Result<String> {
		let _gate = self.refresh_gate.lock().await;

		self.request_new_access_token().await
	}

	/// Callers hold the refresh gate.
	pub(crate) async fn request_new_access_token(&self) -> Result<String> {
		let refresh_token = self.refresh_token();
		let res = self
			.http
			.post(self.url(REFRESH_PATH))
			.headers(auth_headers(refresh_token.as_deref(), &self.default_headers)?)
			.send()
			.await?;

		if res.status() == StatusCode::UNAUTHORIZED {
			return Err(Error::Unauthorized {
				message: "The token refresh was rejected.".to_string(),
			});
		}

		let json: Value = res.error_for_status()?.json().await?;
		let (access, rotated) = parse_refresh_response(&json)?;

		self.set_access_token(access.clone());

		if let Some(rotated) = rotated {
			self.set_refresh_token(rotated);
		}

		tracing::info!("Access token refreshed.");

		Ok(access)
	}
}

/// Returns the new access token and, when the server rotated it, the new refresh token.
fn parse_refresh_response(json: &Value) -> Result<(String, Option<String>)> {
	let access = ["accessToken", "token"]
		.iter()
		.find_map(|key| json.get(key).and_then(Value::as_str))
		.filter(|token| !token.trim().is_empty())
		.ok_or_else(|| Error::InvalidResponse {
			message: "Refresh response is missing accessToken.".to_string(),
		})?;
	let rotated = json
		.get("refreshToken")
		.and_then(Value::as_str)
		.filter(|token| !token.trim().is_empty())
		.map(str::to_string);

	Ok((access.to_string(), rotated))
}

#[cfg(test)]
mod tests {
	use crate::auth::parse_refresh_response;

	#[test]
	fn reads_access_token_or_token() {
		let (access, rotated) =
			parse_refresh_response(&serde_json::json!({ "accessToken": "a1" })).expect("parse");

		assert_eq!(access, "a1");
		assert_eq!(rotated, None);

		let (access, rotated) = parse_refresh_response(
			&serde_json::json!({ "token": "a2", "refreshToken": "r2" }),
		)
		.expect("parse");

		assert_eq!(access, "a2");
		assert_eq!(rotated.as_deref(), Some("r2"));
	}

	#[test]
	fn rejects_missing_or_blank_token() {
		assert!(parse_refresh_response(&serde_json::json!({})).is_err());
		assert!(parse_refresh_response(&serde_json::json!({ "accessToken": " " })).is_err());
	}
}
