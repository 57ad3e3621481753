use reqwest::{Method, Response, StatusCode};
use serde_json::Value;

use crate::{Error, Result, WaterClient};
use aqua_domain::{
	remote::RemoteQuery,
	water::{RawWater, WaterDraft, WaterResource},
};

const WATERS_PATH: &str = "/waters";

/// One page of validated records.
#[derive(Clone, Debug, PartialEq)]
pub struct WaterPage {
	pub records: Vec<WaterResource>,
	pub has_next_page: bool,
}

impl WaterClient {
	pub async fn list_page(&self, query: &RemoteQuery) -> Result<WaterPage> {
		let params = query.to_params();
		let res = self.send(Method::GET, WATERS_PATH, |request| request.query(&params)).await?;
		let json: Value = res.error_for_status()?.json().await?;
		let page = parse_page_response(json)?;

		tracing::debug!(
			page = query.page,
			limit = query.limit,
			records = page.records.len(),
			has_next_page = page.has_next_page,
			"Fetched water page."
		);

		Ok(page)
	}

	/// Walks pages from 0 until the server reports no next page or `max_pages` is reached.
	pub async fn fetch_all(&self, query: &RemoteQuery) -> Result<Vec<WaterResource>> {
		let mut query = query.clone();
		let mut records = Vec::new();

		for page in 0..self.max_pages {
			query.page = page;

			let batch = self.list_page(&query).await?;

			records.extend(batch.records);

			if !batch.has_next_page {
				return Ok(records);
			}
		}

		tracing::warn!(
			max_pages = self.max_pages,
			records = records.len(),
			"Stopped paging at the configured page cap."
		);

		Ok(records)
	}

	pub async fn get(&self, id: i64) -> Result<WaterResource> {
		let res = self.send(Method::GET, &water_path(id), |request| request).await?;
		let json: Value = found(res, id)?.json().await?;

		parse_record(json)
	}

	pub async fn create(&self, draft: &WaterDraft) -> Result<WaterResource> {
		let missing = draft.missing_for_create();

		if !missing.is_empty() {
			return Err(Error::IncompleteDraft { missing: missing.join(", ") });
		}

		let res = self.send(Method::POST, WATERS_PATH, |request| request.json(draft)).await?;
		let json: Value = res.error_for_status()?.json().await?;
		let created = parse_record(json)?;

		tracing::info!(id = created.id, "Created water resource.");

		Ok(created)
	}

	pub async fn update(&self, id: i64, draft: &WaterDraft) -> Result<WaterResource> {
		let res = self.send(Method::PATCH, &water_path(id), |request| request.json(draft)).await?;
		let json: Value = found(res, id)?.json().await?;
		let updated = parse_record(json)?;

		tracing::info!(id, "Updated water resource.");

		Ok(updated)
	}

	pub async fn delete(&self, id: i64) -> Result<()> {
		let res = self.send(Method::DELETE, &water_path(id), |request| request).await?;

		found(res, id)?;

		tracing::info!(id, "Deleted water resource.");

		Ok(())
	}
}

fn water_path(id: i64) -> String {
	format!("{WATERS_PATH}/{id}")
}

fn found(res: Response, id: i64) -> Result<Response> {
	if res.status() == StatusCode::NOT_FOUND {
		return Err(Error::NotFound { id });
	}

	Ok(res.error_for_status()?)
}

fn parse_page_response(json: Value) -> Result<WaterPage> {
	let Value::Object(mut body) = json else {
		return Err(Error::InvalidResponse {
			message: "Water list response must be a JSON object.".to_string(),
		});
	};
	let data = body.remove("data").ok_or_else(|| Error::InvalidResponse {
		message: "Water list response is missing data array.".to_string(),
	})?;
	let has_next_page = body.get("hasNextPage").and_then(Value::as_bool).unwrap_or(false);
	let raw: Vec<RawWater> = serde_json::from_value(data)?;
	let records = raw.into_iter().map(validate_record).collect::<Result<Vec<_>>>()?;

	Ok(WaterPage { records, has_next_page })
}

fn parse_record(json: Value) -> Result<WaterResource> {
	let raw: RawWater = serde_json::from_value(json)?;

	validate_record(raw)
}

fn validate_record(raw: RawWater) -> Result<WaterResource> {
	let id = raw.id;

	WaterResource::try_from(raw).map_err(|source| Error::Record { id, source })
}
