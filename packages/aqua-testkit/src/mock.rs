use std::{
	future::IntoFuture,
	sync::{
		Arc, Mutex, MutexGuard,
		atomic::{AtomicUsize, Ordering},
	},
};

use axum::{
	Json, Router,
	extract::{Path, Query, Request, State},
	http::{HeaderMap, StatusCode, header::AUTHORIZATION},
	middleware::{self, Next},
	response::{IntoResponse, Response},
	routing,
};
use serde::Deserialize;
use serde_json::json;
use tokio::{
	net::TcpListener,
	sync::{oneshot, oneshot::Sender},
};

use crate::Result;
use aqua_domain::water::{RawWater, WaterDraft, format_passport_date};

pub const API_PREFIX: &str = "/api/v1";
pub const LOGIN_ACCESS_TOKEN: &str = "mock-access-token";
pub const LOGIN_REFRESH_TOKEN: &str = "mock-refresh-token";

const DEFAULT_LIMIT: u32 = 50;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
	pub method: String,
	pub path: String,
	pub query: Vec<(String, String)>,
	pub authorization: Option<String>,
}
impl RecordedRequest {
	pub fn query_param(&self, key: &str) -> Option<&str> {
		self.query.iter().find(|(name, _)| name == key).map(|(_, value)| value.as_str())
	}
}

#[derive(Default)]
struct MockState {
	records: Mutex<Vec<RawWater>>,
	access_token: Mutex<Option<String>>,
	refresh_token: Mutex<Option<String>>,
	credentials: Mutex<Option<(String, String)>>,
	refresh_count: AtomicUsize,
	requests: Mutex<Vec<RecordedRequest>>,
}

#[derive(Deserialize)]
struct ListParams {
	#[serde(default)]
	page: u32,
	#[serde(default = "default_limit")]
	limit: u32,
	search: Option<String>,
	region: Option<String>,
}

#[derive(Deserialize)]
struct LoginBody {
	email: String,
	password: String,
}

/// In-process stand-in for the remote water API, served on an ephemeral local port.
///
/// Routes live under [`API_PREFIX`]. Access is open until [`MockWaterApi::require_access_token`]
/// is called; from then on every non-auth route answers 401 unless the request carries the
/// expected bearer token.
pub struct MockWaterApi {
	origin: String,
	state: Arc<MockState>,
	shutdown: Option<Sender<()>>,
}
impl MockWaterApi {
	pub async fn start(records: Vec<RawWater>) -> Result<Self> {
		let state = Arc::new(MockState { records: Mutex::new(records), ..MockState::default() });
		let api = Router::new()
			.route("/waters", routing::get(list_waters).post(create_water))
			.route(
				"/waters/{id}",
				routing::get(get_water).patch(update_water).delete(delete_water),
			)
			.route("/auth/email/login", routing::post(login))
			.route("/auth/refresh", routing::post(refresh));
		let app = Router::new()
			.nest(API_PREFIX, api)
			.layer(middleware::from_fn_with_state(state.clone(), guard))
			.with_state(state.clone());
		let listener = TcpListener::bind("127.0.0.1:0").await?;
		let addr = listener.local_addr()?;
		let (tx, rx) = oneshot::channel();
		let server = axum::serve(listener, app).with_graceful_shutdown(async move {
			let _ = rx.await;
		});

		tokio::spawn(async move {
			let _ = server.into_future().await;
		});

		Ok(Self { origin: format!("http://{addr}"), state, shutdown: Some(tx) })
	}

	/// Base URL including the version prefix, as configured in `api.base_url`.
	pub fn base_url(&self) -> String {
		format!("{}{API_PREFIX}", self.origin)
	}

	pub fn require_access_token(&self, token: &str) {
		*lock(&self.state.access_token) = Some(token.to_string());
	}

	pub fn accept_refresh_token(&self, token: &str) {
		*lock(&self.state.refresh_token) = Some(token.to_string());
	}

	pub fn accept_login(&self, email: &str, password: &str) {
		*lock(&self.state.credentials) = Some((email.to_string(), password.to_string()));
	}

	pub fn refresh_count(&self) -> usize {
		self.state.refresh_count.load(Ordering::SeqCst)
	}

	pub fn requests(&self) -> Vec<RecordedRequest> {
		lock(&self.state.requests).clone()
	}

	/// Recorded requests whose path ends with `suffix`.
	pub fn requests_to(&self, suffix: &str) -> Vec<RecordedRequest> {
		lock(&self.state.requests)
			.iter()
			.filter(|request| request.path.ends_with(suffix))
			.cloned()
			.collect()
	}

	pub fn records(&self) -> Vec<RawWater> {
		lock(&self.state.records).clone()
	}
}
impl Drop for MockWaterApi {
	fn drop(&mut self) {
		if let Some(shutdown) = self.shutdown.take() {
			let _ = shutdown.send(());
		}
	}
}

async fn guard(State(state): State<Arc<MockState>>, request: Request, next: Next) -> Response {
	let path = request.uri().path().to_string();
	let authorization = request
		.headers()
		.get(AUTHORIZATION)
		.and_then(|value| value.to_str().ok())
		.map(str::to_string);
	let query = Query::<Vec<(String, String)>>::try_from_uri(request.uri())
		.map(|Query(query)| query)
		.unwrap_or_default();

	lock(&state.requests).push(RecordedRequest {
		method: request.method().to_string(),
		path: path.clone(),
		query,
		authorization: authorization.clone(),
	});

	let is_auth_route = path.ends_with("/auth/refresh") || path.ends_with("/auth/email/login");
	let expected = lock(&state.access_token).clone();

	if !is_auth_route
		&& let Some(expected) = expected
		&& authorization.as_deref() != Some(format!("Bearer {expected}").as_str())
	{
		return unauthorized();
	}

	next.run(request).await
}

async fn list_waters(
	State(state): State<Arc<MockState>>,
	Query(params): Query<ListParams>,
) -> Response {
	let records = lock(&state.records);
	let needle = params.search.as_deref().map(|search| search.trim().to_lowercase());
	let matching: Vec<&RawWater> = records
		.iter()
		.filter(|record| params.region.as_deref().is_none_or(|region| record.region == region))
		.filter(|record| {
			needle.as_deref().is_none_or(|needle| {
				record.name.to_lowercase().contains(needle)
					|| record.region.to_lowercase().contains(needle)
			})
		})
		.collect();
	let limit = params.limit.max(1) as usize;
	let start = (params.page as usize).saturating_mul(limit);
	let data: Vec<&RawWater> = matching.iter().skip(start).take(limit).copied().collect();
	let has_next_page = start + data.len() < matching.len();

	Json(json!({ "data": data, "hasNextPage": has_next_page })).into_response()
}

async fn get_water(State(state): State<Arc<MockState>>, Path(id): Path<i64>) -> Response {
	match lock(&state.records).iter().find(|record| record.id == id) {
		Some(record) => Json(record.clone()).into_response(),
		None => not_found(id),
	}
}

async fn create_water(
	State(state): State<Arc<MockState>>,
	Json(draft): Json<WaterDraft>,
) -> Response {
	let mut records = lock(&state.records);
	let id = records.iter().map(|record| record.id).max().unwrap_or(0) + 1;
	let Some(record) = raw_from_draft(id, draft) else {
		return (
			StatusCode::UNPROCESSABLE_ENTITY,
			Json(json!({ "message": "Incomplete water resource." })),
		)
			.into_response();
	};

	records.push(record.clone());

	(StatusCode::CREATED, Json(record)).into_response()
}

async fn update_water(
	State(state): State<Arc<MockState>>,
	Path(id): Path<i64>,
	Json(draft): Json<WaterDraft>,
) -> Response {
	let mut records = lock(&state.records);
	let Some(record) = records.iter_mut().find(|record| record.id == id) else {
		return not_found(id);
	};

	apply_draft(record, draft);

	Json(record.clone()).into_response()
}

async fn delete_water(State(state): State<Arc<MockState>>, Path(id): Path<i64>) -> Response {
	let mut records = lock(&state.records);
	let before = records.len();

	records.retain(|record| record.id != id);

	if records.len() == before {
		return not_found(id);
	}

	StatusCode::NO_CONTENT.into_response()
}

async fn login(State(state): State<Arc<MockState>>, Json(body): Json<LoginBody>) -> Response {
	let accepted = lock(&state.credentials)
		.as_ref()
		.is_none_or(|(email, password)| *email == body.email && *password == body.password);

	if !accepted {
		return (
			StatusCode::UNPROCESSABLE_ENTITY,
			Json(json!({ "message": "Invalid email or password." })),
		)
			.into_response();
	}

	*lock(&state.access_token) = Some(LOGIN_ACCESS_TOKEN.to_string());
	*lock(&state.refresh_token) = Some(LOGIN_REFRESH_TOKEN.to_string());

	Json(json!({
		"token": LOGIN_ACCESS_TOKEN,
		"refreshToken": LOGIN_REFRESH_TOKEN,
		"tokenExpires": 1_900_000_000_000_i64,
		"user": { "id": 1, "email": body.email },
	}))
	.into_response()
}

async fn refresh(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
	let presented = headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok());
	let expected = lock(&state.refresh_token).clone();
	let Some(expected) = expected else {
		return unauthorized();
	};

	if presented != Some(format!("Bearer {expected}").as_str()) {
		return unauthorized();
	}

	let ordinal = state.refresh_count.fetch_add(1, Ordering::SeqCst) + 1;
	let token = format!("refreshed-access-{ordinal}");

	*lock(&state.access_token) = Some(token.clone());

	Json(json!({ "accessToken": token })).into_response()
}

fn raw_from_draft(id: i64, draft: WaterDraft) -> Option<RawWater> {
	Some(RawWater {
		id,
		name: draft.name?,
		region: draft.region?,
		resource_type: draft.resource_type?.as_str().to_string(),
		water_type: draft.water_type?.as_str().to_string(),
		fauna: draft.fauna.unwrap_or(false),
		passport_date: format_passport_date(draft.passport_date?),
		technical_condition: draft.technical_condition?,
		latitude: draft.latitude?,
		longitude: draft.longitude?,
		pdf_url: draft.pdf_url,
		priority: None,
	})
}

fn apply_draft(record: &mut RawWater, draft: WaterDraft) {
	if let Some(name) = draft.name {
		record.name = name;
	}
	if let Some(region) = draft.region {
		record.region = region;
	}
	if let Some(resource_type) = draft.resource_type {
		record.resource_type = resource_type.as_str().to_string();
	}
	if let Some(water_type) = draft.water_type {
		record.water_type = water_type.as_str().to_string();
	}
	if let Some(fauna) = draft.fauna {
		record.fauna = fauna;
	}
	if let Some(passport_date) = draft.passport_date {
		record.passport_date = format_passport_date(passport_date);
	}
	if let Some(condition) = draft.technical_condition {
		record.technical_condition = condition;
	}
	if let Some(latitude) = draft.latitude {
		record.latitude = latitude;
	}
	if let Some(longitude) = draft.longitude {
		record.longitude = longitude;
	}
	if draft.pdf_url.is_some() {
		record.pdf_url = draft.pdf_url;
	}
}

fn unauthorized() -> Response {
	(StatusCode::UNAUTHORIZED, Json(json!({ "message": "Unauthorized" }))).into_response()
}

fn not_found(id: i64) -> Response {
	(StatusCode::NOT_FOUND, Json(json!({ "message": format!("Water resource {id} not found.") })))
		.into_response()
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
	mutex.lock().unwrap_or_else(|err| err.into_inner())
}

fn default_limit() -> u32 {
	DEFAULT_LIMIT
}
