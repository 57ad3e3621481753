pub mod priorities;
pub mod records;
pub mod snapshot;

mod error;

pub use aqua_client::WaterPage;
pub use error::{Error, Result};
pub use priorities::{MapPage, RecordDetail};
pub use snapshot::{Snapshot, SnapshotSlot};

use std::{future::Future, pin::Pin, sync::Arc};

use time::{Date, OffsetDateTime};

use aqua_client::WaterClient;
use aqua_config::Config;
use aqua_domain::{
	remote::RemoteQuery,
	water::{WaterDraft, WaterResource},
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Where records come from. [`WaterClient`] is the production implementation.
pub trait WaterSource
where
	Self: Send + Sync,
{
	fn list_page<'a>(&'a self, query: &'a RemoteQuery) -> BoxFuture<'a, Result<WaterPage>>;

	fn fetch_all<'a>(
		&'a self,
		query: &'a RemoteQuery,
	) -> BoxFuture<'a, Result<Vec<WaterResource>>>;

	fn get(&self, id: i64) -> BoxFuture<'_, Result<WaterResource>>;

	fn create<'a>(&'a self, draft: &'a WaterDraft) -> BoxFuture<'a, Result<WaterResource>>;

	fn update<'a>(
		&'a self,
		id: i64,
		draft: &'a WaterDraft,
	) -> BoxFuture<'a, Result<WaterResource>>;

	fn delete(&self, id: i64) -> BoxFuture<'_, Result<()>>;
}

/// Supplies "today" for scoring.
pub trait Clock
where
	Self: Send + Sync,
{
	fn today(&self) -> Date;
}

pub struct SystemClock;
impl Clock for SystemClock {
	fn today(&self) -> Date {
		OffsetDateTime::now_utc().date()
	}
}

pub struct FixedClock(pub Date);
impl Clock for FixedClock {
	fn today(&self) -> Date {
		self.0
	}
}

pub struct PriorityService {
	pub source: Arc<dyn WaterSource>,
	pub clock: Arc<dyn Clock>,
	pub snapshots: SnapshotSlot,
	/// Page size of the full snapshot fetch.
	pub fetch_limit: u32,
	/// Page size of server-side map pages.
	pub page_size: u32,
}
impl PriorityService {
	pub fn new(cfg: &Config, source: Arc<dyn WaterSource>, clock: Arc<dyn Clock>) -> Self {
		Self {
			source,
			clock,
			snapshots: SnapshotSlot::default(),
			fetch_limit: cfg.priorities.fetch_limit,
			page_size: cfg.api.page_size,
		}
	}

	pub fn from_client(cfg: &Config, client: WaterClient) -> Self {
		Self::new(cfg, Arc::new(client), Arc::new(SystemClock))
	}
}

impl WaterSource for WaterClient {
	fn list_page<'a>(&'a self, query: &'a RemoteQuery) -> BoxFuture<'a, Result<WaterPage>> {
		Box::pin(async move { Ok(WaterClient::list_page(self, query).await?) })
	}

	fn fetch_all<'a>(
		&'a self,
		query: &'a RemoteQuery,
	) -> BoxFuture<'a, Result<Vec<WaterResource>>> {
		Box::pin(async move { Ok(WaterClient::fetch_all(self, query).await?) })
	}

	fn get(&self, id: i64) -> BoxFuture<'_, Result<WaterResource>> {
		Box::pin(async move { Ok(WaterClient::get(self, id).await?) })
	}

	fn create<'a>(&'a self, draft: &'a WaterDraft) -> BoxFuture<'a, Result<WaterResource>> {
		Box::pin(async move { Ok(WaterClient::create(self, draft).await?) })
	}

	fn update<'a>(
		&'a self,
		id: i64,
		draft: &'a WaterDraft,
	) -> BoxFuture<'a, Result<WaterResource>> {
		Box::pin(async move { Ok(WaterClient::update(self, id, draft).await?) })
	}

	fn delete(&self, id: i64) -> BoxFuture<'_, Result<()>> {
		Box::pin(async move { Ok(WaterClient::delete(self, id).await?) })
	}
}
