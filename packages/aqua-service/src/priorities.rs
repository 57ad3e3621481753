use std::sync::Arc;

use serde::Serialize;

use crate::{Error, PriorityService, Result, Snapshot};
use aqua_domain::{
	board::{self, PriorityBoard},
	priority::{self, ScoreBreakdown, ScoredResource},
	query::QueryState,
	remote::RemoteQuery,
};

/// One server-side page with the local engine re-applied to its records.
#[derive(Clone, Debug, Serialize)]
pub struct MapPage {
	pub page: u32,
	pub has_next_page: bool,
	pub board: PriorityBoard,
}

#[derive(Clone, Debug, Serialize)]
pub struct RecordDetail {
	pub item: ScoredResource,
	pub breakdown: ScoreBreakdown,
}

impl PriorityService {
	/// Fetches every record into a new snapshot. A fetch overtaken by a later one returns
	/// [`Error::StaleSnapshot`] and leaves the newer snapshot in place.
	pub async fn refresh(&self) -> Result<Arc<Snapshot>> {
		let ticket = self.snapshots.issue();
		let query = RemoteQuery::page(0, self.fetch_limit);
		let records = self.source.fetch_all(&query).await?;

		tracing::info!(ticket, records = records.len(), "Fetched water resources.");

		self.snapshots.install(ticket, self.clock.today(), records)
	}

	/// Evaluates `state` against the installed snapshot.
	pub fn board(&self, state: &QueryState) -> Result<PriorityBoard> {
		let snapshot = self.snapshots.current().ok_or(Error::NoSnapshot)?;

		Ok(board::evaluate(&snapshot.records, state, self.clock.today()))
	}

	pub async fn priorities(&self, state: &QueryState) -> Result<PriorityBoard> {
		self.refresh().await?;

		self.board(state)
	}

	/// Filter options for the region selector, from the installed snapshot.
	pub fn regions(&self) -> Result<Vec<String>> {
		let snapshot = self.snapshots.current().ok_or(Error::NoSnapshot)?;

		Ok(board::regions(&snapshot.records))
	}

	pub async fn map_page(&self, state: &QueryState, page: u32) -> Result<MapPage> {
		let query = RemoteQuery::from_state(state, page, self.page_size);
		let fetched = self.source.list_page(&query).await?;
		let board = board::evaluate(&fetched.records, state, self.clock.today());

		tracing::debug!(
			page,
			fetched = fetched.records.len(),
			visible = board.items.len(),
			"Evaluated map page."
		);

		Ok(MapPage { page, has_next_page: fetched.has_next_page, board })
	}

	pub async fn detail(&self, id: i64) -> Result<RecordDetail> {
		let resource = self.source.get(id).await?;
		let today = self.clock.today();
		let breakdown = priority::explain(&resource, today);

		Ok(RecordDetail { item: ScoredResource::new(resource, today), breakdown })
	}
}
