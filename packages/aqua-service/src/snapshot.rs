use std::sync::{
	Arc, Mutex, MutexGuard,
	atomic::{AtomicU64, Ordering},
};

use time::Date;

use crate::{Error, Result};
use aqua_domain::water::WaterResource;

/// One completed fetch, held read-only until the next one replaces it.
#[derive(Debug)]
pub struct Snapshot {
	pub ticket: u64,
	pub fetched_on: Date,
	pub records: Vec<WaterResource>,
}

/// Holds the most recent snapshot. Every fetch takes a ticket before it starts; a finished
/// fetch is installed only while its ticket is still the latest one issued.
#[derive(Debug, Default)]
pub struct SnapshotSlot {
	issued: AtomicU64,
	installed: Mutex<Option<Arc<Snapshot>>>,
}
impl SnapshotSlot {
	pub fn issue(&self) -> u64 {
		self.issued.fetch_add(1, Ordering::SeqCst) + 1
	}

	pub fn latest_ticket(&self) -> u64 {
		self.issued.load(Ordering::SeqCst)
	}

	pub fn install(
		&self,
		ticket: u64,
		fetched_on: Date,
		records: Vec<WaterResource>,
	) -> Result<Arc<Snapshot>> {
		let mut installed = self.lock();
		let latest = self.latest_ticket();
		let newer = installed.as_ref().is_none_or(|current| ticket > current.ticket);

		if ticket != latest || !newer {
			tracing::warn!(ticket, latest, "Discarding a superseded snapshot.");

			return Err(Error::StaleSnapshot);
		}

		let snapshot = Arc::new(Snapshot { ticket, fetched_on, records });

		*installed = Some(snapshot.clone());

		tracing::debug!(ticket, records = snapshot.records.len(), "Installed snapshot.");

		Ok(snapshot)
	}

	pub fn current(&self) -> Option<Arc<Snapshot>> {
		self.lock().clone()
	}

	fn lock(&self) -> MutexGuard<'_, Option<Arc<Snapshot>>> {
		self.installed.lock().unwrap_or_else(|err| err.into_inner())
	}
}
