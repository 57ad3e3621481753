use crate::{PriorityService, Result};
use aqua_domain::water::{WaterDraft, WaterResource};

impl PriorityService {
	pub async fn create(&self, draft: &WaterDraft) -> Result<WaterResource> {
		self.source.create(draft).await
	}

	pub async fn update(&self, id: i64, draft: &WaterDraft) -> Result<WaterResource> {
		self.source.update(id, draft).await
	}

	pub async fn delete(&self, id: i64) -> Result<()> {
		self.source.delete(id).await
	}
}
