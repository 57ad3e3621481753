use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use time::Date;

use crate::{
	ordering::sort_scored,
	predicate::{FilterImpact, build_predicate},
	priority::{PriorityTier, ScoredResource},
	query::QueryState,
	water::WaterResource,
};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct TierCounts {
	pub high: usize,
	pub medium: usize,
	pub low: usize,
	pub total: usize,
}
impl TierCounts {
	pub fn of(items: &[ScoredResource]) -> Self {
		let mut counts = Self::default();

		for item in items {
			match item.priority_tier {
				PriorityTier::High => counts.high += 1,
				PriorityTier::Medium => counts.medium += 1,
				PriorityTier::Low => counts.low += 1,
			}
		}

		counts.total = items.len();

		counts
	}
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PriorityBoard {
	#[serde(with = "crate::date_serde")]
	pub reference_date: Date,
	pub items: Vec<ScoredResource>,
	pub stats: TierCounts,
	pub impact: FilterImpact,
}

/// Scores every record against `reference`, keeps the ones matching `state`, orders them
/// and counts tiers over the visible set.
pub fn evaluate(snapshot: &[WaterResource], state: &QueryState, reference: Date) -> PriorityBoard {
	let predicate = build_predicate(state);
	let mut dropped_reason_counts: HashMap<&'static str, usize> = HashMap::new();
	let mut items = Vec::with_capacity(snapshot.len());

	for resource in snapshot {
		let scored = ScoredResource::new(resource.clone(), reference);

		match predicate.evaluate(&scored) {
			(true, _) => items.push(scored),
			(false, reason) => {
				*dropped_reason_counts.entry(reason.unwrap_or("unknown")).or_insert(0) += 1;
			},
		}
	}

	sort_scored(&mut items, state.sort);

	let stats = TierCounts::of(&items);
	let impact = FilterImpact::from_counts(snapshot.len(), items.len(), dropped_reason_counts);

	PriorityBoard { reference_date: reference, items, stats, impact }
}

/// Sorted distinct regions of the whole snapshot, ignoring blanks.
pub fn regions(snapshot: &[WaterResource]) -> Vec<String> {
	snapshot
		.iter()
		.map(|resource| resource.region.trim())
		.filter(|region| !region.is_empty())
		.map(str::to_string)
		.collect::<BTreeSet<_>>()
		.into_iter()
		.collect()
}

#[cfg(test)]
mod tests {
	use time::macros::date;

	use crate::{
		board::{TierCounts, evaluate, regions},
		query::QueryState,
		water::{ResourceType, WaterResource, WaterType},
	};

	fn water(id: i64, region: &str, condition: i32) -> WaterResource {
		WaterResource {
			id,
			name: format!("Water {id}"),
			region: region.to_string(),
			resource_type: ResourceType::Reservoir,
			water_type: WaterType::Fresh,
			has_fauna: false,
			passport_date: date!(2020 - 01 - 01),
			technical_condition: condition,
			latitude: 43.0,
			longitude: 77.0,
			pdf_url: None,
		}
	}

	#[test]
	fn reports_drop_reasons_by_count() {
		let snapshot = vec![water(1, "Almaty", 5), water(2, "Almaty", 1), water(3, "Aktobe", 1)];
		let state = QueryState {
			region: Some("Almaty".to_string()),
			technical_condition: Some(5),
			..QueryState::default()
		};
		let board = evaluate(&snapshot, &state, date!(2026 - 10 - 19));

		assert_eq!(board.items.len(), 1);
		assert_eq!(board.impact.candidate_count_pre, 3);
		assert_eq!(board.impact.candidate_count_post, 1);
		assert_eq!(board.impact.dropped_total, 2);

		let reasons: Vec<_> = board
			.impact
			.top_drop_reasons
			.iter()
			.map(|reason| (reason.reason.as_str(), reason.count))
			.collect();

		assert_eq!(reasons, vec![("eq:region", 1), ("eq:technical_condition", 1)]);
	}

	#[test]
	fn empty_snapshot_yields_empty_board() {
		let board = evaluate(&[], &QueryState::default(), date!(2026 - 10 - 19));

		assert!(board.items.is_empty());
		assert_eq!(board.stats, TierCounts::default());
		assert!(board.impact.top_drop_reasons.is_empty());
	}

	#[test]
	fn regions_are_sorted_and_distinct() {
		let snapshot = vec![water(1, "Zhambyl", 3), water(2, "Almaty", 3), water(3, "Zhambyl", 3)];

		assert_eq!(regions(&snapshot), vec!["Almaty".to_string(), "Zhambyl".to_string()]);
	}
}
