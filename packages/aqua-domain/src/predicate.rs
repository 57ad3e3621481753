use std::{cmp::Ordering, collections::HashMap};

use serde::Serialize;
use time::Date;

use crate::{
	priority::{PriorityTier, ScoredResource},
	query::QueryState,
	water::{ResourceType, WaterType},
};

const MAX_DROP_REASONS: usize = 5;

#[derive(Clone, Debug, PartialEq)]
enum Clause {
	Search(String),
	Region(String),
	ResourceType(ResourceType),
	WaterType(WaterType),
	Fauna(bool),
	Condition(i32),
	Tier(PriorityTier),
	PassportFrom(Date),
	PassportTo(Date),
	ConditionFrom(i32),
	ConditionTo(i32),
}
impl Clause {
	fn label(&self) -> &'static str {
		match self {
			Self::Search(_) => "search",
			Self::Region(_) => "eq:region",
			Self::ResourceType(_) => "eq:resource_type",
			Self::WaterType(_) => "eq:water_type",
			Self::Fauna(_) => "eq:fauna",
			Self::Condition(_) => "eq:technical_condition",
			Self::Tier(_) => "eq:priority",
			Self::PassportFrom(_) => "gte:passport_date",
			Self::PassportTo(_) => "lte:passport_date",
			Self::ConditionFrom(_) => "gte:technical_condition",
			Self::ConditionTo(_) => "lte:technical_condition",
		}
	}

	fn matches(&self, item: &ScoredResource) -> bool {
		let resource = &item.resource;

		match self {
			Self::Search(needle) =>
				resource.name.to_lowercase().contains(needle.as_str())
					|| resource.region.to_lowercase().contains(needle.as_str()),
			Self::Region(region) => resource.region == *region,
			Self::ResourceType(value) => resource.resource_type == *value,
			Self::WaterType(value) => resource.water_type == *value,
			Self::Fauna(value) => resource.has_fauna == *value,
			Self::Condition(value) => resource.technical_condition == *value,
			Self::Tier(value) => item.priority_tier == *value,
			Self::PassportFrom(from) => resource.passport_date >= *from,
			Self::PassportTo(to) => resource.passport_date <= *to,
			Self::ConditionFrom(from) => resource.technical_condition >= *from,
			Self::ConditionTo(to) => resource.technical_condition <= *to,
		}
	}
}

/// Conjunction of the active clauses of a [`QueryState`]. An empty predicate matches
/// everything.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Predicate {
	clauses: Vec<Clause>,
}
impl Predicate {
	pub fn is_empty(&self) -> bool {
		self.clauses.is_empty()
	}

	pub fn len(&self) -> usize {
		self.clauses.len()
	}

	pub fn matches(&self, item: &ScoredResource) -> bool {
		self.clauses.iter().all(|clause| clause.matches(item))
	}

	/// Like [`Predicate::matches`], also naming the first clause that rejected the item.
	pub fn evaluate(&self, item: &ScoredResource) -> (bool, Option<&'static str>) {
		match self.clauses.iter().find(|clause| !clause.matches(item)) {
			Some(clause) => (false, Some(clause.label())),
			None => (true, None),
		}
	}
}

pub fn build_predicate(state: &QueryState) -> Predicate {
	let mut clauses = Vec::new();

	if let Some(search) = state.search_text() {
		clauses.push(Clause::Search(search.to_lowercase()));
	}
	if let Some(region) = state.region_filter() {
		clauses.push(Clause::Region(region.to_string()));
	}
	if let Some(value) = state.resource_type {
		clauses.push(Clause::ResourceType(value));
	}
	if let Some(value) = state.water_type {
		clauses.push(Clause::WaterType(value));
	}
	if let Some(value) = state.fauna {
		clauses.push(Clause::Fauna(value));
	}
	if let Some(value) = state.technical_condition {
		clauses.push(Clause::Condition(value));
	}
	if let Some(value) = state.priority_tier {
		clauses.push(Clause::Tier(value));
	}
	if let Some(from) = state.passport_date_from {
		clauses.push(Clause::PassportFrom(from));
	}
	if let Some(to) = state.passport_date_to {
		clauses.push(Clause::PassportTo(to));
	}
	if let Some(from) = state.technical_condition_from {
		clauses.push(Clause::ConditionFrom(from));
	}
	if let Some(to) = state.technical_condition_to {
		clauses.push(Clause::ConditionTo(to));
	}

	Predicate { clauses }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct FilterImpact {
	pub candidate_count_pre: usize,
	pub candidate_count_post: usize,
	pub dropped_total: usize,
	pub top_drop_reasons: Vec<FilterDropReason>,
}
impl FilterImpact {
	pub(crate) fn from_counts(
		pre: usize,
		post: usize,
		dropped_reason_counts: HashMap<&'static str, usize>,
	) -> Self {
		let mut top_drop_reasons: Vec<_> = dropped_reason_counts
			.into_iter()
			.map(|(reason, count)| FilterDropReason { reason: reason.to_string(), count })
			.collect();

		top_drop_reasons.sort_by(|a, b| match b.count.cmp(&a.count) {
			Ordering::Equal => a.reason.cmp(&b.reason),
			other => other,
		});
		top_drop_reasons.truncate(MAX_DROP_REASONS);

		Self {
			candidate_count_pre: pre,
			candidate_count_post: post,
			dropped_total: pre.saturating_sub(post),
			top_drop_reasons,
		}
	}
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FilterDropReason {
	pub reason: String,
	pub count: usize,
}
