use time::{Date, macros::date};

use aqua_domain::{
	board::{self, PriorityBoard},
	ordering::{SortDirection, SortField, SortState},
	priority::{self, PriorityTier},
	query::QueryState,
	water::{ResourceType, WaterResource, WaterType},
};

const TODAY: Date = date!(2026 - 10 - 19);

fn water(id: i64, name: &str, region: &str, condition: i32, passport: Date) -> WaterResource {
	WaterResource {
		id,
		name: name.to_string(),
		region: region.to_string(),
		resource_type: ResourceType::Lake,
		water_type: WaterType::Fresh,
		has_fauna: false,
		passport_date: passport,
		technical_condition: condition,
		latitude: 45.0,
		longitude: 75.0,
		pdf_url: None,
	}
}

fn years_before(reference: Date, years: i32) -> Date {
	reference.replace_year(reference.year() - years).expect("reference date is not Feb 29")
}

fn snapshot() -> Vec<WaterResource> {
	vec![
		water(1, "Lake Balkhash", "Karaganda", 2, date!(2010 - 05 - 01)),
		water(2, "Windermere", "Lake District", 4, date!(2022 - 01 - 15)),
		water(3, "Kapchagay", "Almaty", 5, date!(2026 - 01 - 01)),
		water(4, "Big Almaty Lake", "Almaty", 1, date!(2016 - 10 - 19)),
		water(5, "Sorbulak", "Almaty", 3, date!(2019 - 07 - 30)),
		water(6, "Irtysh Channel", "Pavlodar", 3, date!(2000 - 03 - 12)),
	]
}

fn ids(board: &PriorityBoard) -> Vec<i64> {
	board.items.iter().map(|item| item.resource.id).collect()
}

#[test]
fn score_follows_formula_for_nominal_conditions() {
	for condition in 1..=5 {
		for age in 0..=30 {
			let resource = water(1, "w", "r", condition, years_before(TODAY, age));
			let expected = i64::from((6 - condition) * 3 + age);

			assert_eq!(priority::score(&resource, TODAY), expected, "condition {condition}, age {age}");
		}
	}
}

#[test]
fn classifier_is_monotonic() {
	for score in -20..60 {
		assert!(priority::classify(score) <= priority::classify(score + 1), "score {score}");
	}
}

#[test]
fn worst_condition_new_passport_is_low() {
	let resource = water(1, "w", "r", 5, TODAY);
	let breakdown = priority::explain(&resource, TODAY);

	assert_eq!(breakdown.score, 3);
	assert_eq!(breakdown.tier, PriorityTier::Low);
	assert_eq!(breakdown.to_string(), "(6 - 5) × 3 + 0 = 3");
}

#[test]
fn best_condition_old_passport_is_high() {
	let resource = water(1, "w", "r", 1, years_before(TODAY, 10));
	let breakdown = priority::explain(&resource, TODAY);

	assert_eq!(breakdown.condition_points, 15);
	assert_eq!(breakdown.age_years, 10);
	assert_eq!(breakdown.score, 25);
	assert_eq!(breakdown.tier, PriorityTier::High);
}

#[test]
fn out_of_range_condition_is_scored_as_is() {
	let resource = water(1, "w", "r", 0, TODAY);

	assert_eq!(priority::score(&resource, TODAY), 18);

	let resource = water(1, "w", "r", 8, TODAY);

	assert_eq!(priority::score(&resource, TODAY), -6);
}

#[test]
fn search_matches_name_or_region() {
	let state = QueryState { search: "lake".to_string(), ..QueryState::default() };
	let mut found = ids(&board::evaluate(&snapshot(), &state, TODAY));

	found.sort_unstable();

	assert_eq!(found, vec![1, 2, 4]);
}

#[test]
fn region_and_fauna_combine_with_and() {
	let mut records = snapshot();

	records[2].has_fauna = true;
	records[5].has_fauna = true;

	let state = QueryState {
		region: Some("Almaty".to_string()),
		fauna: Some(true),
		..QueryState::default()
	};

	assert_eq!(ids(&board::evaluate(&records, &state, TODAY)), vec![3]);
}

#[test]
fn filtering_is_idempotent() {
	let state = QueryState {
		search: "a".to_string(),
		technical_condition_from: Some(2),
		..QueryState::default()
	};
	let once = board::evaluate(&snapshot(), &state, TODAY);
	let survivors: Vec<_> = once.items.iter().map(|item| item.resource.clone()).collect();
	let twice = board::evaluate(&survivors, &state, TODAY);

	assert_eq!(ids(&once), ids(&twice));
	assert_eq!(once.stats, twice.stats);
}

#[test]
fn ascending_reverses_descending_without_ties() {
	for field in [SortField::Name, SortField::PassportDate, SortField::TechnicalCondition] {
		let mut records = snapshot();

		// Distinct conditions so the comparison has no ties.
		for (index, record) in records.iter_mut().enumerate() {
			record.technical_condition = index as i32;
		}

		let desc = QueryState {
			sort: SortState::new(field, SortDirection::Descending),
			..QueryState::default()
		};
		let asc = QueryState {
			sort: SortState::new(field, SortDirection::Ascending),
			..QueryState::default()
		};
		let mut reversed = ids(&board::evaluate(&records, &desc, TODAY));

		reversed.reverse();

		assert_eq!(reversed, ids(&board::evaluate(&records, &asc, TODAY)), "field {field}");
	}
}

#[test]
fn tier_counts_sum_to_visible_items() {
	let states = [
		QueryState::default(),
		QueryState { region: Some("Almaty".to_string()), ..QueryState::default() },
		QueryState { priority_tier: Some(PriorityTier::High), ..QueryState::default() },
		QueryState { search: "nothing matches".to_string(), ..QueryState::default() },
	];

	for state in states {
		let board = board::evaluate(&snapshot(), &state, TODAY);
		let stats = board.stats;

		assert_eq!(stats.high + stats.medium + stats.low, stats.total);
		assert_eq!(stats.total, board.items.len());
	}
}

#[test]
fn default_sort_is_priority_descending() {
	let board = board::evaluate(&snapshot(), &QueryState::default(), TODAY);
	let scores: Vec<_> = board.items.iter().map(|item| item.priority_score).collect();
	let mut expected = scores.clone();

	expected.sort_unstable_by(|a, b| b.cmp(a));

	assert_eq!(scores, expected);
	assert_eq!(board.items[0].resource.id, 6);
}

#[test]
fn equal_keys_keep_snapshot_order() {
	let records = vec![
		water(10, "a", "Same", 3, date!(2020 - 01 - 01)),
		water(11, "b", "Same", 3, date!(2020 - 01 - 01)),
		water(12, "c", "Same", 3, date!(2020 - 01 - 01)),
	];

	for direction in [SortDirection::Ascending, SortDirection::Descending] {
		let state = QueryState {
			sort: SortState::new(SortField::PriorityScore, direction),
			..QueryState::default()
		};

		assert_eq!(ids(&board::evaluate(&records, &state, TODAY)), vec![10, 11, 12]);
	}
}

#[test]
fn tier_filter_uses_computed_tier() {
	let state = QueryState { priority_tier: Some(PriorityTier::Low), ..QueryState::default() };
	let board = board::evaluate(&snapshot(), &state, TODAY);

	assert_eq!(ids(&board), vec![3]);
	assert_eq!(board.stats.low, 1);
	assert_eq!(board.impact.top_drop_reasons[0].reason, "eq:priority");
	assert_eq!(board.impact.top_drop_reasons[0].count, 5);
}

#[test]
fn regions_list_comes_from_full_snapshot() {
	assert_eq!(
		board::regions(&snapshot()),
		vec!["Almaty", "Karaganda", "Lake District", "Pavlodar"]
	);
}
