use std::fmt::Write as _;

use aqua_domain::{
	board::{PriorityBoard, TierCounts},
	predicate::FilterImpact,
	priority::ScoredResource,
	water::{WaterResource, format_passport_date},
};
use aqua_service::{MapPage, RecordDetail};

const HEADERS: [&str; 10] =
	["ID", "NAME", "REGION", "TYPE", "WATER", "FAUNA", "COND", "PASSPORT", "SCORE", "TIER"];

pub fn board(board: &PriorityBoard, limit: Option<usize>) -> String {
	let shown = limit.unwrap_or(board.items.len()).min(board.items.len());
	let mut out = table(&board.items[..shown]);

	if shown < board.items.len() {
		let _ = writeln!(out, "... {} more not shown.", board.items.len() - shown);
	}

	out.push_str(&stats_line(&board.stats));

	if let Some(line) = impact_line(&board.impact) {
		out.push_str(&line);
	}

	let _ = writeln!(out, "Scored as of {}.", format_passport_date(board.reference_date));

	out
}

pub fn map_page(page: &MapPage) -> String {
	let mut out = board(&page.board, None);
	let next = if page.has_next_page { "more pages follow" } else { "last page" };

	let _ = writeln!(out, "Page {} ({next}).", page.page);

	out
}

pub fn detail(detail: &RecordDetail) -> String {
	let resource = &detail.item.resource;
	let mut out = String::new();
	let _ = writeln!(out, "#{} {}", resource.id, resource.name);
	let _ = writeln!(out, "  region:              {}", resource.region);
	let _ = writeln!(out, "  resource type:       {}", resource.resource_type);
	let _ = writeln!(out, "  water type:          {}", resource.water_type);
	let _ = writeln!(out, "  fauna:               {}", yes_no(resource.has_fauna));
	let _ = writeln!(out, "  passport date:       {}", format_passport_date(resource.passport_date));
	let _ = writeln!(out, "  technical condition: {}", condition(resource));
	let _ = writeln!(out, "  coordinates:         {}, {}", resource.latitude, resource.longitude);

	if let Some(pdf_url) = &resource.pdf_url {
		let _ = writeln!(out, "  passport document:   {pdf_url}");
	}

	let _ = writeln!(out, "  priority:            {} ({})", detail.breakdown.score, detail.breakdown.tier);
	let _ = writeln!(out, "  score breakdown:     {}", detail.breakdown);

	out
}

pub fn regions(regions: &[String]) -> String {
	regions.iter().fold(String::new(), |mut out, region| {
		let _ = writeln!(out, "{region}");

		out
	})
}

pub fn resource(resource: &WaterResource) -> String {
	format!(
		"#{} {} ({}, {}), condition {}, passport {}\n",
		resource.id,
		resource.name,
		resource.region,
		resource.resource_type,
		condition(resource),
		format_passport_date(resource.passport_date)
	)
}

fn table(items: &[ScoredResource]) -> String {
	let rows: Vec<[String; 10]> = items.iter().map(row).collect();
	let mut widths = HEADERS.map(|header| header.chars().count());

	for row in &rows {
		for (width, cell) in widths.iter_mut().zip(row) {
			*width = (*width).max(cell.chars().count());
		}
	}

	let mut out = String::new();

	push_row(&mut out, &HEADERS.map(str::to_string), &widths);

	for row in &rows {
		push_row(&mut out, row, &widths);
	}

	out
}

fn row(item: &ScoredResource) -> [String; 10] {
	let resource = &item.resource;

	[
		resource.id.to_string(),
		resource.name.clone(),
		resource.region.clone(),
		resource.resource_type.to_string(),
		resource.water_type.to_string(),
		yes_no(resource.has_fauna).to_string(),
		condition(resource),
		format_passport_date(resource.passport_date),
		item.priority_score.to_string(),
		item.priority_tier.to_string(),
	]
}

fn push_row(out: &mut String, cells: &[String; 10], widths: &[usize; 10]) {
	let line = cells
		.iter()
		.zip(widths)
		.map(|(cell, width)| format!("{cell:<width$}"))
		.collect::<Vec<_>>()
		.join("  ");

	out.push_str(line.trim_end());
	out.push('\n');
}

fn stats_line(stats: &TierCounts) -> String {
	format!(
		"Total: {}  High: {}  Medium: {}  Low: {}\n",
		stats.total, stats.high, stats.medium, stats.low
	)
}

fn impact_line(impact: &FilterImpact) -> Option<String> {
	if impact.dropped_total == 0 {
		return None;
	}

	let reasons = impact
		.top_drop_reasons
		.iter()
		.map(|reason| format!("{} {}", reason.reason, reason.count))
		.collect::<Vec<_>>()
		.join(", ");

	Some(format!(
		"Filtered out {} of {} ({reasons}).\n",
		impact.dropped_total, impact.candidate_count_pre
	))
}

fn condition(resource: &WaterResource) -> String {
	if resource.condition_in_range() {
		resource.technical_condition.to_string()
	} else {
		format!("{}?", resource.technical_condition)
	}
}

fn yes_no(value: bool) -> &'static str {
	if value { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
	use aqua_domain::{board, query::QueryState};
	use aqua_testkit::{REFERENCE_DATE, WaterBuilder};

	use crate::render;

	#[test]
	fn board_table_lists_rows_and_stats() {
		let snapshot = vec![
			WaterBuilder::new(1).name("Lake Balkhash").condition(1).aged(10).build(),
			WaterBuilder::new(2).name("Kapchagay").condition(5).build(),
		];
		let state = QueryState::default();
		let out = render::board(&board::evaluate(&snapshot, &state, REFERENCE_DATE), None);
		let lines: Vec<_> = out.lines().collect();

		assert!(lines[0].starts_with("ID  NAME"), "Unexpected header: {}", lines[0]);
		assert!(lines[1].contains("Lake Balkhash") && lines[1].ends_with("25     high"));
		assert!(lines[2].contains("Kapchagay") && lines[2].ends_with("3      low"));
		assert_eq!(lines[3], "Total: 2  High: 1  Medium: 0  Low: 1");
		assert_eq!(lines[4], "Scored as of 2026-10-19.");
	}

	#[test]
	fn board_reports_filter_impact_and_truncation() {
		let snapshot = vec![
			WaterBuilder::new(1).region("Almaty").build(),
			WaterBuilder::new(2).region("Almaty").build(),
			WaterBuilder::new(3).region("Aktobe").build(),
		];
		let state = QueryState { region: Some("Almaty".to_string()), ..QueryState::default() };
		let out = render::board(&board::evaluate(&snapshot, &state, REFERENCE_DATE), Some(1));

		assert!(out.contains("... 1 more not shown."), "Unexpected output: {out}");
		assert!(out.contains("Filtered out 1 of 3 (eq:region 1)."), "Unexpected output: {out}");
	}

	#[test]
	fn detail_shows_breakdown_and_flags_odd_conditions() {
		let resource = WaterBuilder::new(7).name("Sorbulak").condition(7).aged(2).build();
		let detail = aqua_service::RecordDetail {
			item: aqua_domain::priority::ScoredResource::new(resource.clone(), REFERENCE_DATE),
			breakdown: aqua_domain::priority::explain(&resource, REFERENCE_DATE),
		};
		let out = render::detail(&detail);

		assert!(out.starts_with("#7 Sorbulak\n"));
		assert!(out.contains("technical condition: 7?"), "Unexpected output: {out}");
		assert!(out.contains("score breakdown:     (6 - 7) × 3 + 2 = -1"), "Unexpected output: {out}");
		assert!(out.contains("priority:            -1 (low)"), "Unexpected output: {out}");
	}
}
