use time::Date;

use crate::{
	ordering::{SortDirection, SortField},
	query::QueryState,
	water::{ResourceType, WaterType, format_passport_date},
};

/// Server-side list parameters for `GET /waters`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RemoteQuery {
	pub page: u32,
	pub limit: u32,
	pub search: Option<String>,
	pub sort_field: Option<SortField>,
	pub sort_order: Option<SortDirection>,
	pub region: Option<String>,
	pub resource_type: Option<ResourceType>,
	pub water_type: Option<WaterType>,
	pub fauna: Option<bool>,
	pub passport_date_from: Option<Date>,
	pub passport_date_to: Option<Date>,
	pub technical_condition_from: Option<i32>,
	pub technical_condition_to: Option<i32>,
}
impl RemoteQuery {
	pub fn page(page: u32, limit: u32) -> Self {
		Self { page, limit, ..Self::default() }
	}

	/// The tier filter has no server counterpart and is left to the client engine.
	pub fn from_state(state: &QueryState, page: u32, limit: u32) -> Self {
		let (condition_from, condition_to) = match state.technical_condition {
			Some(condition) => (Some(condition), Some(condition)),
			None => (state.technical_condition_from, state.technical_condition_to),
		};

		Self {
			page,
			limit,
			search: state.search_text().map(str::to_string),
			sort_field: Some(state.sort.field),
			sort_order: Some(state.sort.direction),
			region: state.region_filter().map(str::to_string),
			resource_type: state.resource_type,
			water_type: state.water_type,
			fauna: state.fauna,
			passport_date_from: state.passport_date_from,
			passport_date_to: state.passport_date_to,
			technical_condition_from: condition_from,
			technical_condition_to: condition_to,
		}
	}

	/// Query pairs in wire order. `page` and `limit` are always sent, `fauna` whenever it is
	/// set, numbers only when positive and strings only when non-blank.
	pub fn to_params(&self) -> Vec<(&'static str, String)> {
		let mut params =
			vec![("page", self.page.to_string()), ("limit", self.limit.to_string())];

		push_text(&mut params, "search", self.search.as_deref());

		if let Some(field) = self.sort_field {
			params.push(("sortField", field.as_str().to_string()));
		}
		if let Some(order) = self.sort_order {
			params.push(("sortOrder", order.as_str().to_ascii_uppercase()));
		}

		push_text(&mut params, "region", self.region.as_deref());
		push_text(&mut params, "resource_type", self.resource_type.map(ResourceType::as_str));
		push_text(&mut params, "water_type", self.water_type.map(WaterType::as_str));

		if let Some(fauna) = self.fauna {
			params.push(("fauna", fauna.to_string()));
		}
		if let Some(from) = self.passport_date_from {
			params.push(("passport_date_from", format_passport_date(from)));
		}
		if let Some(to) = self.passport_date_to {
			params.push(("passport_date_to", format_passport_date(to)));
		}

		push_positive(&mut params, "technical_condition_from", self.technical_condition_from);
		push_positive(&mut params, "technical_condition_to", self.technical_condition_to);

		params
	}
}

fn push_text(params: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<&str>) {
	if let Some(value) = value.map(str::trim)
		&& !value.is_empty()
	{
		params.push((key, value.to_string()));
	}
}

fn push_positive(params: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<i32>) {
	if let Some(value) = value
		&& value > 0
	{
		params.push((key, value.to_string()));
	}
}
