use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
	Error, Result,
	ordering::{SortField, SortState},
	priority::PriorityTier,
	water::{ResourceType, WaterType, parse_passport_date},
};

/// Selector value that disables a filter.
pub const ALL_SENTINEL: &str = "all";

const FILTER_KEY_ALLOWLIST: &str = "search, region, resource_type, water_type, fauna, \
	technical_condition, priority, passport_date_from, passport_date_to, \
	technical_condition_from, technical_condition_to";

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueryState {
	pub search: String,
	pub region: Option<String>,
	pub resource_type: Option<ResourceType>,
	pub water_type: Option<WaterType>,
	pub fauna: Option<bool>,
	pub technical_condition: Option<i32>,
	pub priority_tier: Option<PriorityTier>,
	#[serde(with = "crate::date_serde::option", skip_serializing_if = "Option::is_none")]
	pub passport_date_from: Option<Date>,
	#[serde(with = "crate::date_serde::option", skip_serializing_if = "Option::is_none")]
	pub passport_date_to: Option<Date>,
	pub technical_condition_from: Option<i32>,
	pub technical_condition_to: Option<i32>,
	pub sort: SortState,
}
impl QueryState {
	/// Sets one filter from its textual key and value. `all` or a blank value clears it.
	pub fn set_filter(&mut self, key: &str, value: &str) -> Result<()> {
		let trimmed = value.trim();
		let cleared = trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_SENTINEL);

		match key.trim() {
			"search" => self.search = value.to_string(),
			"region" => self.region = (!cleared).then(|| trimmed.to_string()),
			"resource_type" =>
				self.resource_type = if cleared { None } else { Some(trimmed.parse()?) },
			"water_type" => self.water_type = if cleared { None } else { Some(trimmed.parse()?) },
			"fauna" => self.fauna = if cleared { None } else { Some(parse_bool(key, trimmed)?) },
			"technical_condition" =>
				self.technical_condition =
					if cleared { None } else { Some(parse_condition(key, trimmed)?) },
			"priority" | "priority_tier" =>
				self.priority_tier = if cleared { None } else { Some(trimmed.parse()?) },
			"passport_date_from" =>
				self.passport_date_from =
					if cleared { None } else { Some(parse_date_filter(key, trimmed)?) },
			"passport_date_to" =>
				self.passport_date_to =
					if cleared { None } else { Some(parse_date_filter(key, trimmed)?) },
			"technical_condition_from" =>
				self.technical_condition_from =
					if cleared { None } else { Some(parse_condition(key, trimmed)?) },
			"technical_condition_to" =>
				self.technical_condition_to =
					if cleared { None } else { Some(parse_condition(key, trimmed)?) },
			_ =>
				return Err(Error::UnknownFilterKey {
					key: key.to_string(),
					allowed: FILTER_KEY_ALLOWLIST,
				}),
		}

		Ok(())
	}

	/// Applies the column-header click behavior to the named field.
	pub fn toggle_sort(&mut self, field: &str) -> Result<()> {
		let field = field.parse::<SortField>()?;

		self.sort.toggle(field);

		Ok(())
	}

	pub fn region_filter(&self) -> Option<&str> {
		self.region
			.as_deref()
			.map(str::trim)
			.filter(|region| !region.is_empty() && !region.eq_ignore_ascii_case(ALL_SENTINEL))
	}

	pub fn search_text(&self) -> Option<&str> {
		Some(self.search.trim()).filter(|search| !search.is_empty())
	}

	pub fn active_filter_count(&self) -> usize {
		[
			self.search_text().is_some(),
			self.region_filter().is_some(),
			self.resource_type.is_some(),
			self.water_type.is_some(),
			self.fauna.is_some(),
			self.technical_condition.is_some(),
			self.priority_tier.is_some(),
			self.passport_date_from.is_some(),
			self.passport_date_to.is_some(),
			self.technical_condition_from.is_some(),
			self.technical_condition_to.is_some(),
		]
		.into_iter()
		.filter(|active| *active)
		.count()
	}

	/// Clears search and every filter, keeping the current sort.
	pub fn reset_filters(&mut self) {
		*self = Self { sort: self.sort, ..Self::default() };
	}
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
	match value.to_ascii_lowercase().as_str() {
		"true" | "yes" | "1" => Ok(true),
		"false" | "no" | "0" => Ok(false),
		_ => Err(Error::InvalidFilterValue {
			key: key.to_string(),
			value: value.to_string(),
			message: "expected true or false.".to_string(),
		}),
	}
}

fn parse_condition(key: &str, value: &str) -> Result<i32> {
	value.parse::<i32>().map_err(|_| Error::InvalidFilterValue {
		key: key.to_string(),
		value: value.to_string(),
		message: "expected an integer condition.".to_string(),
	})
}

fn parse_date_filter(key: &str, value: &str) -> Result<Date> {
	parse_passport_date(value).map_err(|_| Error::InvalidFilterValue {
		key: key.to_string(),
		value: value.to_string(),
		message: "expected a YYYY-MM-DD date.".to_string(),
	})
}
