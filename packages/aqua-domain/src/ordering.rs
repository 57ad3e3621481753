use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{Error, Result, priority::ScoredResource};

const SORT_FIELD_ALLOWLIST: &str =
	"name, region, technical_condition, passport_date, priority";

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
	Name,
	Region,
	TechnicalCondition,
	PassportDate,
	#[serde(rename = "priority")]
	PriorityScore,
}
impl SortField {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Name => "name",
			Self::Region => "region",
			Self::TechnicalCondition => "technical_condition",
			Self::PassportDate => "passport_date",
			Self::PriorityScore => "priority",
		}
	}
}
impl FromStr for SortField {
	type Err = Error;

	fn from_str(raw: &str) -> Result<Self> {
		match raw.trim() {
			"name" => Ok(Self::Name),
			"region" => Ok(Self::Region),
			"technical_condition" | "technicalCondition" => Ok(Self::TechnicalCondition),
			"passport_date" | "passportDate" => Ok(Self::PassportDate),
			"priority" | "priority_score" | "priorityScore" => Ok(Self::PriorityScore),
			_ => Err(Error::UnknownSortField {
				value: raw.to_string(),
				allowed: SORT_FIELD_ALLOWLIST,
			}),
		}
	}
}
impl fmt::Display for SortField {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
	Ascending,
	Descending,
}
impl SortDirection {
	pub fn flipped(self) -> Self {
		match self {
			Self::Ascending => Self::Descending,
			Self::Descending => Self::Ascending,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Ascending => "asc",
			Self::Descending => "desc",
		}
	}

	fn apply(self, ascending: Ordering) -> Ordering {
		match self {
			Self::Ascending => ascending,
			Self::Descending => ascending.reverse(),
		}
	}
}
impl FromStr for SortDirection {
	type Err = Error;

	fn from_str(raw: &str) -> Result<Self> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"asc" | "ascending" => Ok(Self::Ascending),
			"desc" | "descending" => Ok(Self::Descending),
			_ => Err(Error::UnknownSortDirection { value: raw.to_string() }),
		}
	}
}
impl fmt::Display for SortDirection {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SortState {
	pub field: SortField,
	pub direction: SortDirection,
}
impl SortState {
	pub fn new(field: SortField, direction: SortDirection) -> Self {
		Self { field, direction }
	}

	/// Same field flips the direction; a new field starts descending.
	pub fn toggle(&mut self, field: SortField) {
		if self.field == field {
			self.direction = self.direction.flipped();
		} else {
			self.field = field;
			self.direction = SortDirection::Descending;
		}
	}
}
impl Default for SortState {
	fn default() -> Self {
		Self { field: SortField::PriorityScore, direction: SortDirection::Descending }
	}
}

pub fn compare(
	a: &ScoredResource,
	b: &ScoredResource,
	field: SortField,
	direction: SortDirection,
) -> Ordering {
	let ascending = match field {
		SortField::Name => collate(&a.resource.name, &b.resource.name),
		SortField::Region => collate(&a.resource.region, &b.resource.region),
		SortField::TechnicalCondition =>
			a.resource.technical_condition.cmp(&b.resource.technical_condition),
		SortField::PassportDate => a.resource.passport_date.cmp(&b.resource.passport_date),
		SortField::PriorityScore => a.priority_score.cmp(&b.priority_score),
	};

	direction.apply(ascending)
}

/// Stable: equal rows keep their incoming order.
pub fn sort_scored(items: &mut [ScoredResource], sort: SortState) {
	items.sort_by(|a, b| compare(a, b, sort.field, sort.direction));
}

/// Primary key ignores case and diacritics, then case-folded text, then raw text.
pub fn collate(a: &str, b: &str) -> Ordering {
	collation_key(a)
		.cmp(&collation_key(b))
		.then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
		.then_with(|| a.cmp(b))
}

fn collation_key(value: &str) -> String {
	value.nfd().filter(|ch| !is_combining_mark(*ch)).flat_map(char::to_lowercase).collect()
}
