use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, Result, water::WaterResource};

pub const HIGH_PRIORITY_MIN_SCORE: i64 = 12;
pub const MEDIUM_PRIORITY_MIN_SCORE: i64 = 6;

const CONDITION_CEILING: i64 = 6;
const CONDITION_WEIGHT: i64 = 3;

/// Ordered `Low < Medium < High`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityTier {
	Low,
	Medium,
	High,
}
impl PriorityTier {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::High => "high",
			Self::Medium => "medium",
			Self::Low => "low",
		}
	}
}
impl FromStr for PriorityTier {
	type Err = Error;

	fn from_str(raw: &str) -> Result<Self> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"high" => Ok(Self::High),
			"medium" => Ok(Self::Medium),
			"low" => Ok(Self::Low),
			_ => Err(Error::UnknownPriorityTier { value: raw.to_string() }),
		}
	}
}
impl fmt::Display for PriorityTier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct ScoreBreakdown {
	pub technical_condition: i32,
	pub condition_points: i64,
	pub age_years: i64,
	pub score: i64,
	pub tier: PriorityTier,
}
impl fmt::Display for ScoreBreakdown {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"({CONDITION_CEILING} - {}) × {CONDITION_WEIGHT} + {} = {}",
			self.technical_condition, self.age_years, self.score
		)
	}
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoredResource {
	#[serde(flatten)]
	pub resource: WaterResource,
	pub priority_score: i64,
	pub priority_tier: PriorityTier,
}
impl ScoredResource {
	pub fn new(resource: WaterResource, reference: Date) -> Self {
		let priority_score = score(&resource, reference);

		Self { resource, priority_score, priority_tier: classify(priority_score) }
	}
}

/// Whole anniversaries elapsed from `passport` to `reference`, floored. Future passport
/// dates yield negative ages. A Feb 29 passport reaches its anniversary on Mar 1 in
/// non-leap years.
pub fn age_in_years(passport: Date, reference: Date) -> i64 {
	let mut years = i64::from(reference.year()) - i64::from(passport.year());
	let reference_md = (u8::from(reference.month()), reference.day());
	let passport_md = (u8::from(passport.month()), passport.day());

	if reference_md < passport_md {
		years -= 1;
	}

	years
}

/// `(6 - technical_condition) * 3 + age_in_years`. Performs no validation of the condition.
pub fn score(resource: &WaterResource, reference: Date) -> i64 {
	condition_points(resource.technical_condition)
		+ age_in_years(resource.passport_date, reference)
}

pub fn classify(score: i64) -> PriorityTier {
	if score >= HIGH_PRIORITY_MIN_SCORE {
		PriorityTier::High
	} else if score >= MEDIUM_PRIORITY_MIN_SCORE {
		PriorityTier::Medium
	} else {
		PriorityTier::Low
	}
}

pub fn explain(resource: &WaterResource, reference: Date) -> ScoreBreakdown {
	let condition_points = condition_points(resource.technical_condition);
	let age_years = age_in_years(resource.passport_date, reference);
	let score = condition_points + age_years;

	ScoreBreakdown {
		technical_condition: resource.technical_condition,
		condition_points,
		age_years,
		score,
		tier: classify(score),
	}
}

fn condition_points(technical_condition: i32) -> i64 {
	(CONDITION_CEILING - i64::from(technical_condition)) * CONDITION_WEIGHT
}

#[cfg(test)]
mod tests {
	use time::macros::date;

	use crate::priority::{PriorityTier, age_in_years, classify};

	#[test]
	fn age_counts_whole_anniversaries() {
		assert_eq!(age_in_years(date!(2016 - 10 - 19), date!(2026 - 10 - 19)), 10);
		assert_eq!(age_in_years(date!(2016 - 10 - 20), date!(2026 - 10 - 19)), 9);
		assert_eq!(age_in_years(date!(2025 - 12 - 31), date!(2026 - 01 - 01)), 0);
		assert_eq!(age_in_years(date!(2026 - 10 - 19), date!(2026 - 10 - 19)), 0);
	}

	#[test]
	fn future_passport_floors_to_negative_age() {
		assert_eq!(age_in_years(date!(2027 - 06 - 01), date!(2026 - 10 - 19)), -1);
		assert_eq!(age_in_years(date!(2026 - 10 - 20), date!(2026 - 10 - 19)), -1);
		assert_eq!(age_in_years(date!(2028 - 10 - 19), date!(2026 - 10 - 19)), -2);
	}

	#[test]
	fn leap_day_anniversary_falls_on_march_first() {
		assert_eq!(age_in_years(date!(2020 - 02 - 29), date!(2021 - 02 - 28)), 0);
		assert_eq!(age_in_years(date!(2020 - 02 - 29), date!(2021 - 03 - 01)), 1);
		assert_eq!(age_in_years(date!(2020 - 02 - 29), date!(2024 - 02 - 29)), 4);
	}

	#[test]
	fn tier_boundaries() {
		assert_eq!(classify(12), PriorityTier::High);
		assert_eq!(classify(11), PriorityTier::Medium);
		assert_eq!(classify(6), PriorityTier::Medium);
		assert_eq!(classify(5), PriorityTier::Low);
		assert_eq!(classify(-4), PriorityTier::Low);
	}

	#[test]
	fn tier_parses_case_insensitively() {
		assert_eq!("HIGH".parse::<PriorityTier>().expect("parse"), PriorityTier::High);
		assert!("urgent".parse::<PriorityTier>().is_err());
	}
}
