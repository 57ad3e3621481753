use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{
	Date, OffsetDateTime, format_description::well_known::Rfc3339, macros::format_description,
};

use crate::{Error, Result};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
	Lake,
	Reservoir,
	Channel,
}
impl ResourceType {
	pub const ALL: [Self; 3] = [Self::Lake, Self::Reservoir, Self::Channel];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Lake => "lake",
			Self::Reservoir => "reservoir",
			Self::Channel => "channel",
		}
	}
}
impl FromStr for ResourceType {
	type Err = Error;

	fn from_str(raw: &str) -> Result<Self> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"lake" => Ok(Self::Lake),
			"reservoir" => Ok(Self::Reservoir),
			"channel" => Ok(Self::Channel),
			_ => Err(Error::UnknownResourceType { value: raw.to_string() }),
		}
	}
}
impl fmt::Display for ResourceType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterType {
	Fresh,
	Salty,
}
impl WaterType {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Fresh => "fresh",
			Self::Salty => "salty",
		}
	}
}
impl FromStr for WaterType {
	type Err = Error;

	fn from_str(raw: &str) -> Result<Self> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"fresh" => Ok(Self::Fresh),
			"salty" => Ok(Self::Salty),
			_ => Err(Error::UnknownWaterType { value: raw.to_string() }),
		}
	}
}
impl fmt::Display for WaterType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A validated water body. Technical condition is nominally 1 (best) to 5 (worst) but is
/// carried as-is; scoring tolerates any value.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WaterResource {
	pub id: i64,
	pub name: String,
	pub region: String,
	pub resource_type: ResourceType,
	pub water_type: WaterType,
	#[serde(rename = "fauna")]
	pub has_fauna: bool,
	#[serde(with = "crate::date_serde")]
	pub passport_date: Date,
	pub technical_condition: i32,
	pub latitude: f64,
	pub longitude: f64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub pdf_url: Option<String>,
}
impl WaterResource {
	pub fn condition_in_range(&self) -> bool {
		(1..=5).contains(&self.technical_condition)
	}
}

/// Record shape as returned by the remote API, before validation.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RawWater {
	pub id: i64,
	pub name: String,
	#[serde(default)]
	pub region: String,
	pub resource_type: String,
	pub water_type: String,
	#[serde(default)]
	pub fauna: bool,
	pub passport_date: String,
	pub technical_condition: i32,
	pub latitude: f64,
	pub longitude: f64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pdf_url: Option<String>,
	/// Server-computed priority. Ignored; the score is always recomputed locally.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub priority: Option<f64>,
}
impl TryFrom<RawWater> for WaterResource {
	type Error = Error;

	fn try_from(raw: RawWater) -> Result<Self> {
		let invalid = |message: String| Error::InvalidRecord { id: raw.id, message };

		if raw.name.trim().is_empty() {
			return Err(invalid("name must be non-empty.".to_string()));
		}
		if !raw.latitude.is_finite() || !(-90.0..=90.0).contains(&raw.latitude) {
			return Err(invalid(format!("latitude {} is outside -90..=90.", raw.latitude)));
		}
		if !raw.longitude.is_finite() || !(-180.0..=180.0).contains(&raw.longitude) {
			return Err(invalid(format!("longitude {} is outside -180..=180.", raw.longitude)));
		}

		let resource_type = raw.resource_type.parse::<ResourceType>()?;
		let water_type = raw.water_type.parse::<WaterType>()?;
		let passport_date = parse_passport_date(&raw.passport_date)?;

		Ok(Self {
			id: raw.id,
			name: raw.name,
			region: raw.region,
			resource_type,
			water_type,
			has_fauna: raw.fauna,
			passport_date,
			technical_condition: raw.technical_condition,
			latitude: raw.latitude,
			longitude: raw.longitude,
			pdf_url: raw.pdf_url.filter(|url| !url.trim().is_empty()),
		})
	}
}

/// Write payload for create and update calls.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct WaterDraft {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub region: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub resource_type: Option<ResourceType>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub water_type: Option<WaterType>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fauna: Option<bool>,
	#[serde(
		default,
		skip_serializing_if = "Option::is_none",
		with = "crate::date_serde::option"
	)]
	pub passport_date: Option<Date>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub technical_condition: Option<i32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub latitude: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub longitude: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pdf_url: Option<String>,
}
impl WaterDraft {
	/// Creation requires every field except the document link.
	pub fn missing_for_create(&self) -> Vec<&'static str> {
		let mut missing = Vec::new();

		if self.name.as_deref().map(|name| name.trim().is_empty()).unwrap_or(true) {
			missing.push("name");
		}
		if self.region.is_none() {
			missing.push("region");
		}
		if self.resource_type.is_none() {
			missing.push("resource_type");
		}
		if self.water_type.is_none() {
			missing.push("water_type");
		}
		if self.passport_date.is_none() {
			missing.push("passport_date");
		}
		if self.technical_condition.is_none() {
			missing.push("technical_condition");
		}
		if self.latitude.is_none() {
			missing.push("latitude");
		}
		if self.longitude.is_none() {
			missing.push("longitude");
		}

		missing
	}
}
impl From<&WaterResource> for WaterDraft {
	fn from(resource: &WaterResource) -> Self {
		Self {
			name: Some(resource.name.clone()),
			region: Some(resource.region.clone()),
			resource_type: Some(resource.resource_type),
			water_type: Some(resource.water_type),
			fauna: Some(resource.has_fauna),
			passport_date: Some(resource.passport_date),
			technical_condition: Some(resource.technical_condition),
			latitude: Some(resource.latitude),
			longitude: Some(resource.longitude),
			pdf_url: resource.pdf_url.clone(),
		}
	}
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp, whose calendar date is used as written.
pub fn parse_passport_date(raw: &str) -> Result<Date> {
	let trimmed = raw.trim();

	if let Ok(date) = Date::parse(trimmed, format_description!("[year]-[month]-[day]")) {
		return Ok(date);
	}
	if let Ok(timestamp) = OffsetDateTime::parse(trimmed, &Rfc3339) {
		return Ok(timestamp.date());
	}

	Err(Error::InvalidPassportDate { value: raw.to_string() })
}

pub fn format_passport_date(date: Date) -> String {
	format!("{:04}-{:02}-{:02}", date.year(), u8::from(date.month()), date.day())
}

#[cfg(test)]
mod tests {
	use time::macros::date;

	use crate::water::{
		RawWater, ResourceType, WaterDraft, WaterResource, WaterType, parse_passport_date,
	};

	fn raw() -> RawWater {
		RawWater {
			id: 7,
			name: "Lake Balkhash".to_string(),
			region: "Karaganda".to_string(),
			resource_type: "lake".to_string(),
			water_type: "salty".to_string(),
			fauna: true,
			passport_date: "2015-03-01".to_string(),
			technical_condition: 3,
			latitude: 46.5,
			longitude: 74.9,
			pdf_url: Some(" ".to_string()),
			priority: Some(4.0),
		}
	}

	#[test]
	fn converts_valid_raw_record() {
		let water = WaterResource::try_from(raw()).expect("record must validate");

		assert_eq!(water.resource_type, ResourceType::Lake);
		assert_eq!(water.water_type, WaterType::Salty);
		assert_eq!(water.passport_date, date!(2015 - 03 - 01));
		assert!(water.has_fauna);
		assert_eq!(water.pdf_url, None);
	}

	#[test]
	fn keeps_out_of_range_condition() {
		let mut record = raw();

		record.technical_condition = 9;

		let water = WaterResource::try_from(record).expect("condition is advisory");

		assert_eq!(water.technical_condition, 9);
		assert!(!water.condition_in_range());
	}

	#[test]
	fn rejects_malformed_passport_date() {
		let mut record = raw();

		record.passport_date = "01.03.2015".to_string();

		let err = WaterResource::try_from(record).expect_err("date must not default");

		assert!(err.to_string().contains("01.03.2015"), "Unexpected error: {err}");
	}

	#[test]
	fn rejects_blank_name_and_bad_coordinates() {
		let mut record = raw();

		record.name = "  ".to_string();

		assert!(WaterResource::try_from(record).is_err());

		let mut record = raw();

		record.latitude = 91.0;

		assert!(WaterResource::try_from(record).is_err());

		let mut record = raw();

		record.longitude = f64::NAN;

		assert!(WaterResource::try_from(record).is_err());
	}

	#[test]
	fn rejects_unknown_enums() {
		let mut record = raw();

		record.resource_type = "pond".to_string();

		assert!(WaterResource::try_from(record).is_err());

		let mut record = raw();

		record.water_type = "brackish".to_string();

		assert!(WaterResource::try_from(record).is_err());
	}

	#[test]
	fn parses_rfc3339_timestamps() {
		assert_eq!(
			parse_passport_date("2015-03-01T00:00:00.000Z").expect("timestamp parses"),
			date!(2015 - 03 - 01)
		);
		assert_eq!(
			parse_passport_date("2015-03-01T23:30:00+05:00").expect("offset timestamp parses"),
			date!(2015 - 03 - 01)
		);
		assert!(parse_passport_date("").is_err());
		assert!(parse_passport_date("2015-02-30").is_err());
	}

	#[test]
	fn serializes_wire_field_names() {
		let water = WaterResource::try_from(raw()).expect("record must validate");
		let json = serde_json::to_value(&water).expect("serialize");

		assert_eq!(json["fauna"], true);
		assert_eq!(json["passport_date"], "2015-03-01");
		assert_eq!(json["resource_type"], "lake");
	}

	#[test]
	fn draft_reports_missing_fields_and_skips_absent_ones() {
		let draft = WaterDraft { name: Some("Kapchagay".to_string()), ..WaterDraft::default() };

		assert!(draft.missing_for_create().contains(&"passport_date"));
		assert!(!draft.missing_for_create().contains(&"name"));
		assert_eq!(
			serde_json::to_value(&draft).expect("serialize"),
			serde_json::json!({ "name": "Kapchagay" })
		);

		let water = WaterResource::try_from(raw()).expect("record must validate");

		assert!(WaterDraft::from(&water).missing_for_create().is_empty());
	}
}
