pub mod option;

use serde::{Deserialize, Deserializer, Serializer};
use time::Date;

use crate::water::{format_passport_date, parse_passport_date};

pub fn serialize<S>(value: &Date, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	serializer.serialize_str(&format_passport_date(*value))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = String::deserialize(deserializer)?;

	parse_passport_date(&raw).map_err(serde::de::Error::custom)
}
