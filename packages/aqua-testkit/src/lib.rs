mod error;
mod mock;

pub use error::{Error, Result};
pub use mock::{API_PREFIX, LOGIN_ACCESS_TOKEN, LOGIN_REFRESH_TOKEN, MockWaterApi, RecordedRequest};

use time::{Date, macros::date};

use aqua_domain::water::{
	RawWater, ResourceType, WaterResource, WaterType, format_passport_date,
};

/// Fixed "today" shared by tests that need a stable reference date.
pub const REFERENCE_DATE: Date = date!(2026 - 10 - 19);

/// Builds [`WaterResource`] fixtures with plausible defaults: a fresh lake in Almaty in
/// condition 3 whose passport was issued on [`REFERENCE_DATE`].
#[derive(Clone, Debug)]
pub struct WaterBuilder {
	resource: WaterResource,
}
impl WaterBuilder {
	pub fn new(id: i64) -> Self {
		Self {
			resource: WaterResource {
				id,
				name: format!("Water {id}"),
				region: "Almaty".to_string(),
				resource_type: ResourceType::Lake,
				water_type: WaterType::Fresh,
				has_fauna: false,
				passport_date: REFERENCE_DATE,
				technical_condition: 3,
				latitude: 43.238,
				longitude: 76.945,
				pdf_url: None,
			},
		}
	}

	pub fn name(mut self, name: &str) -> Self {
		self.resource.name = name.to_string();

		self
	}

	pub fn region(mut self, region: &str) -> Self {
		self.resource.region = region.to_string();

		self
	}

	pub fn resource_type(mut self, resource_type: ResourceType) -> Self {
		self.resource.resource_type = resource_type;

		self
	}

	pub fn water_type(mut self, water_type: WaterType) -> Self {
		self.resource.water_type = water_type;

		self
	}

	pub fn fauna(mut self, has_fauna: bool) -> Self {
		self.resource.has_fauna = has_fauna;

		self
	}

	pub fn condition(mut self, technical_condition: i32) -> Self {
		self.resource.technical_condition = technical_condition;

		self
	}

	pub fn passport_date(mut self, passport_date: Date) -> Self {
		self.resource.passport_date = passport_date;

		self
	}

	/// Passport issued exactly `years` anniversaries before [`REFERENCE_DATE`].
	pub fn aged(self, years: i32) -> Self {
		self.passport_date(years_before(REFERENCE_DATE, years))
	}

	pub fn pdf_url(mut self, pdf_url: &str) -> Self {
		self.resource.pdf_url = Some(pdf_url.to_string());

		self
	}

	pub fn build(self) -> WaterResource {
		self.resource
	}

	/// The record as the remote API would return it.
	pub fn raw(&self) -> RawWater {
		raw_water(&self.resource)
	}
}

pub fn raw_water(resource: &WaterResource) -> RawWater {
	RawWater {
		id: resource.id,
		name: resource.name.clone(),
		region: resource.region.clone(),
		resource_type: resource.resource_type.as_str().to_string(),
		water_type: resource.water_type.as_str().to_string(),
		fauna: resource.has_fauna,
		passport_date: format_passport_date(resource.passport_date),
		technical_condition: resource.technical_condition,
		latitude: resource.latitude,
		longitude: resource.longitude,
		pdf_url: resource.pdf_url.clone(),
		priority: None,
	}
}

/// Same month and day, `years` earlier. Feb 29 falls back to Feb 28 in non-leap years.
pub fn years_before(reference: Date, years: i32) -> Date {
	let year = reference.year() - years;

	reference
		.replace_year(year)
		.or_else(|_| reference.replace_day(28).and_then(|date| date.replace_year(year)))
		.unwrap_or(reference)
}
