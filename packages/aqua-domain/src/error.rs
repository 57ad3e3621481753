pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	#[error("Invalid passport date '{value}': expected YYYY-MM-DD or an RFC 3339 timestamp.")]
	InvalidPassportDate { value: String },
	#[error("Unknown resource type '{value}', expected one of: lake, reservoir, channel.")]
	UnknownResourceType { value: String },
	#[error("Unknown water type '{value}', expected one of: fresh, salty.")]
	UnknownWaterType { value: String },
	#[error("Unknown priority tier '{value}', expected one of: high, medium, low.")]
	UnknownPriorityTier { value: String },
	#[error("Sort field '{value}' is not in allowlist: {allowed}.")]
	UnknownSortField { value: String, allowed: &'static str },
	#[error("Unknown sort direction '{value}', expected asc or desc.")]
	UnknownSortDirection { value: String },
	#[error("Filter key '{key}' is not in allowlist: {allowed}.")]
	UnknownFilterKey { key: String, allowed: &'static str },
	#[error("Invalid value '{value}' for filter '{key}': {message}")]
	InvalidFilterValue { key: String, value: String, message: String },
	#[error("Invalid record {id}: {message}")]
	InvalidRecord { id: i64, message: String },
}
