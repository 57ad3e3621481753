pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
	#[error(transparent)]
	SerdeJson(#[from] serde_json::Error),
	#[error(transparent)]
	InvalidHeaderName(#[from] reqwest::header::InvalidHeaderName),
	#[error(transparent)]
	InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),
	#[error("{message}")]
	InvalidConfig { message: String },
	#[error("{message}")]
	InvalidResponse { message: String },
	#[error("Unauthorized: {message}")]
	Unauthorized { message: String },
	#[error("Water resource {id} was not found.")]
	NotFound { id: i64 },
	#[error("Cannot create a water resource without: {missing}.")]
	IncompleteDraft { missing: String },
	#[error("Record {id} failed validation: {source}")]
	Record { id: i64, source: aqua_domain::Error },
}
