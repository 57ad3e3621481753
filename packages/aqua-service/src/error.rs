pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: water resource {id}.")]
	NotFound { id: i64 },
	#[error("Unauthorized: {message}")]
	Unauthorized { message: String },
	#[error("Source error: {message}")]
	Source { message: String },
	#[error("No snapshot has been fetched yet.")]
	NoSnapshot,
	#[error("Snapshot was superseded by a newer fetch.")]
	StaleSnapshot,
}
impl From<aqua_client::Error> for Error {
	fn from(err: aqua_client::Error) -> Self {
		match err {
			aqua_client::Error::NotFound { id } => Self::NotFound { id },
			aqua_client::Error::Unauthorized { message } => Self::Unauthorized { message },
			aqua_client::Error::IncompleteDraft { .. } =>
				Self::InvalidRequest { message: err.to_string() },
			other => Self::Source { message: other.to_string() },
		}
	}
}

impl From<aqua_domain::Error> for Error {
	fn from(err: aqua_domain::Error) -> Self {
		Self::InvalidRequest { message: err.to_string() }
	}
}
