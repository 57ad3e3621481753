use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Cannot read configuration {path:?}.")]
	ReadConfig { path: PathBuf, source: std::io::Error },
	#[error("Configuration {path:?} is not valid TOML for this schema.")]
	ParseConfig { path: PathBuf, source: toml::de::Error },
	/// `key` is the dotted TOML path of the offending setting.
	#[error("{key} {message}")]
	Validation { key: String, message: String },
}
impl Error {
	pub(crate) fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
		Self::Validation { key: key.into(), message: message.into() }
	}
}
