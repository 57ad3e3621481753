use clap::{
	ValueEnum,
	builder::{
		Styles,
		styling::{AnsiColor, Effects},
	},
};

pub const VERSION: &str = concat!(
	env!("CARGO_PKG_VERSION"),
	"-",
	env!("VERGEN_GIT_SHA"),
	"-",
	env!("VERGEN_CARGO_TARGET_TRIPLE"),
);

/// How a command prints its result.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
	#[default]
	Table,
	Json,
}

pub fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Cyan.on_default() | Effects::BOLD)
		.usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
		.literal(AnsiColor::Blue.on_default() | Effects::BOLD)
		.placeholder(AnsiColor::Green.on_default())
		.error(AnsiColor::Red.on_default() | Effects::BOLD)
}

/// Value parser for repeatable `KEY=VALUE` arguments. The key is trimmed; the value is kept
/// verbatim so an empty value can clear a filter.
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
	let (key, value) =
		raw.split_once('=').ok_or_else(|| format!("Expected KEY=VALUE, got '{raw}'."))?;
	let key = key.trim();

	if key.is_empty() {
		return Err(format!("Missing key in '{raw}'."));
	}

	Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
	use crate::parse_key_value;

	#[test]
	fn splits_on_the_first_equals_sign() {
		assert_eq!(
			parse_key_value(" region =Lake District"),
			Ok(("region".to_string(), "Lake District".to_string()))
		);
		assert_eq!(parse_key_value("search=a=b"), Ok(("search".to_string(), "a=b".to_string())));
		assert_eq!(parse_key_value("region="), Ok(("region".to_string(), String::new())));
	}

	#[test]
	fn rejects_missing_separator_or_key() {
		assert!(parse_key_value("region").is_err());
		assert!(parse_key_value(" =Almaty").is_err());
	}
}
