pub mod render;

use std::{
	fs,
	io::{self, BufRead},
	path::{Path, PathBuf},
	sync::Arc,
};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{self, WrapErr};
use serde::Serialize;
use time::Date;
use tracing_subscriber::EnvFilter;

use aqua_cli::OutputFormat;
use aqua_client::WaterClient;
use aqua_domain::{query::QueryState, water::WaterDraft};
use aqua_service::{Clock, FixedClock, PriorityService, SystemClock};

#[derive(Debug, Parser)]
#[command(
	version = aqua_cli::VERSION,
	rename_all = "kebab",
	styles = aqua_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// Reference date for scoring instead of today's UTC date.
	#[arg(long, global = true, value_name = "YYYY-MM-DD", value_parser = parse_date)]
	pub today: Option<Date>,
	#[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
	pub format: OutputFormat,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Fetch every record and rank it by priority.
	Priorities {
		#[command(flatten)]
		query: QueryArgs,
		/// Show at most this many rows; stats still cover every match.
		#[arg(long)]
		limit: Option<usize>,
	},
	/// Fetch one server-side page and rank it with the same filters.
	Map {
		#[command(flatten)]
		query: QueryArgs,
		#[arg(long, default_value_t = 0)]
		page: u32,
	},
	/// Show one record with its score breakdown.
	Show { id: i64 },
	/// List the distinct regions across all records.
	Regions,
	/// Create a record from a JSON draft.
	Create {
		#[arg(long, value_name = "FILE")]
		file: PathBuf,
	},
	/// Patch a record with the fields of a JSON draft.
	Update {
		id: i64,
		#[arg(long, value_name = "FILE")]
		file: PathBuf,
	},
	Delete { id: i64 },
	/// Log in and print the issued tokens. Reads the password from stdin when omitted.
	Login {
		#[arg(long)]
		email: String,
		#[arg(long)]
		password: Option<String>,
	},
}

#[derive(Clone, Debug, Default, clap::Args)]
pub struct QueryArgs {
	#[arg(long, short = 's')]
	pub search: Option<String>,
	/// Filter as KEY=VALUE; repeatable. A value of `all` clears the filter.
	#[arg(
		long = "filter",
		short = 'f',
		value_name = "KEY=VALUE",
		value_parser = aqua_cli::parse_key_value
	)]
	pub filters: Vec<(String, String)>,
	#[arg(long, value_name = "FIELD")]
	pub sort: Option<String>,
	#[arg(long, value_name = "asc|desc")]
	pub order: Option<String>,
}
impl QueryArgs {
	pub fn to_state(&self) -> aqua_domain::Result<QueryState> {
		let mut state = QueryState::default();

		if let Some(search) = &self.search {
			state.set_filter("search", search)?;
		}

		for (key, value) in &self.filters {
			state.set_filter(key, value)?;
		}

		if let Some(field) = &self.sort {
			state.sort.field = field.parse()?;
		}
		if let Some(order) = &self.order {
			state.sort.direction = order.parse()?;
		}

		Ok(state)
	}
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = aqua_config::load(&args.config)?;

	init_tracing(&config)?;

	tracing::debug!(base_url = %config.api.base_url, format = ?args.format, "Loaded configuration.");

	let client = Arc::new(WaterClient::new(&config)?);
	let clock: Arc<dyn Clock> = match args.today {
		Some(today) => Arc::new(FixedClock(today)),
		None => Arc::new(SystemClock),
	};
	let service = PriorityService::new(&config, client.clone(), clock);
	let format = args.format;
	let output = match args.command {
		Command::Priorities { query, limit } => {
			let board = service.priorities(&query.to_state()?).await?;

			emit(format, &board, |board| render::board(board, limit))?
		},
		Command::Map { query, page } => {
			let page = service.map_page(&query.to_state()?, page).await?;

			emit(format, &page, render::map_page)?
		},
		Command::Show { id } => emit(format, &service.detail(id).await?, render::detail)?,
		Command::Regions => {
			service.refresh().await?;

			emit(format, &service.regions()?, |regions| render::regions(regions))?
		},
		Command::Create { file } => {
			let created = service.create(&read_draft(&file)?).await?;

			emit(format, &created, render::resource)?
		},
		Command::Update { id, file } => {
			let updated = service.update(id, &read_draft(&file)?).await?;

			emit(format, &updated, render::resource)?
		},
		Command::Delete { id } => {
			service.delete(id).await?;

			emit(format, &serde_json::json!({ "deleted": id }), |_| {
				format!("Deleted water resource {id}.\n")
			})?
		},
		Command::Login { email, password } => {
			let password = match password {
				Some(password) => password,
				None => read_password(io::stdin().lock())?,
			};

			serde_json::to_string_pretty(&client.login(&email, &password).await?)? + "\n"
		},
	};

	print!("{output}");

	Ok(())
}

fn emit<T>(
	format: OutputFormat,
	value: &T,
	table: impl FnOnce(&T) -> String,
) -> color_eyre::Result<String>
where
	T: Serialize,
{
	match format {
		OutputFormat::Table => Ok(table(value)),
		OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(value)?)),
	}
}

fn read_draft(path: &Path) -> color_eyre::Result<WaterDraft> {
	let raw = fs::read_to_string(path)
		.wrap_err_with(|| format!("Failed to read draft {}.", path.display()))?;

	serde_json::from_str(&raw).wrap_err_with(|| format!("Invalid draft {}.", path.display()))
}

fn read_password(mut input: impl BufRead) -> color_eyre::Result<String> {
	let mut line = String::new();

	input.read_line(&mut line)?;

	let password = line.trim_end_matches(['\r', '\n']);

	if password.is_empty() {
		return Err(eyre::eyre!("Password must be non-empty."));
	}

	Ok(password.to_string())
}

fn parse_date(raw: &str) -> Result<Date, String> {
	aqua_domain::water::parse_passport_date(raw).map_err(|err| err.to_string())
}

fn init_tracing(config: &aqua_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

	Ok(())
}

#[cfg(test)]
mod tests {
	use clap::{CommandFactory, Parser};
	use time::macros::date;

	use crate::{Args, Command, QueryArgs};
	use aqua_cli::OutputFormat;
	use aqua_domain::{
		ordering::{SortDirection, SortField},
		priority::PriorityTier,
	};

	#[test]
	fn command_definition_is_consistent() {
		Args::command().debug_assert();
	}

	#[test]
	fn parses_priorities_with_filters_and_globals() {
		let args = Args::try_parse_from([
			"aqua",
			"-c",
			"aqua.toml",
			"priorities",
			"--search",
			"lake",
			"-f",
			"region=Almaty",
			"--filter",
			"priority=high",
			"--sort",
			"name",
			"--order",
			"asc",
			"--limit",
			"5",
			"--today",
			"2026-10-19",
			"--format",
			"json",
		])
		.expect("Failed to parse args.");

		assert_eq!(args.today, Some(date!(2026 - 10 - 19)));
		assert_eq!(args.format, OutputFormat::Json);

		let Command::Priorities { query, limit } = args.command else {
			panic!("Expected the priorities command.");
		};
		let state = query.to_state().expect("Failed to build query state.");

		assert_eq!(limit, Some(5));
		assert_eq!(state.search, "lake");
		assert_eq!(state.region.as_deref(), Some("Almaty"));
		assert_eq!(state.priority_tier, Some(PriorityTier::High));
		assert_eq!(state.sort.field, SortField::Name);
		assert_eq!(state.sort.direction, SortDirection::Ascending);
	}

	#[test]
	fn rejects_malformed_filters_and_dates() {
		let no_equals =
			Args::try_parse_from(["aqua", "-c", "aqua.toml", "priorities", "-f", "region"]);
		let bad_date =
			Args::try_parse_from(["aqua", "-c", "aqua.toml", "--today", "19.10.2026", "regions"]);

		assert!(no_equals.is_err());
		assert!(bad_date.is_err());
	}

	#[test]
	fn unknown_filter_key_fails_state_building() {
		let query = QueryArgs {
			filters: vec![("colour".to_string(), "blue".to_string())],
			..QueryArgs::default()
		};
		let err = query.to_state().expect_err("Expected unknown key to fail.");

		assert!(err.to_string().contains("colour"), "Unexpected error: {err}");
	}

	#[test]
	fn map_page_defaults_to_first_page() {
		let args = Args::try_parse_from(["aqua", "-c", "aqua.toml", "map"])
			.expect("Failed to parse args.");

		assert!(matches!(args.command, Command::Map { page: 0, .. }));
		assert_eq!(args.format, OutputFormat::Table);
		assert_eq!(args.today, None);
	}

	#[test]
	fn password_is_read_from_a_single_line() {
		let password = super::read_password("s3cret\r\nignored\n".as_bytes())
			.expect("Failed to read password.");

		assert_eq!(password, "s3cret");
		assert!(super::read_password("\n".as_bytes()).is_err());
	}
}
