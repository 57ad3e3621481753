use std::{fs, process};

use clap::Parser;

use aqua::Args;
use aqua_testkit::{MockWaterApi, WaterBuilder};

#[tokio::test]
async fn priorities_run_against_mock_api() {
	let records = [
		WaterBuilder::new(1).name("Lake Balkhash").condition(2).aged(16),
		WaterBuilder::new(2).name("Kapchagay").condition(5),
	]
	.iter()
	.map(WaterBuilder::raw)
	.collect();
	let api = MockWaterApi::start(records).await.expect("Failed to start mock API.");
	let path = std::env::temp_dir().join(format!("aqua-cli-{}.toml", process::id()));
	let config = format!(
		"[service]\nlog_level = \"warn\"\n\n[api]\nbase_url = \"{}\"\ntimeout_ms = 5000\n\
		page_size = 50\nmax_pages = 10\n\n[auth]\nrefresh_on_unauthorized = true\n\n\
		[priorities]\nfetch_limit = 50\n",
		api.base_url()
	);

	fs::write(&path, config).expect("Failed to write config.");

	let args = Args::try_parse_from([
		"aqua",
		"-c",
		path.to_str().expect("temp path is UTF-8"),
		"--today",
		"2026-10-19",
		"--format",
		"json",
		"priorities",
		"--filter",
		"priority=high",
	])
	.expect("Failed to parse args.");
	let result = aqua::run(args).await;

	let _ = fs::remove_file(&path);

	result.expect("Failed to run priorities.");

	assert_eq!(api.requests_to("/waters").len(), 1);
}
