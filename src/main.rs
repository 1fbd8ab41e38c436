//! `hourly` - play one track per hour of the day, gaplessly.

//---------------------------------------------------------------------------------------------------- Use
use clap::Parser;
use hourly::{
	Station,
	config::{Config,DEFAULT_BUFFER_MILLISECONDS,DEFAULT_EXTENSION,DEFAULT_MUSIC_DIR,DEFAULT_REFRESH_SECS},
	hour::Clock,
};
use std::{
	path::PathBuf,
	process::ExitCode,
	time::Duration,
};

//---------------------------------------------------------------------------------------------------- Cli
/// Play `<music-dir>/<HH>.<extension>` for the current hour, looping,
/// and switch gaplessly when the hour changes.
#[derive(Parser, Debug)]
#[command(name = "hourly")]
#[command(version)]
struct Cli {
	/// Directory holding the tracks `00.<extension>` to `23.<extension>`
	#[arg(long, default_value = DEFAULT_MUSIC_DIR)]
	music_dir: PathBuf,

	/// File extension of the tracks
	#[arg(long, default_value = DEFAULT_EXTENSION)]
	extension: String,

	/// How often (in seconds) to check if the hour changed
	#[arg(long, default_value_t = DEFAULT_REFRESH_SECS)]
	refresh_secs: u64,

	/// Which clock decides the hour [local, utc]
	#[arg(long, default_value_t = Clock::Local)]
	clock: Clock,

	/// Audio device buffer size in milliseconds
	#[arg(long, default_value_t = DEFAULT_BUFFER_MILLISECONDS)]
	buffer_ms: u16,

	/// Let the audio backend pick the buffer size, ignores `--buffer-ms`
	#[arg(long)]
	backend_buffer: bool,

	/// Stay silent if a track can't be rewound, instead of re-opening it
	#[arg(long)]
	no_reload_on_stall: bool,

	/// Don't lower the priority of the refresh thread
	#[arg(long)]
	normal_priority: bool,
}

impl Cli {
	fn into_config(self) -> Config {
		Config {
			music_dir:            self.music_dir,
			extension:            self.extension,
			clock:                self.clock,
			refresh_period:       Duration::from_secs(self.refresh_secs),
			reload_on_stall:      !self.no_reload_on_stall,
			trigger_low_priority: !self.normal_priority,
			buffer_milliseconds:  (!self.backend_buffer).then_some(self.buffer_ms),
			on_switch:            None,
		}
	}
}

//---------------------------------------------------------------------------------------------------- Main
fn main() -> ExitCode {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let config = Cli::parse().into_config();
	log::info!("music directory: {}", config.music_dir.display());

	let station = match Station::init(config) {
		Ok(station) => station,
		Err(e) => {
			log::error!("failed to start: {e}");
			return ExitCode::FAILURE;
		},
	};

	let error = station.run();
	log::error!("stopped: {error}");
	ExitCode::FAILURE
}
