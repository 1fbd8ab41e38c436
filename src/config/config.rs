//! [`Config`] and its validation.

//---------------------------------------------------------------------------------------------------- use
use std::{
	path::PathBuf,
	time::Duration,
};
use crate::{
	config::{Callback,DEFAULT_MUSIC_DIR,DEFAULT_EXTENSION,DEFAULT_REFRESH_PERIOD,DEFAULT_BUFFER_MILLISECONDS},
	error::ConfigError,
	hour::Clock,
};

#[allow(unused_imports)] // docs
use crate::Station;

//---------------------------------------------------------------------------------------------------- Config
/// Initialization config for the [`Station`].
///
/// This is passed once to [`Station::init`] and
/// used for the rest of the `Station`'s lifetime.
///
/// ```rust
/// # use hourly::config::*;
/// # use hourly::hour::Clock;
/// let config = Config {
///     music_dir: "/srv/hourly".into(),
///     clock:     Clock::Utc,
///     ..Default::default()
/// };
/// assert_eq!(config.extension, "flac");
/// ```
#[derive(Debug)]
pub struct Config {
	//------------------------------------------ Tracks
	/// Directory holding one track per hour, named `00` to `23`.
	pub music_dir: PathBuf,

	/// File extension of the tracks, without the dot.
	///
	/// The container is probed from the data itself,
	/// this only builds the file name.
	pub extension: String,

	//------------------------------------------ Schedule
	/// Which clock decides the current hour.
	pub clock: Clock,

	/// How often the clock is checked for a new hour.
	///
	/// This must be a lot shorter than the tracks themselves,
	/// the next track has to be loaded before the current one runs out.
	pub refresh_period: Duration,

	/// If the current track could not be rewound (the stream "stalled"),
	/// re-open the same hour from disk on the next refresh.
	///
	/// With this `false`, a stalled stream stays silent
	/// until the hour changes.
	pub reload_on_stall: bool,

	/// Whether to set the refresh thread to the lowest possible priority.
	///
	/// [`lpt`] is used to set low priority.
	pub trigger_low_priority: bool,

	//------------------------------------------ Output
	/// How many milliseconds of audio the device buffers.
	///
	/// [`DEFAULT_BUFFER_MILLISECONDS`] by default,
	/// `None` leaves it up to the audio backend.
	pub buffer_milliseconds: Option<u16>,

	/// Called on the audio thread every time a new track starts.
	pub on_switch: Option<Callback>,
}

//---------------------------------------------------------------------------------------------------- Config Impl
impl Config {
	/// Check that `self` can actually be used.
	///
	/// # Errors
	/// Returns the first problem found.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if !self.music_dir.is_dir() {
			return Err(ConfigError::MusicDir(self.music_dir.clone()));
		}
		if self.extension.is_empty() {
			return Err(ConfigError::Extension);
		}
		if self.refresh_period.is_zero() {
			return Err(ConfigError::RefreshPeriod);
		}
		if self.buffer_milliseconds == Some(0) {
			return Err(ConfigError::BufferMilliseconds);
		}
		Ok(())
	}
}

impl Default for Config {
	/// A reasonable default [`Config`].
	///
	/// ```rust
	/// # use hourly::config::*;
	/// # use hourly::hour::Clock;
	/// let config = Config::default();
	/// assert_eq!(config.music_dir,            std::path::PathBuf::from("music"));
	/// assert_eq!(config.extension,            "flac");
	/// assert_eq!(config.clock,                Clock::Local);
	/// assert_eq!(config.refresh_period,       std::time::Duration::from_secs(120));
	/// assert_eq!(config.reload_on_stall,      true);
	/// assert_eq!(config.trigger_low_priority, true);
	/// assert_eq!(config.buffer_milliseconds,  Some(100));
	/// assert!(config.on_switch.is_none());
	/// ```
	fn default() -> Self {
		Self {
			music_dir:            PathBuf::from(DEFAULT_MUSIC_DIR),
			extension:            DEFAULT_EXTENSION.into(),
			clock:                Clock::Local,
			refresh_period:       DEFAULT_REFRESH_PERIOD,
			reload_on_stall:      true,
			trigger_low_priority: true,
			buffer_milliseconds:  Some(DEFAULT_BUFFER_MILLISECONDS),
			on_switch:            None,
		}
	}
}

//---------------------------------------------------------------------------------------------------- TESTS
#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	fn config(dir: &std::path::Path) -> Config {
		Config {
			music_dir: dir.to_path_buf(),
			..Default::default()
		}
	}

	#[test]
	fn valid() {
		let dir = tempfile::tempdir().unwrap();
		assert_eq!(config(dir.path()).validate(), Ok(()));
	}

	#[test]
	fn invalid() {
		let dir = tempfile::tempdir().unwrap();

		let missing = dir.path().join("missing");
		assert_eq!(config(&missing).validate(), Err(ConfigError::MusicDir(missing)));

		let mut c = config(dir.path());
		c.extension = String::new();
		assert_eq!(c.validate(), Err(ConfigError::Extension));

		let mut c = config(dir.path());
		c.refresh_period = Duration::ZERO;
		assert_eq!(c.validate(), Err(ConfigError::RefreshPeriod));

		let mut c = config(dir.path());
		c.buffer_milliseconds = Some(0);
		assert_eq!(c.validate(), Err(ConfigError::BufferMilliseconds));
	}
}
