//---------------------------------------------------------------------------------------------------- Config Errors
use std::path::PathBuf;

#[allow(unused_imports)] // docs
use crate::config::Config;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
/// Errors returned by [`Config::validate`]
pub enum ConfigError {
	#[error("music directory does not exist: {0}")]
	/// [`Config::music_dir`] is not a directory
	MusicDir(PathBuf),

	#[error("track file extension is empty")]
	/// [`Config::extension`] is empty
	Extension,

	#[error("refresh period must be non-zero")]
	/// [`Config::refresh_period`] is zero
	RefreshPeriod,

	#[error("audio buffer must be non-zero milliseconds")]
	/// [`Config::buffer_milliseconds`] is `Some(0)`
	BufferMilliseconds,
}
