//---------------------------------------------------------------------------------------------------- use
use crate::error::{OutputError,SourceError,ConfigError};

#[allow(unused_imports)] // docs
use crate::Station;

//---------------------------------------------------------------------------------------------------- Station Errors
#[derive(thiserror::Error, Debug)]
/// All errors that can stop a [`Station`].
///
/// Everything here happens outside of the real-time audio path,
/// either while starting up or when the audio device gives out.
pub enum StationError {
	#[error("invalid config: {0}")]
	/// The [`crate::config::Config`] was rejected before anything started
	Config(#[from] ConfigError),

	#[error("failed to load the initial track: {0}")]
	/// The track for the starting hour could not be opened,
	/// there is nothing to play
	Source(#[from] SourceError),

	#[error("audio output error: {0}")]
	/// The audio output could not be opened, or died while playing
	Output(#[from] OutputError),

	#[error("failed to spawn thread: {0}")]
	/// An internal thread could not be spawned
	Thread(#[from] std::io::Error),
}
