//! Defaults for [`crate::config::Config`].

//---------------------------------------------------------------------------------------------------- Use
use std::time::Duration;

//---------------------------------------------------------------------------------------------------- Constants
/// Directory holding the 24 hourly tracks.
pub const DEFAULT_MUSIC_DIR: &str = "music";

/// File extension of the hourly tracks.
pub const DEFAULT_EXTENSION: &str = "flac";

/// How often the clock is checked for a new hour, in seconds.
pub const DEFAULT_REFRESH_SECS: u64 = 120;

/// [`DEFAULT_REFRESH_SECS`] as a [`Duration`].
pub const DEFAULT_REFRESH_PERIOD: Duration = Duration::from_secs(DEFAULT_REFRESH_SECS);

/// How many milliseconds of audio the device buffers.
pub const DEFAULT_BUFFER_MILLISECONDS: u16 = 100;

/// How many evicted tracks can be waiting for the `Gc` thread.
///
/// At most one track is evicted per switch, so this never fills up.
pub(crate) const GC_CHANNEL_LEN: usize = 8;
