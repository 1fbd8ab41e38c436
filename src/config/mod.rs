//! Initialization configuration for the [`Station`].

#[allow(unused_imports)] // docs
use crate::Station;

mod callback;
pub use callback::Callback;

mod config;
pub use config::Config;

mod constants;
pub use constants::{
	DEFAULT_MUSIC_DIR,
	DEFAULT_EXTENSION,
	DEFAULT_REFRESH_PERIOD,
	DEFAULT_REFRESH_SECS,
	DEFAULT_BUFFER_MILLISECONDS,
};
pub(crate) use constants::GC_CHANNEL_LEN;
