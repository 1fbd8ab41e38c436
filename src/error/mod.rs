//! General errors that can occur.

mod decoder;
pub use decoder::DecodeError;

mod source;
pub use source::SourceError;

mod seek;
pub use seek::SeekError;

mod output;
pub use output::OutputError;

mod config;
pub use config::ConfigError;

mod error;
pub use error::StationError;
