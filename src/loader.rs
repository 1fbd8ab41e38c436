//! Turning an [`Hour`] into an opened [`TrackSource`].

//---------------------------------------------------------------------------------------------------- Use
use crate::{
	error::SourceError,
	hour::Hour,
	source::{SourceDecode,TrackSource},
	macros::debug2,
};
use std::path::{Path,PathBuf};

//---------------------------------------------------------------------------------------------------- Loader
/// Opens the track belonging to an [`Hour`].
///
/// This is only ever called off the audio thread,
/// it is free to block on file IO and probing.
///
/// Any `Fn(Hour) -> Result<S, SourceError>` is a loader.
pub trait Loader {
	/// The kind of source this loader opens.
	type Source: TrackSource;

	/// Open the track for `hour`.
	///
	/// # Errors
	/// If the track is missing or is not decodable audio.
	fn open(&self, hour: Hour) -> Result<Self::Source, SourceError>;
}

impl<S, F> Loader for F
where
	S: TrackSource,
	F: Fn(Hour) -> Result<S, SourceError>,
{
	type Source = S;

	fn open(&self, hour: Hour) -> Result<S, SourceError> {
		self(hour)
	}
}

//---------------------------------------------------------------------------------------------------- DirLoader
#[derive(Clone,Debug,PartialEq,Eq,Hash)]
/// Loads `<dir>/<HH>.<extension>` with [`SourceDecode`].
///
/// ```rust
/// # use hourly::loader::DirLoader;
/// # use hourly::hour::Hour;
/// let loader = DirLoader::new("music", "flac");
/// assert_eq!(loader.path(Hour::new(7)), std::path::Path::new("music/07.flac"));
/// ```
pub struct DirLoader {
	dir: PathBuf,
	extension: String,
}

impl DirLoader {
	#[must_use]
	/// Load tracks from `dir`, with the file extension `extension` (no dot).
	pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
		Self {
			dir: dir.into(),
			extension: extension.into(),
		}
	}

	#[must_use]
	/// The directory tracks are loaded from.
	pub fn dir(&self) -> &Path {
		&self.dir
	}

	#[must_use]
	/// The file that belongs to `hour`.
	pub fn path(&self, hour: Hour) -> PathBuf {
		self.dir.join(hour.file_name(&self.extension))
	}
}

impl Loader for DirLoader {
	type Source = SourceDecode;

	fn open(&self, hour: Hour) -> Result<SourceDecode, SourceError> {
		let path = self.path(hour);
		debug2!("DirLoader - opening {}", path.display());
		SourceDecode::open(&path)
	}
}
