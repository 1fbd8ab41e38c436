//---------------------------------------------------------------------------------------------------- Seek Errors
#[allow(unused_imports)] // docs
use crate::source::TrackSource;

#[derive(thiserror::Error, Debug)]
/// Errors when seeking a [`TrackSource`]
///
/// The queue only ever seeks to rewind a track that ran out
/// with nothing queued after it. A failure here leaves the
/// queue "stalled", it does not stop the audio callback.
pub enum SeekError {
	#[error("the source was already closed")]
	/// The source was closed before the seek
	Closed,

	#[error("the source does not support seeking")]
	/// The source cannot seek at all
	Unsupported,

	#[error("failed to seek: {0}")]
	/// The container/codec refused the seek
	Seek(#[from] symphonia::core::errors::Error),
}
