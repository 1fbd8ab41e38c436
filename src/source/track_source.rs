//! The capability every queued track needs.

//---------------------------------------------------------------------------------------------------- Use
use crate::{
	error::SeekError,
	source::{Frame,Pull},
};

#[allow(unused_imports)] // docs
use crate::queue::Queue;

//---------------------------------------------------------------------------------------------------- TrackSource
/// An opened, seekable, closable stream of stereo [`Frame`]'s.
///
/// A [`Queue`] owns its sources exclusively and is the one
/// that closes them, exactly once, when they are evicted.
///
/// # Real-time
/// [`TrackSource::pull`] is called from inside the audio callback.
/// It must not block on anything besides its own (bounded) decoding.
pub trait TrackSource {
	/// Fill `frames` from the current position.
	///
	/// - [`Pull::Full`] means every frame of `frames` was written
	/// - [`Pull::End`] means the stream ended after `n` frames
	/// - [`Pull::Error`] means decoding failed after `n` frames
	///
	/// An empty `frames` returns [`Pull::Full`].
	/// A closed source returns `Pull::End(0)`.
	fn pull(&mut self, frames: &mut [Frame]) -> Pull;

	/// Move the read position to `frame`, `0` being the very start.
	///
	/// # Errors
	/// If the underlying stream cannot seek, or the source is closed.
	fn seek(&mut self, frame: u64) -> Result<(), SeekError>;

	/// Stop producing frames.
	///
	/// After this, [`TrackSource::pull`] returns `Pull::End(0)` and
	/// [`TrackSource::seek`] fails. The memory and file handles behind
	/// the source are freed on drop, which the queue does off the
	/// audio thread.
	///
	/// Calling this more than once does nothing.
	fn close(&mut self);

	/// If [`TrackSource::close`] was called.
	fn is_closed(&self) -> bool;

	/// The native sample rate of the frames.
	fn sample_rate(&self) -> u32;
}
