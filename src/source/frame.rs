//! Frames and the result of pulling them.

//---------------------------------------------------------------------------------------------------- Use
use crate::error::DecodeError;

#[allow(unused_imports)] // docs
use crate::source::TrackSource;

//---------------------------------------------------------------------------------------------------- Frame
/// One stereo sample pair, `[left, right]`.
pub type Frame = [f32; 2];

/// A frame of silence.
pub const SILENCE: Frame = [0.0; 2];

//---------------------------------------------------------------------------------------------------- Pull
#[derive(Debug)]
/// The outcome of [`TrackSource::pull`].
///
/// End-of-stream is explicit instead of being
/// inferred from a short fill.
pub enum Pull {
	/// The whole slice was filled.
	///
	/// The source may or may not have frames left, an exact
	/// fit only shows up as [`Pull::End`] on the next pull.
	Full,

	/// The source ran out after writing this many frames.
	End(usize),

	/// Decoding failed after writing `frames` frames.
	Error {
		/// Frames written before the error.
		frames: usize,
		/// What went wrong.
		error: DecodeError,
	},
}

impl Pull {
	#[must_use]
	/// How many frames were written into a slice of `len` frames.
	pub const fn frames(&self, len: usize) -> usize {
		match self {
			Self::Full => len,
			Self::End(frames) | Self::Error { frames, .. } => *frames,
		}
	}
}
