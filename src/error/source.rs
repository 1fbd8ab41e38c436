//---------------------------------------------------------------------------------------------------- Source Errors
#[allow(unused_imports)] // docs
use crate::{loader::Loader, source::TrackSource};

#[derive(thiserror::Error, Debug)]
/// Errors when opening a [`TrackSource`]
///
/// This `enum` represents all the potential errors that can
/// occur when a [`Loader`] attempts to turn an hour into
/// a decodable audio stream.
///
/// This includes things like:
/// - The data not actually be audio
/// - File IO errors (non-existent PATH, lacking-permissions, etc)
/// - Unsupported audio codec
pub enum SourceError {
	#[error("failed to open file: {0}")]
	/// Error occurred while reading a [`std::fs::File`] (most likely missing)
	File(#[from] std::io::Error),

	#[error("failed to probe audio data: {0}")]
	/// Error occurred while attempting to probe the audio data
	Probe(#[from] symphonia::core::errors::Error),

	#[error("failed to create codec decoder: {0}")]
	/// Error occurred while creating a decoder for the audio codec
	Decoder(#[from] crate::error::DecodeError),

	#[error("failed to find a decodable track within the container")]
	/// The container held no track with a known codec
	Track,

	#[error("failed to find the codecs sample rate")]
	/// The audio codec did not specify a sample rate
	SampleRate,

	#[error("sample rate {found} does not match the output's {expected}")]
	/// The track's sample rate differs from the one the
	/// audio output was opened with, it would play at the wrong speed
	SampleRateMismatch {
		/// The audio output's sample rate
		expected: u32,
		/// The track's sample rate
		found: u32,
	},
}
