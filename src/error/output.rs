//! Audio output errors.

//----------------------------------------------------------------------------------------------- AudioOutput Errors
/// Error that occurs when opening or driving the audio hardware/server.
///
/// This can be due to many reasons, e.g:
/// - Audio device was unplugged
/// - Audio server disconnected/killed
/// - The track's sample rate is not supported by the device
#[derive(thiserror::Error, Debug)]
pub enum OutputError {
	#[error("audio stream was closed")]
	/// The audio stream was closed.
	StreamClosed,

	#[error("audio hardware/server is unavailable")]
	/// The audio hardware/server is unavailable.
	DeviceUnavailable,

	#[error("audio format is invalid or unsupported")]
	/// The audio format is invalid or unsupported.
	InvalidFormat,

	#[error("audio sample rate is invalid")]
	/// The audio's sample rate was invalid.
	///
	/// This means a `0` sample rate.
	InvalidSampleRate,

	#[error("unknown error: {0}")]
	/// An unknown or very specific error occurred.
	///
	/// The `str` will contain more information.
	Unknown(std::borrow::Cow<'static, str>),
}
