//! Audio hardware output
//!
//! This file defines the structures and functions required to
//! get frames out of a [`StreamQueue`] and into the audio
//! hardware/server.
//!
//! The trait `AudioOutput` is the ideal abstract
//! simplification of what this part of the system should do.
//!
//! Unlike a push-based output, the backend's own callback
//! pulls from the queue, so there is no `write()` here.

//----------------------------------------------------------------------------------------------- use
use crate::{
	error::OutputError,
	queue::StreamQueue,
	source::{Frame,TrackSource},
	macros::debug2,
};
use crossbeam::channel::Receiver;

//----------------------------------------------------------------------------------------------- OutputSpec
#[derive(Copy,Clone,Debug,PartialEq,Eq,Hash)]
/// What an [`AudioOutput`] was opened with.
pub(crate) struct OutputSpec {
	/// Sample rate of the tracks, the stream is opened at this rate.
	pub(crate) sample_rate: u32,
	/// How many milliseconds the device buffers, `None` is backend default.
	pub(crate) buffer_milliseconds: Option<u16>,
}

impl OutputSpec {
	/// How many frames `buffer_milliseconds` is at `sample_rate`.
	pub(crate) fn buffer_frames(&self) -> Option<u32> {
		self.buffer_milliseconds
			.map(|ms| ((u64::from(self.sample_rate) * u64::from(ms)) / 1000) as u32)
	}
}

//----------------------------------------------------------------------------------------------- AudioOutput Trait
/// # Safety Notes
/// Implementors are expected to implement these functions
/// correctly according to the documentation invariants.
pub(crate) trait AudioOutput: Sized {
	/// Initialize a connection with the audio hardware/server.
	///
	/// The stream pulls its frames from `queue` once it is playing,
	/// and must be opened at `spec`'s sample rate.
	///
	/// The stream starts paused.
	fn try_open<S>(queue: StreamQueue<S>, spec: OutputSpec) -> Result<Self, OutputError>
	where
		S: TrackSource + Send + 'static;

	/// Start playback
	fn play(&mut self) -> Result<(), OutputError>;

	/// Pause playback
	///
	/// This should completely "disable" the stream so that
	/// it stops pulling from the queue and returns immediately.
	fn pause(&mut self) -> Result<(), OutputError>;

	/// Is the stream currently in play mode?
	fn is_playing(&self) -> bool;

	/// What this `AudioOutput` was created with.
	fn spec(&self) -> &OutputSpec;

	/// Errors the backend ran into while playing.
	///
	/// Anything received here means the stream is dead.
	/// Disconnection means the same.
	fn errors(&self) -> &Receiver<OutputError>;

	/// Toggle playback.
	fn toggle(&mut self) -> Result<(), OutputError> {
		debug2!("AudioOutput - toggle()");

		if self.is_playing() {
			self.pause()
		} else {
			self.play()
		}
	}
}

//----------------------------------------------------------------------------------------------- Frames
/// Copy `frames` into an interleaved `output` with `channels` channels.
///
/// - 1 channel gets the average of left and right
/// - 2 channels gets left and right
/// - any further channels are silent
///
/// Anything in `output` past `frames` is silenced, underruns
/// (an empty or stalled queue) must not replay stale samples.
pub(crate) fn write_frames(frames: &[Frame], output: &mut [f32], channels: usize) {
	if channels == 0 {
		return;
	}

	let mut chunks = output.chunks_exact_mut(channels);

	for (frame, chunk) in frames.iter().zip(chunks.by_ref()) {
		match chunk {
			[mono] => *mono = (frame[0] + frame[1]) / 2.0,
			[left, right, rest @ ..] => {
				*left  = frame[0];
				*right = frame[1];
				rest.fill(0.0);
			},
			[] => (),
		}
	}

	for chunk in chunks {
		chunk.fill(0.0);
	}
	// A trailing partial frame, if the device ever hands us one.
	let whole = (output.len() / channels) * channels;
	output[whole..].fill(0.0);
}
