//! Audio hardware output
//!
//! This file implements the abstract `AudioOutput`
//! trait using `cpal` as a backend.
//!
//! For documentation on `AudioOutput`, see `output.rs`.

//----------------------------------------------------------------------------------------------- use
use crate::{
	error::OutputError,
	output::{AudioOutput,OutputSpec,output::write_frames},
	queue::StreamQueue,
	source::{SILENCE,TrackSource},
	macros::{debug2,error2,trace2},
};
use crate::output::constants::{FRAME_BUFFER_LEN,MAX_CHANNELS};
use crossbeam::channel::Receiver;
use std::borrow::Cow;
use cpal::traits::{DeviceTrait,StreamTrait,HostTrait};

//----------------------------------------------------------------------------------------------- Cpal
/// An output stream on the default `cpal` device.
///
/// The stream's data callback pulls straight from the
/// [`StreamQueue`], there is no buffering in between.
pub(crate) struct Cpal {
	/// The actual audio stream.
	stream: cpal::Stream,

	/// Errors `cpal` reported through its error callback.
	error: Receiver<OutputError>,

	/// Audio spec output was opened with.
	spec: OutputSpec,

	/// Are we currently playing?
	playing: bool,
}

//----------------------------------------------------------------------------------------------- `AudioOutput` Impl
impl AudioOutput for Cpal {
	#[cold]
	#[inline(never)]
	fn try_open<S>(queue: StreamQueue<S>, spec: OutputSpec) -> Result<Self, OutputError>
	where
		S: TrackSource + Send + 'static,
	{
		debug2!("AudioOutput - try_open(), spec: {spec:?}");

		if spec.sample_rate == 0 {
			return Err(OutputError::InvalidSampleRate);
		}

		// Get default host.
		let host = cpal::default_host();

		// Get the default audio output device.
		let Some(device) = host.default_output_device() else {
			return Err(OutputError::DeviceUnavailable);
		};

		// Get the default device config,
		// we only care about how many speakers there are.
		let default = device.default_output_config()?;
		debug2!("AudioOutput - device_config:\n{default:#?}");

		let buffer_size = match spec.buffer_frames() {
			Some(frames) => cpal::BufferSize::Fixed(frames),
			None => cpal::BufferSize::Default,
		};

		// Output audio stream config.
		let config = cpal::StreamConfig {
			channels: default.channels().clamp(1, MAX_CHANNELS),
			sample_rate: cpal::SampleRate(spec.sample_rate),
			buffer_size,
		};
		debug2!("AudioOutput - config:\n{config:#?}");

		let channels = usize::from(config.channels);
		let (error_send, error_recv) = crossbeam::channel::unbounded();

		// INVARIANT: allocated once, here, never in the callback.
		let mut frames = vec![SILENCE; FRAME_BUFFER_LEN];

		// The actual callback `cpal` will call when polling for audio data.
		let data_callback = move |output: &mut [f32], _: &cpal::OutputCallbackInfo| {
			trace2!("AudioOutput - data callback, output.len(): {}", output.len());

			for chunk in output.chunks_mut(FRAME_BUFFER_LEN * channels) {
				let len = chunk.len() / channels;
				let produced = queue.produce(&mut frames[..len]);
				write_frames(&frames[..produced.frames], chunk, channels);
			}
		};

		// The callback `cpal` will call when errors occur.
		let error_callback = move |error: cpal::StreamError| {
			let error = OutputError::from(error);
			error2!("AudioOutput - stream error: {error}");
			drop(error_send.try_send(error));
		};

		// Build the audio stream.
		let stream = device.build_output_stream(&config, data_callback, error_callback, None)?;

		// Some backends start streams immediately.
		stream.pause()?;

		Ok(Self {
			stream,
			error: error_recv,
			spec,
			playing: false,
		})
	}

	fn play(&mut self) -> Result<(), OutputError> {
		debug2!("AudioOutput - play()");
		self.stream.play()?;
		self.playing = true;
		Ok(())
	}

	fn pause(&mut self) -> Result<(), OutputError> {
		debug2!("AudioOutput - pause()");
		self.stream.pause()?;
		self.playing = false;
		Ok(())
	}

	fn is_playing(&self) -> bool {
		self.playing
	}

	fn spec(&self) -> &OutputSpec {
		&self.spec
	}

	fn errors(&self) -> &Receiver<OutputError> {
		&self.error
	}
}

//----------------------------------------------------------------------------------------------- Error re-map
impl From<cpal::DefaultStreamConfigError> for OutputError {
	fn from(error: cpal::DefaultStreamConfigError) -> Self {
		use cpal::DefaultStreamConfigError as E;
		match error {
			E::DeviceNotAvailable => Self::DeviceUnavailable,
			E::StreamTypeNotSupported => Self::InvalidFormat,
			E::BackendSpecific { err } => Self::Unknown(Cow::Owned(err.description)),
		}
	}
}

impl From<cpal::StreamError> for OutputError {
	fn from(error: cpal::StreamError) -> Self {
		use cpal::StreamError as E;
		match error {
			E::DeviceNotAvailable => Self::DeviceUnavailable,
			E::BackendSpecific { err } => Self::Unknown(Cow::Owned(err.description)),
		}
	}
}

impl From<cpal::BuildStreamError> for OutputError {
	fn from(error: cpal::BuildStreamError) -> Self {
		use cpal::BuildStreamError as E;
		match error {
			E::DeviceNotAvailable | E::StreamIdOverflow => Self::DeviceUnavailable,
			E::StreamConfigNotSupported | E::InvalidArgument => Self::InvalidFormat,
			E::BackendSpecific { err } => Self::Unknown(Cow::Owned(err.description)),
		}
	}
}

impl From<cpal::PlayStreamError> for OutputError {
	fn from(error: cpal::PlayStreamError) -> Self {
		use cpal::PlayStreamError as E;
		match error {
			E::DeviceNotAvailable => Self::DeviceUnavailable,
			E::BackendSpecific { err } => Self::Unknown(Cow::Owned(err.description)),
		}
	}
}

impl From<cpal::PauseStreamError> for OutputError {
	fn from(error: cpal::PauseStreamError) -> Self {
		use cpal::PauseStreamError as E;
		match error {
			E::DeviceNotAvailable => Self::DeviceUnavailable,
			E::BackendSpecific { err } => Self::Unknown(Cow::Owned(err.description)),
		}
	}
}
