//! Dummy audio hardware output.
//!
//! This file implements the abstract `AudioOutput`
//! trait using a fake dummy backend.
//!
//! A thread pulls from the queue every few milliseconds,
//! like a device callback would, but the frames don't
//! go anywhere, they are only counted.
//!
//! Functionally, it should behave the exact same
//! as other backends, except it doesn't actually
//! play any audio.
//!
//! This is used for testing purposes.

//----------------------------------------------------------------------------------------------- use
use crate::{
	error::OutputError,
	output::{AudioOutput,OutputSpec},
	queue::StreamQueue,
	source::{SILENCE,TrackSource},
	macros::{debug2,trace2},
};
use crate::output::constants::{DUMMY_PERIOD,FRAME_BUFFER_LEN};
use crossbeam::channel::{Receiver,RecvTimeoutError,Sender};
use std::{
	thread::JoinHandle,
	sync::{
		Arc,
		atomic::{AtomicBool,AtomicU64,Ordering},
	},
};

//----------------------------------------------------------------------------------------------- DummyAudioOutput
/// An output that pulls frames and throws them away.
pub(crate) struct DummyAudioOutput {
	/// Dropping this stops the dummy audio thread.
	shutdown: Option<Sender<()>>,
	/// The dummy audio thread.
	handle: Option<JoinHandle<()>>,

	/// Nothing ever fails here, but the sender is
	/// kept around so `errors()` never disconnects.
	error_send: Sender<OutputError>,
	error: Receiver<OutputError>,

	/// Audio spec output was opened with.
	spec: OutputSpec,

	/// Are we currently playing?
	playing: Arc<AtomicBool>,
	/// Total frames pulled from the queue.
	frames: Arc<AtomicU64>,
}

impl DummyAudioOutput {
	#[allow(dead_code)]
	/// Total frames pulled from the queue so far.
	pub(crate) fn frames(&self) -> u64 {
		self.frames.load(Ordering::Acquire)
	}

	#[allow(dead_code)]
	/// Pretend the device died.
	pub(crate) fn fail(&self, error: OutputError) {
		drop(self.error_send.try_send(error));
	}
}

//----------------------------------------------------------------------------------------------- `AudioOutput` Impl
impl AudioOutput for DummyAudioOutput {
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

		// How many frames a real device would want per period.
		let period_frames = (u128::from(spec.sample_rate) * DUMMY_PERIOD.as_millis() / 1000) as usize;
		let period_frames = period_frames.clamp(1, FRAME_BUFFER_LEN);

		let (shutdown, shutdown_recv) = crossbeam::channel::bounded::<()>(1);
		let (error_send, error_recv)  = crossbeam::channel::unbounded();
		let playing = Arc::new(AtomicBool::new(false));
		let frames  = Arc::new(AtomicU64::new(0));

		let playing_clone = Arc::clone(&playing);
		let frames_clone  = Arc::clone(&frames);
		let mut buffer = vec![SILENCE; period_frames];

		// Spawn the "dummy" audio thread.
		let handle = std::thread::Builder::new()
			.name("DummyAudioOutput".into())
			.spawn(move || loop {
				// Simulate 1 device period of playback time.
				match shutdown_recv.recv_timeout(DUMMY_PERIOD) {
					Err(RecvTimeoutError::Timeout) => (),
					Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
				}

				if !playing_clone.load(Ordering::Acquire) {
					continue;
				}

				let produced = queue.produce(&mut buffer);
				frames_clone.fetch_add(produced.frames as u64, Ordering::Release);
				trace2!("AudioOutput - data callback, written: {}", produced.frames);
			})
			.map_err(|e| OutputError::Unknown(e.to_string().into()))?;

		Ok(Self {
			shutdown: Some(shutdown),
			handle: Some(handle),
			error_send,
			error: error_recv,
			spec,
			playing,
			frames,
		})
	}

	fn play(&mut self) -> Result<(), OutputError> {
		debug2!("AudioOutput - play()");
		self.playing.store(true, Ordering::Release);
		Ok(())
	}

	fn pause(&mut self) -> Result<(), OutputError> {
		debug2!("AudioOutput - pause()");
		self.playing.store(false, Ordering::Release);
		Ok(())
	}

	fn is_playing(&self) -> bool {
		self.playing.load(Ordering::Acquire)
	}

	fn spec(&self) -> &OutputSpec {
		&self.spec
	}

	fn errors(&self) -> &Receiver<OutputError> {
		&self.error
	}
}

impl Drop for DummyAudioOutput {
	fn drop(&mut self) {
		drop(self.shutdown.take());
		if let Some(handle) = self.handle.take() {
			drop(handle.join());
		}
	}
}

//----------------------------------------------------------------------------------------------- TESTS
#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		hour::Hour,
		queue::{Queue,Track},
		tests::MemorySource,
	};
	use std::time::Duration;

	fn spec() -> OutputSpec {
		OutputSpec { sample_rate: 44_100, buffer_milliseconds: None }
	}

	/// Wait until the output has pulled at least `frames` frames.
	fn wait_for(output: &DummyAudioOutput, frames: u64) -> bool {
		for _ in 0..500 {
			if output.frames() >= frames {
				return true;
			}
			std::thread::sleep(Duration::from_millis(5));
		}
		false
	}

	#[test]
	fn pulls_while_playing() {
		let queue = StreamQueue::new(Queue::new());
		queue.set_next(Track { hour: Hour::new(0), source: MemorySource::constant(1.0, 1000) });

		let mut output = DummyAudioOutput::try_open(queue, spec()).unwrap();
		assert!(!output.is_playing());
		std::thread::sleep(DUMMY_PERIOD * 3);
		assert_eq!(output.frames(), 0);

		output.play().unwrap();
		assert!(output.is_playing());
		assert!(wait_for(&output, 5_000));

		output.toggle().unwrap();
		assert!(!output.is_playing());
	}

	#[test]
	fn empty_queue_pulls_nothing() {
		let queue = StreamQueue::<MemorySource>::new(Queue::new());
		let mut output = DummyAudioOutput::try_open(queue, spec()).unwrap();
		output.play().unwrap();
		std::thread::sleep(DUMMY_PERIOD * 3);
		assert_eq!(output.frames(), 0);
	}

	#[test]
	fn errors() {
		let queue = StreamQueue::<MemorySource>::new(Queue::new());
		let output = DummyAudioOutput::try_open(queue, spec()).unwrap();
		assert!(output.errors().try_recv().is_err());
		output.fail(OutputError::DeviceUnavailable);
		assert!(matches!(output.errors().try_recv(), Ok(OutputError::DeviceUnavailable)));
	}

	#[test]
	fn zero_sample_rate() {
		let queue = StreamQueue::<MemorySource>::new(Queue::new());
		let spec = OutputSpec { sample_rate: 0, buffer_milliseconds: None };
		assert!(matches!(DummyAudioOutput::try_open(queue, spec), Err(OutputError::InvalidSampleRate)));
	}
}
