//! The running station, everything wired together.

//---------------------------------------------------------------------------------------------------- Use
use crate::{
	config::{Config,GC_CHANNEL_LEN},
	error::{OutputError,StationError},
	gc::Gc,
	hour::{Hour,HourResolver},
	loader::{DirLoader,Loader},
	output::{AudioOutput,AudioOutputStruct,OutputSpec,AUDIO_OUTPUT_BACKEND},
	queue::{Queue,StreamQueue,Track},
	source::{SourceDecode,TrackSource},
	trigger::RefreshTrigger,
	macros::{debug2,error2,info2},
};
use crossbeam::channel::{Sender,bounded};
use std::thread::JoinHandle;

//---------------------------------------------------------------------------------------------------- Station
/// A gapless audio stream that plays one track per hour of the day.
///
/// The track for the current hour loops until the hour changes,
/// then the next hour's track starts exactly where the old one ends.
///
/// Dropping the `Station` stops playback and joins its threads.
///
/// ```rust,no_run
/// # use hourly::{Station,config::Config};
/// let station = Station::init(Config {
///     music_dir: "/srv/hourly".into(),
///     ..Default::default()
/// }).unwrap();
///
/// // Blocks until the audio device gives out.
/// let error = station.run();
/// eprintln!("{error}");
/// ```
pub struct Station<S: TrackSource + Send + 'static = SourceDecode> {
	queue: StreamQueue<S>,
	output: AudioOutputStruct,

	// Shutdown signals for our threads.
	trigger_shutdown: Sender<()>,
	gc_shutdown: Sender<()>,

	trigger: Option<JoinHandle<()>>,
	gc: Option<JoinHandle<()>>,
}

//---------------------------------------------------------------------------------------------------- Station Impl
impl Station<SourceDecode> {
	#[cold]
	#[inline(never)]
	/// Start playing `<music_dir>/<HH>.<extension>` for the current hour.
	///
	/// # Errors
	/// - the config is invalid
	/// - the current hour's track could not be opened
	/// - the audio device could not be opened
	/// - a thread could not be spawned
	pub fn init(config: Config) -> Result<Self, StationError> {
		let loader = DirLoader::new(config.music_dir.clone(), config.extension.clone());
		let clock  = config.clock;
		Self::init_with(config, clock, loader)
	}
}

impl<S: TrackSource + Send + 'static> Station<S> {
	#[cold]
	#[inline(never)]
	/// [`Station::init`], but with a custom hour resolver and track loader.
	///
	/// [`Config::clock`], [`Config::music_dir`] and [`Config::extension`]
	/// are only validated, `resolver` and `loader` are used instead.
	///
	/// # Errors
	/// See [`Station::init`].
	pub fn init_with<R, L>(
		mut config: Config,
		resolver: R,
		loader: L,
	) -> Result<Self, StationError>
	where
		R: HourResolver + Send + 'static,
		L: Loader<Source = S> + Send + 'static,
	{
		debug2!("Station - init(), config: {config:#?}");
		config.validate()?;

		// The first track is loaded before anything
		// else starts, with nothing to play there's no point.
		let hour = resolver.resolve();
		let source = loader.open(hour)?;
		let sample_rate = source.sample_rate();
		info2!("Station - starting at hour {hour}, sample rate: {sample_rate}");

		//-------------------------------------------------------------- Spawn [Gc]
		let (gc_shutdown, shutdown)  = bounded(1);
		let (to_gc,       from_queue) = bounded(GC_CHANNEL_LEN);
		let gc = Gc { shutdown, from_queue }.init()?;

		//-------------------------------------------------------------- Queue
		let mut queue = Queue::new().with_gc(to_gc);
		if let Some(callback) = config.on_switch.take() {
			queue = queue.with_callback(callback);
		}
		let queue = StreamQueue::new(queue);
		queue.set_next(Track { hour, source });

		//-------------------------------------------------------------- Output
		let spec = OutputSpec {
			sample_rate,
			buffer_milliseconds: config.buffer_milliseconds,
		};
		let mut output = AudioOutputStruct::try_open(queue.clone(), spec)?;
		output.play()?;
		info2!("Station - playing on {AUDIO_OUTPUT_BACKEND}");

		//-------------------------------------------------------------- Spawn [RefreshTrigger]
		let (trigger_shutdown, shutdown) = bounded(1);
		let trigger = RefreshTrigger::new(resolver, loader, queue.clone(), Some(hour))
			.with_reload_on_stall(config.reload_on_stall)
			.with_sample_rate(output.spec().sample_rate)
			.spawn(config.refresh_period, config.trigger_low_priority, shutdown)?;

		Ok(Self {
			queue,
			output,
			trigger_shutdown,
			gc_shutdown,
			trigger: Some(trigger),
			gc: Some(gc),
		})
	}

	#[cold]
	#[inline(never)]
	/// Block until the audio output dies, and return why.
	///
	/// In normal operation this never returns.
	pub fn run(&self) -> StationError {
		let error = self.output.errors().recv().unwrap_or(OutputError::StreamClosed);
		StationError::Output(error)
	}

	#[must_use]
	/// The shared queue the audio output is pulling from.
	pub const fn queue(&self) -> &StreamQueue<S> {
		&self.queue
	}

	#[must_use]
	/// The hour currently playing.
	pub fn now_playing(&self) -> Option<Hour> {
		self.queue.current_hour()
	}

	#[must_use]
	/// The sample rate the audio output was opened with.
	pub fn sample_rate(&self) -> u32 {
		self.output.spec().sample_rate
	}

	#[must_use]
	/// If audio is currently playing.
	pub fn is_playing(&self) -> bool {
		self.output.is_playing()
	}

	/// Resume playback.
	///
	/// # Errors
	/// If the audio output refused.
	pub fn play(&mut self) -> Result<(), StationError> {
		Ok(self.output.play()?)
	}

	/// Pause playback.
	///
	/// The queue is left as is, the current
	/// track resumes from the same frame.
	///
	/// # Errors
	/// If the audio output refused.
	pub fn pause(&mut self) -> Result<(), StationError> {
		Ok(self.output.pause()?)
	}

	/// Pause if playing, play if paused.
	///
	/// # Errors
	/// If the audio output refused.
	pub fn toggle(&mut self) -> Result<(), StationError> {
		Ok(self.output.toggle()?)
	}
}

impl<S: TrackSource + Send + 'static> Drop for Station<S> {
	#[cold]
	#[inline(never)]
	fn drop(&mut self) {
		debug2!("Station - shutting down");

		// [RefreshTrigger] first, it could be
		// about to hand [Gc] something.
		drop(self.trigger_shutdown.try_send(()));
		if let Some(trigger) = self.trigger.take() {
			if trigger.join().is_err() {
				error2!("Station - RefreshTrigger panicked");
			}
		}

		drop(self.gc_shutdown.try_send(()));
		if let Some(gc) = self.gc.take() {
			if gc.join().is_err() {
				error2!("Station - Gc panicked");
			}
		}
	}
}

impl<S: TrackSource + Send + 'static> std::fmt::Debug for Station<S> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Station")
			.field("now_playing", &self.now_playing())
			.field("state", &self.queue.state())
			.field("backend", &AUDIO_OUTPUT_BACKEND)
			.field("playing", &self.is_playing())
			.finish_non_exhaustive()
	}
}

//---------------------------------------------------------------------------------------------------- TESTS
#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		config::Callback,
		error::SourceError,
		hour::Clock,
		tests::{MemorySource,WAV_SAMPLE_RATE,memory_loader,write_wav,write_wav_at},
	};
	use pretty_assertions::assert_eq;
	use std::{
		sync::{
			Arc,
			atomic::{AtomicU8,Ordering},
		},
		time::Duration,
	};

	fn config(dir: &std::path::Path) -> Config {
		Config {
			music_dir: dir.to_path_buf(),
			extension: "wav".into(),
			refresh_period: Duration::from_millis(10),
			trigger_low_priority: false,
			..Default::default()
		}
	}

	/// Wait until the dummy output pulled at least `frames` frames.
	fn wait_for_frames<S: TrackSource + Send + 'static>(station: &Station<S>, frames: u64) -> bool {
		for _ in 0..500 {
			if station.output.frames() >= frames {
				return true;
			}
			std::thread::sleep(Duration::from_millis(5));
		}
		false
	}

	#[test]
	fn plays_from_disk() {
		let dir = tempfile::tempdir().unwrap();
		write_wav(dir.path(), "03.wav", 2, 4_410, 16384);

		let station = Station::init_with(
			config(dir.path()),
			|| Hour::new(3),
			DirLoader::new(dir.path(), "wav"),
		).unwrap();

		assert_eq!(station.now_playing(), Some(Hour::new(3)));
		assert_eq!(station.sample_rate(), WAV_SAMPLE_RATE);
		assert!(station.is_playing());

		// Several times the track length, so it looped.
		assert!(wait_for_frames(&station, 20_000));
		assert_eq!(station.now_playing(), Some(Hour::new(3)));
		assert!(!station.queue().is_stalled());
	}

	#[test]
	fn init_reads_music_dir() {
		let dir = tempfile::tempdir().unwrap();
		let hour = Clock::Local.resolve();
		// Every hour, in case it rolls over mid-test.
		for h in 0..Hour::COUNT {
			write_wav(dir.path(), &Hour::new(h).file_name("wav"), 1, 1_000, 100);
		}

		let station = Station::init(config(dir.path())).unwrap();
		let now = station.now_playing().unwrap();
		assert!(now == hour || now == hour.next());
	}

	#[test]
	fn missing_initial_track() {
		let dir = tempfile::tempdir().unwrap();
		let result = Station::init_with(
			config(dir.path()),
			|| Hour::new(3),
			DirLoader::new(dir.path(), "wav"),
		);
		assert!(matches!(result, Err(StationError::Source(SourceError::File(_)))));
	}

	#[test]
	fn invalid_config() {
		let dir = tempfile::tempdir().unwrap();
		let mut config = config(dir.path());
		config.refresh_period = Duration::ZERO;
		let result = Station::init_with(config, || Hour::new(0), memory_loader(100));
		assert!(matches!(result, Err(StationError::Config(_))));
	}

	#[test]
	fn switches_on_hour_change() {
		let dir = tempfile::tempdir().unwrap();
		let now = Arc::new(AtomicU8::new(22));
		let resolver = {
			let now = Arc::clone(&now);
			move || Hour::new(now.load(Ordering::SeqCst))
		};

		let (send, recv) = crossbeam::channel::unbounded();
		let mut config = config(dir.path());
		config.on_switch = Some(Callback::Channel(send));

		// ~100ms per track.
		let station = Station::init_with(config, resolver, memory_loader(4_410)).unwrap();
		assert_eq!(station.now_playing(), Some(Hour::new(22)));

		now.store(23, Ordering::SeqCst);
		assert_eq!(recv.recv_timeout(Duration::from_secs(5)).unwrap(), Hour::new(23));
		assert_eq!(station.now_playing(), Some(Hour::new(23)));

		now.store(0, Ordering::SeqCst);
		assert_eq!(recv.recv_timeout(Duration::from_secs(5)).unwrap(), Hour::MIDNIGHT);
		assert_eq!(station.now_playing(), Some(Hour::MIDNIGHT));
	}

	#[test]
	fn gc_survives_switches() {
		let dir = tempfile::tempdir().unwrap();
		let now = Arc::new(AtomicU8::new(5));
		let resolver = {
			let now = Arc::clone(&now);
			move || Hour::new(now.load(Ordering::SeqCst))
		};

		let (send, recv) = crossbeam::channel::unbounded();
		let mut config = config(dir.path());
		config.on_switch = Some(Callback::Channel(send));

		let mut station = Station::init_with(config, resolver, memory_loader(4_410)).unwrap();

		// Every switch evicts a track into [Gc].
		for hour in [6, 7, 8] {
			now.store(hour, Ordering::SeqCst);
			assert_eq!(recv.recv_timeout(Duration::from_secs(5)).unwrap(), Hour::new(hour));
		}

		let gc = station.gc.take().unwrap();
		assert!(!gc.is_finished());
		station.gc_shutdown.send(()).unwrap();
		assert!(gc.join().is_ok());
	}

	#[test]
	fn sample_rate_mismatch_is_skipped() {
		let dir = tempfile::tempdir().unwrap();
		write_wav(dir.path(), "03.wav", 2, 4_410, 16384);
		write_wav_at(dir.path(), "04.wav", 22_050, 2, 4_410, 8192);

		let now = Arc::new(AtomicU8::new(3));
		let resolver = {
			let now = Arc::clone(&now);
			move || Hour::new(now.load(Ordering::SeqCst))
		};

		let station = Station::init_with(
			config(dir.path()),
			resolver,
			DirLoader::new(dir.path(), "wav"),
		).unwrap();
		assert_eq!(station.sample_rate(), WAV_SAMPLE_RATE);

		now.store(4, Ordering::SeqCst);
		// Many refresh periods and loops of hour 3.
		assert!(wait_for_frames(&station, 20_000));
		std::thread::sleep(Duration::from_millis(100));

		assert_eq!(station.now_playing(), Some(Hour::new(3)));
		assert_eq!(station.queue().next_hour(), None);
		assert!(!station.queue().is_stalled());

		// Re-encoded at the right rate, picked up on the next cycle.
		let fixed = write_wav(dir.path(), "04.tmp", 2, 4_410, 8192);
		std::fs::rename(fixed, dir.path().join("04.wav")).unwrap();
		for _ in 0..500 {
			if station.now_playing() == Some(Hour::new(4)) {
				break;
			}
			std::thread::sleep(Duration::from_millis(5));
		}
		assert_eq!(station.now_playing(), Some(Hour::new(4)));
	}

	#[test]
	fn pause_and_resume() {
		let dir = tempfile::tempdir().unwrap();
		let mut station = Station::init_with(config(dir.path()), || Hour::new(1), memory_loader(1_000)).unwrap();

		station.pause().unwrap();
		assert!(!station.is_playing());
		station.toggle().unwrap();
		assert!(station.is_playing());
		station.pause().unwrap();
		station.play().unwrap();
		assert!(station.is_playing());
	}

	#[test]
	fn run_returns_output_error() {
		let dir = tempfile::tempdir().unwrap();
		let station = Station::<MemorySource>::init_with(config(dir.path()), || Hour::new(1), memory_loader(1_000)).unwrap();

		station.output.fail(OutputError::DeviceUnavailable);
		assert!(matches!(station.run(), StationError::Output(OutputError::DeviceUnavailable)));
	}
}
