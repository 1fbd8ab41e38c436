//! Periodic hour check that keeps the queue's `next` slot fed.

//---------------------------------------------------------------------------------------------------- Use
use crate::{
	error::SourceError,
	hour::{Hour,HourResolver},
	loader::Loader,
	queue::{StreamQueue,Track},
	source::TrackSource,
	macros::{debug2,info2,warn2},
};
use crossbeam::channel::{Receiver,RecvTimeoutError};
use std::{
	thread::JoinHandle,
	time::Duration,
};

//---------------------------------------------------------------------------------------------------- Refresh
#[derive(Copy,Clone,Debug,PartialEq,Eq,Hash)]
/// What a single [`RefreshTrigger::tick`] did.
pub enum Refresh {
	/// The hour has not changed since the last load, nothing was done.
	Unchanged(Hour),
	/// A new hour was loaded and queued as `next`.
	Loaded(Hour),
	/// The hour did not change, but the queue was stalled
	/// so the same hour was re-opened and queued as `next`.
	Reloaded(Hour),
}

//---------------------------------------------------------------------------------------------------- RefreshTrigger
/// Resolves the current hour and queues its track when it changes.
///
/// The track is fully opened before the queue's lock is taken,
/// the audio thread never waits on disk.
///
/// A failed load is not remembered as loaded,
/// so the next tick tries the same hour again.
/// With [`RefreshTrigger::with_sample_rate`] a track at
/// any other rate counts as a failed load.
pub struct RefreshTrigger<R, L: Loader> {
	resolver: R,
	loader: L,
	queue: StreamQueue<L::Source>,
	last_loaded: Option<Hour>,
	reload_on_stall: bool,
	sample_rate: Option<u32>,
}

impl<R, L> RefreshTrigger<R, L>
where
	R: HourResolver,
	L: Loader,
{
	#[must_use]
	/// Create a trigger feeding `queue`.
	///
	/// `last_loaded` is the hour already in the queue, if any.
	/// Stall reloading is on by default.
	pub fn new(
		resolver: R,
		loader: L,
		queue: StreamQueue<L::Source>,
		last_loaded: Option<Hour>,
	) -> Self {
		Self {
			resolver,
			loader,
			queue,
			last_loaded,
			reload_on_stall: true,
			sample_rate: None,
		}
	}

	#[must_use]
	/// Only queue tracks at `sample_rate`, the rate the audio output was opened with.
	pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
		self.sample_rate = Some(sample_rate);
		self
	}

	#[must_use]
	/// Whether to re-open the current hour when the queue is stalled.
	pub fn with_reload_on_stall(mut self, reload_on_stall: bool) -> Self {
		self.reload_on_stall = reload_on_stall;
		self
	}

	#[must_use]
	/// The last hour successfully handed to the queue.
	pub const fn last_loaded(&self) -> Option<Hour> {
		self.last_loaded
	}

	/// Run one refresh cycle.
	///
	/// # Errors
	/// If the track for the current hour could not be opened,
	/// or its sample rate is not the one set with [`RefreshTrigger::with_sample_rate`].
	/// The queue is left untouched.
	pub fn tick(&mut self) -> Result<Refresh, SourceError> {
		let hour = self.resolver.resolve();

		if self.last_loaded == Some(hour) {
			if self.reload_on_stall
				&& self.queue.is_stalled()
				&& self.queue.next_hour().is_none()
			{
				let source = self.open(hour)?;
				self.queue.set_next(Track { hour, source });
				return Ok(Refresh::Reloaded(hour));
			}

			return Ok(Refresh::Unchanged(hour));
		}

		let source = self.open(hour)?;
		self.queue.set_next(Track { hour, source });
		self.last_loaded = Some(hour);

		Ok(Refresh::Loaded(hour))
	}

	fn open(&self, hour: Hour) -> Result<L::Source, SourceError> {
		let source = self.loader.open(hour)?;

		match self.sample_rate {
			Some(expected) if source.sample_rate() != expected => {
				Err(SourceError::SampleRateMismatch { expected, found: source.sample_rate() })
			},
			_ => Ok(source),
		}
	}
}

impl<R, L> RefreshTrigger<R, L>
where
	R: HourResolver + Send + 'static,
	L: Loader + Send + 'static,
	L::Source: Send + 'static,
{
	#[cold]
	#[inline(never)]
	/// Call [`RefreshTrigger::tick`] every `period` on a new thread.
	///
	/// The thread exits once a message is sent on
	/// `shutdown`, or its sender is dropped.
	///
	/// # Errors
	/// If the thread could not be spawned.
	pub fn spawn(
		mut self,
		period: Duration,
		low_priority: bool,
		shutdown: Receiver<()>,
	) -> Result<JoinHandle<()>, std::io::Error> {
		std::thread::Builder::new()
			.name("RefreshTrigger".into())
			.spawn(move || {
				if low_priority {
					lpt::lpt();
				}

				loop {
					match shutdown.recv_timeout(period) {
						Err(RecvTimeoutError::Timeout) => (),
						Ok(()) | Err(RecvTimeoutError::Disconnected) => {
							debug2!("RefreshTrigger - shutting down");
							return;
						},
					}

					match self.tick() {
						Ok(Refresh::Unchanged(_)) => (),
						Ok(Refresh::Loaded(hour))   => info2!("RefreshTrigger - queued hour {hour}"),
						Ok(Refresh::Reloaded(hour)) => info2!("RefreshTrigger - stalled, re-queued hour {hour}"),
						Err(e) => warn2!("RefreshTrigger - failed to load track, retrying next cycle: {e}"),
					}
				}
			})
	}
}
