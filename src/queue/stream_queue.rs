//! Shared handle to a [`Queue`].

//---------------------------------------------------------------------------------------------------- Use
use crate::{
	hour::Hour,
	queue::{Produced,Queue,QueueState,Track},
	source::{Frame,TrackSource},
};
use std::sync::{Arc,Mutex,MutexGuard,PoisonError};

//---------------------------------------------------------------------------------------------------- StreamQueue
/// A cheaply clonable, thread-safe handle to a [`Queue`].
///
/// The audio callback calls [`StreamQueue::produce`], the
/// refresh trigger calls [`StreamQueue::set_next`]. Every operation
/// takes the same lock so a `set_next()` is never observed half-done
/// by `produce()`, and vice versa.
///
/// The lock is only held for the duration of one call. `set_next()`
/// is a pointer swap so the audio thread never waits on a file
/// being opened, tracks should be loaded before calling it.
#[derive(Debug)]
pub struct StreamQueue<S: TrackSource> {
	queue: Arc<Mutex<Queue<S>>>,
}

impl<S: TrackSource> StreamQueue<S> {
	#[must_use]
	/// Wrap `queue` in a shared handle.
	pub fn new(queue: Queue<S>) -> Self {
		Self { queue: Arc::new(Mutex::new(queue)) }
	}

	/// A panic while holding the lock cannot leave the queue
	/// in a state that is unsafe to keep playing from.
	fn lock(&self) -> MutexGuard<'_, Queue<S>> {
		self.queue.lock().unwrap_or_else(PoisonError::into_inner)
	}

	/// See [`Queue::set_next`].
	pub fn set_next(&self, track: Track<S>) {
		self.lock().set_next(track);
	}

	/// See [`Queue::produce`].
	pub fn produce(&self, frames: &mut [Frame]) -> Produced {
		self.lock().produce(frames)
	}

	#[must_use]
	/// See [`Queue::state`].
	pub fn state(&self) -> QueueState {
		self.lock().state()
	}

	#[must_use]
	/// See [`Queue::is_stalled`].
	pub fn is_stalled(&self) -> bool {
		self.lock().is_stalled()
	}

	#[must_use]
	/// See [`Queue::current_hour`].
	pub fn current_hour(&self) -> Option<Hour> {
		self.lock().current_hour()
	}

	#[must_use]
	/// See [`Queue::next_hour`].
	pub fn next_hour(&self) -> Option<Hour> {
		self.lock().next_hour()
	}

	#[must_use]
	/// Sample rate of the current track.
	pub fn sample_rate(&self) -> Option<u32> {
		self.lock().current().map(|t| t.source.sample_rate())
	}
}

impl<S: TrackSource> Clone for StreamQueue<S> {
	fn clone(&self) -> Self {
		Self { queue: Arc::clone(&self.queue) }
	}
}
