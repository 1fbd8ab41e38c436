//! The two-slot sample multiplexer.

//---------------------------------------------------------------------------------------------------- Use
use crate::{
	config::Callback,
	hour::Hour,
	source::{Frame,Pull,TrackSource},
	macros::{debug2,info2,trace2,warn2},
};
use crossbeam::channel::Sender;
use strum::{
	AsRefStr,
	Display,
	EnumCount,
	EnumIter,
	IntoStaticStr,
};

//---------------------------------------------------------------------------------------------------- Track
#[derive(Debug)]
/// A [`TrackSource`] along with the [`Hour`] it was loaded for.
pub struct Track<S> {
	/// Which hour this track belongs to.
	pub hour: Hour,
	/// The opened source.
	pub source: S,
}

//---------------------------------------------------------------------------------------------------- QueueState
#[derive(Copy,Clone,Debug,PartialEq,Eq,Hash)]
#[derive(AsRefStr,Display,EnumCount,EnumIter,IntoStaticStr)]
/// Which slots of a [`Queue`] are occupied.
///
/// ```text
/// Empty --set_next--> SingleLoaded --set_next--> DoubleLoaded
///                      ^      |                   |      ^
///                      |      | end, rewound      |      | set_next (overwrite)
///                      +------+                   +------+
///                      ^                          |
///                      +------ end, promoted -----+
/// ```
pub enum QueueState {
	/// Nothing loaded yet, only before startup finishes.
	Empty,
	/// `current` is playing, nothing is queued after it.
	SingleLoaded,
	/// `current` is playing and `next` is waiting.
	DoubleLoaded,
}

//---------------------------------------------------------------------------------------------------- Produced
#[derive(Copy,Clone,Debug,PartialEq,Eq,Hash)]
/// The result of [`Queue::produce`].
pub struct Produced {
	/// How many frames (from the front of the buffer) were written.
	pub frames: usize,
	/// Whether the stream is still alive.
	///
	/// This is always `true`, the queue loops forever.
	pub alive: bool,
}

//---------------------------------------------------------------------------------------------------- Queue
/// The sample multiplexer between the audio backend and two [`TrackSource`]'s.
///
/// `current` is what is playing, `next` is what will play once `current`
/// runs out. If `current` runs out and there is no `next`, it is rewound
/// and plays again.
///
/// This type has no synchronization of its own,
/// see [`crate::queue::StreamQueue`] for the shared handle.
pub struct Queue<S: TrackSource> {
	/// The track being played.
	current: Option<Track<S>>,
	/// The track to switch to once `current` runs out.
	next: Option<Track<S>>,
	/// `current` ran out, could not be rewound, and there is no `next`.
	stalled: bool,
	/// Fired on every switch.
	on_switch: Option<Callback>,
	/// Where evicted tracks are sent to be dropped.
	to_gc: Option<Sender<Track<S>>>,
}

impl<S: TrackSource> Queue<S> {
	#[must_use]
	/// An empty queue, closed tracks are dropped in place.
	pub const fn new() -> Self {
		Self {
			current: None,
			next: None,
			stalled: false,
			on_switch: None,
			to_gc: None,
		}
	}

	#[must_use]
	/// Call `callback` every time a new track gets promoted.
	pub fn with_callback(mut self, callback: Callback) -> Self {
		self.on_switch = Some(callback);
		self
	}

	#[must_use]
	/// Send evicted tracks through `to_gc` instead of dropping them in place.
	///
	/// If the channel is full or disconnected the track is dropped in place.
	pub fn with_gc(mut self, to_gc: Sender<Track<S>>) -> Self {
		self.to_gc = Some(to_gc);
		self
	}

	//---------------------------------------------------------------------------------------------------- Slots
	/// Queue `track` to play after the current one.
	///
	/// If nothing is playing yet (startup), `track` starts playing instead.
	///
	/// A previously queued `next` that never got to play is
	/// closed and thrown away, there is only one lookahead slot.
	/// `current` is never touched.
	pub fn set_next(&mut self, track: Track<S>) {
		if self.current.is_none() {
			debug2!("Queue - set_next(), current: {}", track.hour);
			self.current = Some(track);
			return;
		}

		debug2!("Queue - set_next(), next: {}", track.hour);
		if let Some(mut discarded) = self.next.replace(track) {
			debug2!("Queue - discarding unplayed next: {}", discarded.hour);
			discarded.source.close();
			self.dispose(discarded);
		}
	}

	#[must_use]
	/// Which slots are occupied.
	pub fn state(&self) -> QueueState {
		match (&self.current, &self.next) {
			(None, _) => QueueState::Empty,
			(Some(_), None) => QueueState::SingleLoaded,
			(Some(_), Some(_)) => QueueState::DoubleLoaded,
		}
	}

	#[must_use]
	/// The hour currently playing.
	pub fn current_hour(&self) -> Option<Hour> {
		self.current.as_ref().map(|t| t.hour)
	}

	#[must_use]
	/// The hour queued to play next.
	pub fn next_hour(&self) -> Option<Hour> {
		self.next.as_ref().map(|t| t.hour)
	}

	#[must_use]
	/// If the current track ran out and could not be rewound.
	///
	/// This clears itself once a track is promoted or a rewind succeeds.
	pub const fn is_stalled(&self) -> bool {
		self.stalled
	}

	#[must_use]
	/// Access the current source.
	pub fn current(&self) -> Option<&Track<S>> {
		self.current.as_ref()
	}

	//---------------------------------------------------------------------------------------------------- Produce
	/// Fill `frames` with audio.
	///
	/// This is the real-time path, it never blocks on anything other
	/// than the sources' own decoding, and never fails:
	///
	/// - when `current` runs out and `next` is set, `current` is closed,
	///   `next` is promoted and filling continues from it in the same call
	/// - when `current` runs out and `next` is not set, `current` is
	///   rewound to its start and filling continues
	/// - if the rewind fails, or a source fails to decode, the frames
	///   written so far are returned and the queue stays usable
	///
	/// The returned [`Produced::frames`] is `frames.len()` unless one
	/// of the above failures happened (or the queue is empty).
	/// Anything past that is left untouched.
	pub fn produce(&mut self, frames: &mut [Frame]) -> Produced {
		let mut filled = 0;
		// Running out right after a rewind means `current` is empty,
		// looping it again would spin forever.
		let mut rewound = false;

		while filled < frames.len() {
			let Some(current) = self.current.as_mut() else {
				break;
			};

			let requested = frames.len() - filled;
			let pull = current.source.pull(&mut frames[filled..]);
			filled += pull.frames(requested);

			match pull {
				Pull::Full => (),

				Pull::End(n) => {
					if self.next.is_some() {
						self.promote();
						rewound = false;
						continue;
					}

					if rewound && n == 0 {
						warn2!("Queue - hour {} has no frames, stopping", current.hour);
						break;
					}

					match current.source.seek(0) {
						Ok(()) => {
							trace2!("Queue - looping hour {}", current.hour);
							self.stalled = false;
							rewound = true;
						},
						Err(e) => {
							warn2!("Queue - failed to rewind hour {}: {e}", current.hour);
							self.stalled = true;
							break;
						},
					}
				},

				Pull::Error { error, .. } => {
					warn2!("Queue - decode error in hour {}: {error}", current.hour);
					break;
				},
			}
		}

		Produced { frames: filled, alive: true }
	}

	/// Close `current`, move `next` into its place.
	fn promote(&mut self) {
		let Some(next) = self.next.take() else {
			return;
		};
		let hour = next.hour;

		// INVARIANT: the old track is closed before
		// the new one is installed, never after.
		if let Some(current) = self.current.as_mut() {
			current.source.close();
		}
		let old = self.current.replace(next);
		self.stalled = false;

		info2!("Queue - now playing hour {hour}");
		if let Some(callback) = self.on_switch.as_mut() {
			callback.call(hour);
		}

		if let Some(old) = old {
			self.dispose(old);
		}
	}

	/// Get rid of an already closed track, preferably not on this thread.
	fn dispose(&self, track: Track<S>) {
		if let Some(to_gc) = self.to_gc.as_ref() {
			if let Err(e) = to_gc.try_send(track) {
				drop(e.into_inner());
			}
		}
	}
}

impl<S: TrackSource> Default for Queue<S> {
	fn default() -> Self {
		Self::new()
	}
}

impl<S: TrackSource + std::fmt::Debug> std::fmt::Debug for Queue<S> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Queue")
			.field("current", &self.current)
			.field("next", &self.next)
			.field("stalled", &self.stalled)
			.field("on_switch", &self.on_switch)
			.finish_non_exhaustive()
	}
}

//---------------------------------------------------------------------------------------------------- TESTS
#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		source::SILENCE,
		tests::MemorySource,
	};
	use pretty_assertions::assert_eq;

	const A: Frame = [1.0; 2];
	const B: Frame = [2.0; 2];

	fn track(hour: u8, source: MemorySource) -> Track<MemorySource> {
		Track { hour: Hour::new(hour), source }
	}

	#[test]
	fn empty() {
		let mut queue = Queue::<MemorySource>::new();
		assert_eq!(queue.state(), QueueState::Empty);

		let mut frames = vec![SILENCE; 8];
		assert_eq!(queue.produce(&mut frames), Produced { frames: 0, alive: true });
		assert!(frames.iter().all(|f| *f == SILENCE));

		let mut frames: [Frame; 0] = [];
		assert_eq!(queue.produce(&mut frames), Produced { frames: 0, alive: true });
	}

	#[test]
	fn state_machine() {
		let mut queue = Queue::new();
		assert_eq!(queue.state(), QueueState::Empty);

		queue.set_next(track(1, MemorySource::constant(1.0, 10)));
		assert_eq!(queue.state(), QueueState::SingleLoaded);
		assert_eq!(queue.current_hour(), Some(Hour::new(1)));
		assert_eq!(queue.next_hour(), None);

		queue.set_next(track(2, MemorySource::constant(2.0, 10)));
		assert_eq!(queue.state(), QueueState::DoubleLoaded);
		assert_eq!(queue.current_hour(), Some(Hour::new(1)));
		assert_eq!(queue.next_hour(), Some(Hour::new(2)));

		// Overwrite.
		queue.set_next(track(3, MemorySource::constant(3.0, 10)));
		assert_eq!(queue.state(), QueueState::DoubleLoaded);
		assert_eq!(queue.next_hour(), Some(Hour::new(3)));

		// Exhaustion promotes.
		let mut frames = vec![SILENCE; 15];
		queue.produce(&mut frames);
		assert_eq!(queue.state(), QueueState::SingleLoaded);
		assert_eq!(queue.current_hour(), Some(Hour::new(3)));

		// Exhaustion without next rewinds in place.
		queue.produce(&mut frames);
		assert_eq!(queue.state(), QueueState::SingleLoaded);
		assert_eq!(queue.current_hour(), Some(Hour::new(3)));
	}

	#[test]
	fn gapless_transition() {
		// 30 x A then 20 x B, 40 requested.
		let current = MemorySource::constant(1.0, 30);
		let next    = MemorySource::constant(2.0, 20);
		let current_stats = current.stats();
		let next_stats    = next.stats();

		let mut queue = Queue::new();
		queue.set_next(track(0, current));
		queue.set_next(track(1, next));

		let mut frames = vec![SILENCE; 40];
		let produced = queue.produce(&mut frames);
		assert_eq!(produced, Produced { frames: 40, alive: true });
		assert!(frames[..30].iter().all(|f| *f == A));
		assert!(frames[30..].iter().all(|f| *f == B));

		// `current` is now the rest of B, `next` is empty.
		assert_eq!(queue.state(), QueueState::SingleLoaded);
		assert_eq!(queue.current_hour(), Some(Hour::new(1)));
		assert_eq!(queue.current().unwrap().source.remaining(), 10);
		assert_eq!(current_stats.closes(), 1);
		assert_eq!(current_stats.seeks(), 0);
		assert_eq!(next_stats.closes(), 0);
	}

	#[test]
	fn gapless_at_exact_boundary() {
		// `current` ends exactly on the buffer boundary,
		// the switch happens at the start of the next call.
		let mut queue = Queue::new();
		queue.set_next(track(0, MemorySource::ramp(16)));
		queue.set_next(track(1, MemorySource::constant(2.0, 16)));

		let mut frames = vec![SILENCE; 16];
		assert_eq!(queue.produce(&mut frames).frames, 16);
		assert_eq!(frames[15], [15.0, -15.0]);
		assert_eq!(queue.current_hour(), Some(Hour::new(0)));

		assert_eq!(queue.produce(&mut frames).frames, 16);
		assert!(frames.iter().all(|f| *f == B));
		assert_eq!(queue.current_hour(), Some(Hour::new(1)));
	}

	#[test]
	fn loop_current() {
		// 10 x A, no next, 25 requested.
		let source = MemorySource::ramp(10);
		let stats  = source.stats();

		let mut queue = Queue::new();
		queue.set_next(track(0, source));

		let mut frames = vec![SILENCE; 25];
		assert_eq!(queue.produce(&mut frames), Produced { frames: 25, alive: true });
		for (i, frame) in frames.iter().enumerate() {
			let value = (i % 10) as f32;
			assert_eq!(*frame, [value, -value]);
		}

		// Pulled 10 (end), 10 (end), 5.
		assert_eq!(stats.pulls(), 3);
		assert_eq!(stats.seeks(), 2);
		assert_eq!(stats.closes(), 0);
	}

	#[test]
	fn loop_is_unbounded() {
		let mut queue = Queue::new();
		queue.set_next(track(0, MemorySource::ramp(7)));

		let mut frames = vec![SILENCE; 5];
		let mut total = 0;
		for call in 0..1000 {
			let produced = queue.produce(&mut frames);
			assert_eq!(produced.frames, 5);
			assert!(produced.alive);
			for (i, frame) in frames.iter().enumerate() {
				let value = ((call * 5 + i) % 7) as f32;
				assert_eq!(*frame, [value, -value]);
			}
			total += produced.frames;
		}
		assert_eq!(total, 5000);
		assert!(!queue.is_stalled());
	}

	#[test]
	fn at_most_one_pending() {
		let first  = MemorySource::constant(2.0, 10);
		let second = MemorySource::constant(3.0, 10);
		let first_stats  = first.stats();
		let second_stats = second.stats();

		let mut queue = Queue::new();
		queue.set_next(track(0, MemorySource::constant(1.0, 10)));
		queue.set_next(track(1, first));
		queue.set_next(track(2, second));

		// The first `next` was closed without ever being read.
		assert_eq!(first_stats.closes(), 1);
		assert_eq!(first_stats.pulls(), 0);

		let mut frames = vec![SILENCE; 20];
		assert_eq!(queue.produce(&mut frames).frames, 20);
		assert!(frames[..10].iter().all(|f| *f == [1.0; 2]));
		assert!(frames[10..].iter().all(|f| *f == [3.0; 2]));
		assert_eq!(queue.current_hour(), Some(Hour::new(2)));
		assert_eq!(first_stats.pulls(), 0);
		assert_eq!(second_stats.closes(), 0);
	}

	#[test]
	fn switch_notification_exactly_once() {
		let (send, recv) = crossbeam::channel::unbounded();
		let mut queue = Queue::new().with_callback(Callback::Channel(send));

		// Startup install is not a switch.
		queue.set_next(track(4, MemorySource::constant(1.0, 10)));
		queue.set_next(track(5, MemorySource::constant(2.0, 10)));
		assert!(recv.try_recv().is_err());

		let mut frames = vec![SILENCE; 4];
		for _ in 0..10 {
			queue.produce(&mut frames);
		}

		assert_eq!(recv.try_recv().unwrap(), Hour::new(5));
		assert!(recv.try_recv().is_err());
	}

	#[test]
	fn closed_before_promoted_source_is_read() {
		let current = MemorySource::constant(1.0, 3);
		let next    = MemorySource::constant(2.0, 3);
		let current_stats = current.stats();
		let next_stats    = next.stats();

		let mut queue = Queue::new();
		queue.set_next(track(0, current));
		queue.set_next(track(1, next));

		// Exactly drain `current`, the end is only noticed on the next call.
		let mut frames = vec![SILENCE; 3];
		queue.produce(&mut frames);
		assert_eq!(current_stats.closes(), 0);
		assert_eq!(next_stats.pulls(), 0);

		let mut frames = vec![SILENCE; 1];
		queue.produce(&mut frames);
		assert_eq!(current_stats.closes(), 1);
		assert_eq!(next_stats.pulls(), 1);
		assert_eq!(frames[0], B);
	}

	#[test]
	fn seek_failure_is_partial() {
		// 5 frames left, 10 requested, rewind fails.
		let source = MemorySource::constant(1.0, 5).unseekable();
		let stats  = source.stats();

		let mut queue = Queue::new();
		queue.set_next(track(0, source));

		let mut frames = vec![SILENCE; 10];
		assert_eq!(queue.produce(&mut frames), Produced { frames: 5, alive: true });
		assert!(frames[..5].iter().all(|f| *f == A));
		assert!(frames[5..].iter().all(|f| *f == SILENCE));
		assert!(queue.is_stalled());

		// Still alive, but nothing left to give.
		assert_eq!(queue.produce(&mut frames), Produced { frames: 0, alive: true });
		assert_eq!(stats.seeks(), 2);
		assert!(queue.is_stalled());

		// A new track un-stalls it.
		queue.set_next(track(1, MemorySource::constant(2.0, 100)));
		assert_eq!(queue.produce(&mut frames), Produced { frames: 10, alive: true });
		assert!(frames.iter().all(|f| *f == B));
		assert!(!queue.is_stalled());
		assert_eq!(stats.closes(), 1);
	}

	#[test]
	fn decode_error_is_partial() {
		let source = MemorySource::ramp(100).error_after(30);
		let stats  = source.stats();

		let mut queue = Queue::new();
		queue.set_next(track(0, source));

		let mut frames = vec![SILENCE; 50];
		assert_eq!(queue.produce(&mut frames), Produced { frames: 30, alive: true });
		assert_eq!(frames[29], [29.0, -29.0]);
		assert!(frames[30..].iter().all(|f| *f == SILENCE));
		assert!(!queue.is_stalled());
		assert_eq!(queue.state(), QueueState::SingleLoaded);

		// Carries on right after the bad packet, no rewind.
		assert_eq!(queue.produce(&mut frames), Produced { frames: 50, alive: true });
		assert_eq!(frames[0],  [30.0, -30.0]);
		assert_eq!(frames[49], [79.0, -79.0]);
		assert_eq!(stats.seeks(), 0);
		assert_eq!(stats.closes(), 0);
	}

	#[test]
	fn empty_source_does_not_spin() {
		let source = MemorySource::constant(1.0, 0);
		let stats  = source.stats();

		let mut queue = Queue::new();
		queue.set_next(track(0, source));

		let mut frames = vec![SILENCE; 10];
		assert_eq!(queue.produce(&mut frames), Produced { frames: 0, alive: true });
		assert_eq!(stats.seeks(), 1);
		assert!(!queue.is_stalled());
	}

	#[test]
	fn evicted_tracks_go_to_gc() {
		let (to_gc, from_queue) = crossbeam::channel::unbounded();
		let mut queue = Queue::new().with_gc(to_gc);

		queue.set_next(track(0, MemorySource::constant(1.0, 2)));
		queue.set_next(track(1, MemorySource::constant(2.0, 2)));
		// Overwritten next.
		queue.set_next(track(2, MemorySource::constant(3.0, 2)));
		let discarded = from_queue.try_recv().unwrap();
		assert_eq!(discarded.hour, Hour::new(1));
		assert!(discarded.source.is_closed());

		// Promotion.
		let mut frames = vec![SILENCE; 3];
		queue.produce(&mut frames);
		let evicted = from_queue.try_recv().unwrap();
		assert_eq!(evicted.hour, Hour::new(0));
		assert!(evicted.source.is_closed());
		assert!(from_queue.try_recv().is_err());
	}
}
