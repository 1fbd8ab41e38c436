//! Notifications fired on every track switch.

//---------------------------------------------------------------------------------------------------- use
use crate::hour::Hour;
use crossbeam::channel::Sender;

//---------------------------------------------------------------------------------------------------- Callback
/// What to do when the queue switches to a new track.
///
/// The callback runs on the audio thread, right after the new track
/// was promoted. [`Callback::Channel`] only does a `try_send()`, so it
/// is the one to reach for when the receiving side does real work.
///
/// ```rust
/// # use hourly::config::*;
/// # use hourly::hour::Hour;
/// // Function pointer, doesn't allocate or capture.
/// fn now_playing(hour: Hour) {
///     println!("now playing hour {hour}");
/// }
/// let pointer = Callback::Pointer(now_playing);
///
/// // Channel, acts as a notification with the new hour.
/// let (send, recv) = crossbeam::channel::unbounded();
/// let channel = Callback::Channel(send);
///
/// // Boxed closure, can capture.
/// let dynamic = Callback::Dynamic(Box::new(move |hour| {
///     println!("{hour}");
/// }));
/// ```
pub enum Callback {
	/// Dynamically dispatched function
	Dynamic(Box<dyn FnMut(Hour) + Send + 'static>),
	/// Channel message
	Channel(Sender<Hour>),
	/// Function pointer
	Pointer(fn(Hour)),
}

//---------------------------------------------------------------------------------------------------- Callback Impl
impl Callback {
	#[inline]
	/// "Call" a [`Callback`] with the newly active `hour`.
	///
	/// A full or disconnected [`Callback::Channel`] drops the message.
	pub(crate) fn call(&mut self, hour: Hour) {
		match self {
			Self::Dynamic(f) => f(hour),
			Self::Channel(s) => drop(s.try_send(hour)),
			Self::Pointer(f) => f(hour),
		}
	}
}

//---------------------------------------------------------------------------------------------------- Callback Trait Impl
impl std::fmt::Debug for Callback {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Dynamic(_) => write!(f, "Callback::Dynamic"),
			Self::Channel(_) => write!(f, "Callback::Channel"),
			Self::Pointer(_) => write!(f, "Callback::Pointer"),
		}
	}
}
