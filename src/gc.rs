//! The [G]arbage [c]ollector thread.

//---------------------------------------------------------------------------------------------------- Use
use crate::macros::{debug2,select_recv};
use crossbeam::channel::{Receiver,Select};
use std::thread::JoinHandle;

#[allow(unused_imports)] // docs
use crate::queue::Queue;

//---------------------------------------------------------------------------------------------------- Gc
// Receives evicted tracks from the [`Queue`] and drops them.
//
// Freeing a decoder (and closing its file) is not something
// the audio thread should be doing, so it gets sent here.
pub(crate) struct Gc<T: Send + 'static> {
	pub(crate) shutdown:   Receiver<()>,
	pub(crate) from_queue: Receiver<T>,
}

//---------------------------------------------------------------------------------------------------- Gc Impl
impl<T: Send + 'static> Gc<T> {
	//---------------------------------------------------------------------------------------------------- Init
	#[cold]
	#[inline(never)]
	pub(crate) fn init(self) -> Result<JoinHandle<()>, std::io::Error> {
		std::thread::Builder::new()
			.name("Gc".into())
			.spawn(move || Gc::main(self))
	}

	//---------------------------------------------------------------------------------------------------- Main Loop
	#[cold]
	#[inline(never)]
	fn main(self) {
		let mut select = Select::new();

		let from_queue = select.recv(&self.from_queue);
		let shutdown   = select.recv(&self.shutdown);

		// Reduce [Gc] to the lowest thread priority.
		lpt::lpt();

		// Loop, receive garbage, and immediately drop it.
		//
		// INVARIANT: `ready()` and not `select()`, the operation
		// is completed below with `try_recv()`, not through
		// the `SelectedOperation`.
		loop {
			match select.ready() {
				i if i == from_queue => drop(select_recv!(self.from_queue)),
				i if i == shutdown => {
					debug2!("Gc - shutting down");
					// Anything left over gets dropped here, not by whoever dropped us.
					self.from_queue.try_iter().for_each(drop);
					return;
				},
				_ => (),
			}
		}
	}
}
