//! Audio output constants.

/// How many frames the output pre-allocates for pulling from the queue.
///
/// Device callbacks asking for more than this are filled in chunks.
pub(super) const FRAME_BUFFER_LEN: usize = 4096;

/// How often the dummy output pulls from the queue,
/// roughly the callback period of a real device.
#[cfg(any(test, feature = "dummy", not(feature = "cpal")))]
pub(super) const DUMMY_PERIOD: std::time::Duration = std::time::Duration::from_millis(8);

/// The most channels we ask the device for.
#[cfg(all(feature = "cpal", not(any(test, feature = "dummy"))))]
pub(super) const MAX_CHANNELS: u16 = 2;
