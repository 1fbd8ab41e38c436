//! Audio sources.
//!
//! The queue is generic over [`TrackSource`], anything that can hand
//! out stereo frames, rewind, and be closed. [`SourceDecode`] is the
//! real one, backed by `symphonia`.

mod frame;
pub use frame::{Frame,Pull,SILENCE};

mod track_source;
pub use track_source::TrackSource;

mod source_decode;
pub use source_decode::SourceDecode;
