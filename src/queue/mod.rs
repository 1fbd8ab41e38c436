//! Gapless two-slot track queue.

mod queue;
pub use queue::{Produced,Queue,QueueState,Track};

mod stream_queue;
pub use stream_queue::StreamQueue;
