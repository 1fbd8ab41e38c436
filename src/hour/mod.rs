//! Track identifiers derived from the wall clock.

mod hour;
pub use hour::Hour;

mod clock;
pub use clock::{Clock,HourResolver};
