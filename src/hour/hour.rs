//! The canonical track identifier.

//---------------------------------------------------------------------------------------------------- Use
use std::fmt;
use chrono::Timelike;

//---------------------------------------------------------------------------------------------------- Hour
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bincode", derive(bincode::Encode, bincode::Decode))]
#[derive(Copy,Clone,Debug,Default,PartialEq,PartialOrd,Eq,Ord,Hash)]
/// An hour of the day, `0..=23`.
///
/// Every hour maps to exactly one track, so this doubles as the
/// track identifier. Two `Hour`'s are equal iff they name the
/// same hour of the day, there is no finer granularity.
///
/// Construction wraps around, `Hour::new(25) == Hour::new(1)`.
///
/// ```rust
/// # use hourly::hour::Hour;
/// assert_eq!(Hour::new(7).to_string(), "07");
/// assert_eq!(Hour::new(23).next(), Hour::MIDNIGHT);
/// assert_eq!(Hour::new(24), Hour::MIDNIGHT);
/// ```
pub struct Hour(u8);

impl Hour {
	/// How many distinct [`Hour`]'s there are.
	pub const COUNT: u8 = 24;

	/// Hour `00`.
	pub const MIDNIGHT: Self = Self(0);

	#[must_use]
	#[inline]
	/// Create an [`Hour`], wrapping `hour` into `0..=23`.
	pub const fn new(hour: u8) -> Self {
		Self(hour % Self::COUNT)
	}

	#[must_use]
	#[inline]
	/// The hour as a plain integer, always `0..=23`.
	pub const fn get(self) -> u8 {
		self.0
	}

	#[must_use]
	#[inline]
	/// The hour after this one, `23` wraps to `00`.
	pub const fn next(self) -> Self {
		Self::new(self.0 + 1)
	}

	#[must_use]
	#[inline]
	/// The hour before this one, `00` wraps to `23`.
	pub const fn previous(self) -> Self {
		Self::new(self.0 + Self::COUNT - 1)
	}

	#[must_use]
	/// The hour component of any `chrono` time.
	pub fn from_time<T: Timelike>(time: &T) -> Self {
		// `Timelike::hour()` is already `0..=23`.
		Self::new(time.hour() as u8)
	}

	#[must_use]
	/// The file name holding this hour's track, e.g. `07.flac`.
	pub fn file_name(self, extension: &str) -> String {
		format!("{self}.{extension}")
	}
}

//---------------------------------------------------------------------------------------------------- Trait Impl
impl fmt::Display for Hour {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:02}", self.0)
	}
}

impl From<u8> for Hour {
	fn from(hour: u8) -> Self {
		Self::new(hour)
	}
}

impl From<Hour> for u8 {
	fn from(hour: Hour) -> Self {
		hour.0
	}
}
