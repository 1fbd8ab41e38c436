//! Resolving the current [`Hour`].

//---------------------------------------------------------------------------------------------------- Use
use crate::hour::Hour;
use strum::{
	AsRefStr,
	Display,
	EnumCount,
	EnumIter,
	EnumString,
	EnumVariantNames,
	IntoStaticStr,
};

//---------------------------------------------------------------------------------------------------- HourResolver
/// Something that knows what hour it is.
///
/// This is called once per refresh cycle, off the audio thread.
///
/// Any `Fn() -> Hour` is a resolver, which is mostly useful in tests.
pub trait HourResolver {
	/// The hour that should be playing right now.
	fn resolve(&self) -> Hour;
}

impl<F: Fn() -> Hour> HourResolver for F {
	fn resolve(&self) -> Hour {
		self()
	}
}

//---------------------------------------------------------------------------------------------------- Clock
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bincode", derive(bincode::Encode, bincode::Decode))]
#[derive(Copy,Clone,Debug,Default,PartialEq,PartialOrd,Eq,Ord,Hash)]
#[derive(AsRefStr,Display,EnumCount,EnumIter,EnumString,EnumVariantNames,IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
/// Which wall clock the hour is read from.
///
/// ```rust
/// # use hourly::hour::Clock;
/// assert_eq!("utc".parse::<Clock>().unwrap(), Clock::Utc);
/// assert_eq!(Clock::Local.to_string(), "local");
/// ```
pub enum Clock {
	#[default]
	/// The host's local time zone.
	Local,
	/// UTC.
	Utc,
}

impl HourResolver for Clock {
	fn resolve(&self) -> Hour {
		match self {
			Self::Local => Hour::from_time(&chrono::Local::now()),
			Self::Utc   => Hour::from_time(&chrono::Utc::now()),
		}
	}
}
