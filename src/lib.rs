//! Gapless hourly audio stream.
//!
//! A [`Station`] plays one track per hour of the day, `<music_dir>/<HH>.<extension>`.
//! The current hour's track loops until the hour changes, then the new hour's
//! track takes over exactly where the old one ends, with no gap in between.
//!
//! The pieces are usable on their own:
//! - [`queue::StreamQueue`] is the two-slot gapless queue the audio callback pulls from
//! - [`trigger::RefreshTrigger`] keeps the queue fed as the hour changes
//! - [`loader::Loader`] and [`source::TrackSource`] abstract where tracks come from

//---------------------------------------------------------------------------------------------------- Lints
#![allow(
    clippy::len_zero,
    clippy::type_complexity,
    clippy::module_inception,
)]

#![deny(
    nonstandard_style,
    deprecated,
    missing_docs,
)]

#![forbid(
    unused_mut,
    unused_unsafe,
    future_incompatible,
    break_with_label_and_loop,
    coherence_leak_check,
    duplicate_macro_attributes,
    for_loops_over_fallibles,
    overlapping_range_endpoints,
    semicolon_in_expressions_from_macros,
    redundant_semicolons,
    unconditional_recursion,
    unreachable_patterns,
    unused_allocation,
    unused_braces,
    unused_comparisons,
    unused_doc_comments,
    unused_parens,
    unused_labels,
    while_true,
    keyword_idents,
    non_ascii_idents,
    noop_method_call,
)]

//---------------------------------------------------------------------------------------------------- Public API
mod station;
pub use station::Station;

pub mod config;
pub mod error;
pub mod hour;
pub mod loader;
pub mod queue;
pub mod source;
pub mod trigger;

//---------------------------------------------------------------------------------------------------- Private Usage
mod gc;
mod macros;
mod output;
