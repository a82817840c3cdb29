//! Pure scheduling logic: interval overlap checks, conflict detection
//! against a staff member's existing slots, and expansion of booking
//! requests into per-day occurrences. No I/O here; handlers fetch the
//! candidate slots and pass them in.

mod expansion;
mod interval;
pub mod timefmt;

pub use expansion::expand_occurrences;
pub use interval::{find_conflict, minutes_of, Interval};
