//! Trait definitions shared by the resource graph.
//!
//! Entity types implement the traits that describe how they are keyed,
//! how their list envelopes combine across pages, and how their cached
//! collections are reloaded.

mod keyed;
mod merge;
mod refresh;

pub use keyed::Keyed;
pub use merge::Merge;
pub use refresh::Refresh;
