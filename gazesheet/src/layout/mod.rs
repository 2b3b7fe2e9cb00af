//! Sheet layout and the direction index table derived from it.
//!
//! [`SheetLayout`] is the only place the flattened frame order lives; the compositor and the
//! index emitter both read it, so pixel placement and emitted ranges cannot drift apart.

pub(crate) mod grid;
pub(crate) mod index;
