//! The device module contains the internals of the supported port expander.
//!
//! In most cases you will not need anything from here explicitly, the exposed types at the root of
//! the crate should be enough.

pub mod ch423;
