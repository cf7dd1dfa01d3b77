//! Filesystem utilities for promptlab.
//!
//! Atomic writes keep result records and saved templates from ever being
//! observed half-written.

pub mod atomic;

pub use atomic::{atomic_create, atomic_write, atomic_write_file};
