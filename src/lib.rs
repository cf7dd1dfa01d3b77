//! promptlab: a file-based lab for generating, costing and comparing
//! AI conversation starters.
//!
//! A run takes one problem statement and a selection of tools, assembles a
//! prompt, calls the generation model, prices the call and stores a result
//! record that later runs can be compared against.

pub mod config;
pub mod context;
pub mod cost;
pub mod credentials;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod fs;
pub mod generation;
pub mod logging;
pub mod pipeline;
pub mod problems;
pub mod prompt;
pub mod results;
pub mod tools;

#[cfg(test)]
mod test_support;
