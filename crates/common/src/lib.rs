//! Shared building blocks for the Person API crates:
//! wire types used by every HTTP surface and logging bootstrap.

pub mod types;
pub mod utils;
