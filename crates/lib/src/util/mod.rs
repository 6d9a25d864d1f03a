//! Shared utilities.
//!
//! Content hashing for namespace digests, symbolic links for virtual files,
//! and test helpers.

pub mod hash;
pub mod link;

#[cfg(test)]
pub mod testutil;
