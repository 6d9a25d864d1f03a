//! nsbuild-lib: namespace rules for a flat-module build engine
//!
//! Source files live in nested directories; the compiler only ever sees a
//! single flat module space. This crate provides the rules a host build
//! engine registers to bridge the two:
//! - `metadata`: directories as namespaces, files under flattened names
//! - `rules`: stamp, alias and root generators, links, dependency filtering,
//!   library manifests and executable tagging
//! - `signal` / `dispatch`: turning "rule does not apply" into a memoized
//!   engine failure
//! - `engine`: the host interface, plus a small local host

pub mod analyzer;
pub mod config;
pub mod consts;
pub mod dispatch;
pub mod engine;
pub mod metadata;
pub mod naming;
pub mod rules;
pub mod signal;
pub mod trace;
pub mod util;
