//! Core error types.
//!
//! Defined here so the engine and the CLI can match on failure kinds
//! without string matching.

use thiserror::Error;

/// The round assembler could not produce a usable round.
///
/// Never fatal: the caller renders it as a "try again" message and leaves
/// the previous round in place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    /// The identifier pool has no entries to sample from.
    #[error("compound pool is empty")]
    EmptyPool,

    /// Every attempt was rejected or failed.
    #[error("no usable compound after {attempts} attempts")]
    Exhausted { attempts: u32 },
}

/// A metric name that does not correspond to any judged rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown metric: '{0}'")]
pub struct UnknownMetric(pub String);

/// A property record was missing a field required to build a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("compound {cid} is missing required field '{field}'")]
pub struct IncompleteRecord {
    pub cid: u64,
    pub field: &'static str,
}
