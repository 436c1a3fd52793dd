use std::time::Duration;

use bincode::error::{DecodeError, EncodeError};
use thiserror::Error;

/// Errors produced while building a cube, loading tables or searching for a solution.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid scramble move: {0:?}")]
    InvalidScramble(String),
    #[error("invalid cube state: {0:?}, expected cp/co/ep/eo lists")]
    InvalidState(String),
    #[error("{piece} permutation is not a bijection")]
    InvalidPermutation { piece: &'static str },
    #[error("{piece} orientation value out of range")]
    InvalidOrientation { piece: &'static str },
    #[error("corner orientations do not sum to 0 mod 3")]
    InvalidTwist,
    #[error("edge orientations do not sum to 0 mod 2")]
    InvalidFlip,
    #[error("corner and edge permutations differ in parity")]
    InvalidParity,
    #[error("max depth {max_depth} exceeds the search limit of {limit}")]
    InvalidMaxDepth { max_depth: usize, limit: usize },
    #[error("no solution found within {max_depth} moves")]
    NoSolution { max_depth: usize },
    #[error("no solution found within {0:?}")]
    Timeout(Duration),
    #[error("table {name} has {found} entries, expected {expected}")]
    InvalidTable {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}
