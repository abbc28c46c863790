// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use thiserror::Error;

/// Error type for sketch combine and precision-reduction operations.
///
/// Every other operation in the crate is total: `add` never fails on a
/// well-formed sketch, and queries on an empty sketch return documented
/// sentinel values instead of erroring.
#[derive(Debug, Error)]
pub enum SketchError {
    #[error("Hash mismatch: {0}")]
    HashMismatch(String),
    #[error("Precision mismatch: {0}")]
    PrecisionMismatch(String),
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),
}

/// A resettable 64-bit byte-string hash capability.
///
/// The cardinality and membership sketches are generic over this trait so
/// callers choose the hash at construction time. Two sketches can only be
/// combined when their hashes agree; the crate checks this by hashing a
/// fixed canary string with both capabilities and comparing the digests.
///
/// # Requirements
///
/// - Deterministic: identical bytes after a `reset` produce an identical
///   `sum64`, independent of any state prior to the reset.
/// - Avalanche quality good enough that the top-p bits and the low bits of
///   the digest behave as independent uniform draws, and that the two
///   32-bit halves behave independently.
///
/// A sketch owns its capability exclusively and mutates it on every `add`;
/// sharing one capability across sketches is a bug.
pub trait Hash64 {
    /// Returns the hash to its initial state so new bytes can be absorbed.
    fn reset(&mut self);

    /// Absorbs `bytes` into the hash state.
    fn write(&mut self, bytes: &[u8]);

    /// Produces the 64-bit digest of everything written since the last reset.
    fn sum64(&self) -> u64;
}

/// Digest of a canary string under a clone of `hash`, leaving the sketch's
/// own capability untouched so combine inputs stay read-only.
pub(crate) fn canary_digest<H: Hash64 + Clone>(hash: &H, canary: &[u8]) -> u64 {
    let mut hash = hash.clone();
    hash.reset();
    hash.write(canary);
    hash.sum64()
}
