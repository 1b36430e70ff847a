// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmaudio

//! Keyed start-offset derivation.
//!
//! Randomized placement scatters the container away from offset 0. The start
//! index is a pseudo-random draw from a ChaCha20 generator seeded by a hash
//! of the key, so encoder and decoder derive the identical offset from the
//! key alone. SHA-256 is used purely for its uniform output distribution,
//! not for secrecy.
//!
//! The draw uses `u64` ranges so the result is identical on 32-bit and
//! 64-bit platforms; `usize` ranges consume different amounts of generator
//! entropy per draw and would diverge.
//!
//! Note the ordering constraint: the decoder can only recompute the offset
//! once `cells_needed` is known, and that requires the header — which the
//! randomized placement itself hides. A randomized container is therefore
//! recoverable only through the lossless side channel (or a header readable
//! at offset 0), never by blind bit-level search alone.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sha2::{Digest, Sha256};

/// 64-bit seed for a key: SHA-256 of its UTF-8 bytes, first 8 bytes
/// little-endian.
pub fn seed64(key: &str) -> u64 {
    let digest = Sha256::digest(key.as_bytes());
    u64::from_le_bytes(digest[..8].try_into().expect("digest is 32 bytes"))
}

/// Deterministic generator for a key. Exposed so callers and tests can
/// inject a generator with a known seed and assert exact offsets.
pub fn rng_for_key(key: &str) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(seed64(key))
}

/// Draw a start cell index from `[0, max(1, total_cells - cells_needed))`
/// using an injected generator.
pub fn draw_offset<R: Rng>(rng: &mut R, cells_needed: usize, total_cells: usize) -> usize {
    let span = total_cells.saturating_sub(cells_needed).max(1) as u64;
    rng.gen_range(0..span) as usize
}

/// Deterministic keyed start offset: identical `(key, cells_needed,
/// total_cells)` always yields the identical index.
pub fn start_offset(key: &str, cells_needed: usize, total_cells: usize) -> usize {
    draw_offset(&mut rng_for_key(key), cells_needed, total_cells)
}
