// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmaudio

//! Embed and recover pipelines over PCM sample buffers.
//!
//! Embedding: payload → optional stream cipher → container framing →
//! LSB packing into a *copy* of the carrier's flattened cells (the caller's
//! buffer is never touched). The container lands at offset 0, or at a keyed
//! pseudo-random offset when randomized placement is requested.
//!
//! Recovery is blind: the search locates a self-consistent header with no
//! known depth or offset, the exact header+payload region is re-extracted
//! at the found location, and cipher decode and CRC verification run as
//! independent final steps.

use crate::pcm::SampleBuffer;
use crate::stego::capacity;
use crate::stego::cipher;
use crate::stego::container;
use crate::stego::error::StegoError;
use crate::stego::lsb;
use crate::stego::offset;
use crate::stego::progress;
use crate::stego::search::{self, SearchBudget};

/// Embedding parameters.
#[derive(Debug, Clone)]
pub struct EmbedOptions {
    /// Low-order bits used per cell (1..=8).
    pub depth: u8,
    /// Obfuscate the payload with the keyed stream cipher.
    pub encrypt: bool,
    /// Place the container at a keyed pseudo-random offset instead of 0.
    ///
    /// A randomized container is not findable by blind search; it is only
    /// recoverable through the lossless side channel.
    pub random_start: bool,
    /// Name recorded in the container (truncated to 255 UTF-8 bytes).
    pub name: String,
}

impl EmbedOptions {
    pub fn new(depth: u8) -> Self {
        Self {
            depth,
            encrypt: false,
            random_start: false,
            name: String::new(),
        }
    }
}

/// A recovered payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recovered {
    /// Name stored in the container at embed time.
    pub name: String,
    /// Plaintext payload bytes.
    pub data: Vec<u8>,
}

/// Serialize the full container (header + payload body) for `payload`.
///
/// The header's size field and CRC-32 cover the plaintext; when `encrypt`
/// is set, only the body that follows the header is ciphered. Exposed so
/// callers can hand the exact container bytes to a side-channel store.
pub fn build_container(
    payload: &[u8],
    key: &str,
    opts: &EmbedOptions,
) -> Result<Vec<u8>, StegoError> {
    lsb::validate_depth(opts.depth)?;
    if key.is_empty() {
        return Err(StegoError::EmptyKey);
    }

    let mut out = container::build_header(
        opts.encrypt,
        opts.random_start,
        opts.depth,
        payload.len() as u64,
        &opts.name,
        crc32fast::hash(payload),
    )?;

    if opts.encrypt {
        out.extend_from_slice(&cipher::encrypt(payload, key)?);
    } else {
        out.extend_from_slice(payload);
    }
    Ok(out)
}

/// Embed `payload` into a copy of the carrier cells.
///
/// # Errors
/// - [`StegoError::InvalidBitDepth`] / [`StegoError::EmptyKey`] for bad
///   parameters.
/// - [`StegoError::CapacityExceeded`] when header + payload exceed
///   `total_cells * depth / 8` bytes.
pub fn embed(
    carrier: &SampleBuffer,
    payload: &[u8],
    key: &str,
    opts: &EmbedOptions,
) -> Result<SampleBuffer, StegoError> {
    let container_bytes = build_container(payload, key, opts)?;
    embed_container(carrier, &container_bytes, key, opts)
}

/// Embed an already-built container into a copy of the carrier cells.
pub fn embed_container(
    carrier: &SampleBuffer,
    container_bytes: &[u8],
    key: &str,
    opts: &EmbedOptions,
) -> Result<SampleBuffer, StegoError> {
    lsb::validate_depth(opts.depth)?;
    if key.is_empty() {
        return Err(StegoError::EmptyKey);
    }

    let cells = carrier.samples();
    let cap = capacity::capacity_bytes(cells.len(), opts.depth);
    if container_bytes.len() > cap {
        return Err(StegoError::CapacityExceeded {
            needed: container_bytes.len(),
            capacity: cap,
        });
    }

    let start = if opts.random_start {
        let cells_needed = lsb::cells_for_bits(container_bytes.len() * 8, opts.depth);
        offset::start_offset(key, cells_needed, cells.len())
    } else {
        0
    };

    let mut stego = cells.to_vec();
    lsb::pack(&mut stego, container_bytes, opts.depth, start)?;
    Ok(carrier.with_samples(stego))
}

/// Blindly recover a payload from a carrier: locate, re-extract, decipher,
/// verify.
///
/// # Errors
/// - [`StegoError::NoContainerFound`] when the search exhausts its
///   candidates or budget.
/// - [`StegoError::ChecksumMismatch`] when the CRC fails after extraction —
///   a wrong key and a damaged carrier are indistinguishable here.
/// - [`StegoError::Cancelled`] if [`progress::cancel`] was called.
pub fn recover(
    carrier: &SampleBuffer,
    key: &str,
    budget: &SearchBudget,
) -> Result<Recovered, StegoError> {
    progress::init(search::LOCATE_STEPS + 1);
    let result = recover_inner(carrier, key, budget);
    progress::finish();
    result
}

fn recover_inner(
    carrier: &SampleBuffer,
    key: &str,
    budget: &SearchBudget,
) -> Result<Recovered, StegoError> {
    if key.is_empty() {
        return Err(StegoError::EmptyKey);
    }

    let cells = carrier.samples();
    let found = search::locate(cells, budget)?;

    // The located header came from a generous scan window; re-extract the
    // exact header+payload region and re-parse before trusting any field.
    let cap = capacity::capacity_bytes(cells.len(), found.depth);
    if found.header.payload_len > cap as u64 {
        return Err(StegoError::CapacityExceeded {
            needed: found
                .header_len
                .saturating_add(found.header.payload_len.min(usize::MAX as u64) as usize),
            capacity: cap,
        });
    }
    let payload_len = found.header.payload_len as usize;
    let total_bytes = found.header_len + payload_len;

    let raw = lsb::unpack(cells, found.depth, found.offset, total_bytes * 8)?;
    let (header, consumed) = container::parse_header(&raw)?;
    let body = &raw[consumed..consumed + payload_len];

    let plaintext = if header.encrypted {
        cipher::decrypt(body, key)?
    } else {
        body.to_vec()
    };

    if crc32fast::hash(&plaintext) != header.checksum {
        return Err(StegoError::ChecksumMismatch);
    }
    progress::advance();

    Ok(Recovered {
        name: header.name,
        data: plaintext,
    })
}

/// Decode a container carried verbatim — the lossless side-channel path.
///
/// Runs the same parse → decipher → verify steps as [`recover`], minus the
/// bit-level search.
pub fn read_container(container_bytes: &[u8], key: &str) -> Result<Recovered, StegoError> {
    if key.is_empty() {
        return Err(StegoError::EmptyKey);
    }

    let (header, consumed) = container::parse_header(container_bytes)?;
    let payload_len = usize::try_from(header.payload_len).map_err(|_| StegoError::TruncatedHeader)?;
    let body = consumed
        .checked_add(payload_len)
        .and_then(|end| container_bytes.get(consumed..end))
        .ok_or(StegoError::TruncatedHeader)?;

    let plaintext = if header.encrypted {
        cipher::decrypt(body, key)?
    } else {
        body.to_vec()
    };

    if crc32fast::hash(&plaintext) != header.checksum {
        return Err(StegoError::ChecksumMismatch);
    }

    Ok(Recovered {
        name: header.name,
        data: plaintext,
    })
}
