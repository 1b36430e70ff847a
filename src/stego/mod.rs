// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmaudio

//! Steganographic embedding and recovery pipelines.
//!
//! Two layers:
//!
//! - **Sample level** ([`embed`] / [`recover`]): pure functions over
//!   [`SampleBuffer`]s. Embedding writes the container into the low-order
//!   bits of a copy of the carrier; recovery runs the blind search.
//! - **Carrier level** ([`conceal`] / [`reveal`]): orchestrate the
//!   [`AudioCodec`] and [`SideChannel`] collaborators around the sample
//!   level. `conceal` also attaches the container verbatim to the encoded
//!   carrier; `reveal` tries that lossless copy first, because a lossy
//!   re-encode can destroy the low-order bits the bit-level search depends
//!   on.

pub mod capacity;
pub mod cipher;
pub mod container;
pub mod error;
pub mod lsb;
pub mod offset;
mod pipeline;
pub mod progress;
pub mod search;

pub use error::StegoError;
pub use pipeline::{build_container, embed, embed_container, read_container, recover};
pub use pipeline::{EmbedOptions, Recovered};
pub use search::{Located, SearchBudget};

use crate::codec::{AudioCodec, DecodedAudio, SideChannel};
use crate::pcm::SampleBuffer;

/// Default quality hint handed to the codec on encode (bit rate in kbit/s
/// for lossy targets; lossless codecs ignore it).
pub const DEFAULT_ENCODE_QUALITY: u32 = 192;

/// Capacity and quality figures for one conceal run.
#[derive(Debug, Clone)]
pub struct EmbedReport {
    /// Carrier capacity in bytes at the chosen depth.
    pub capacity: usize,
    /// Size of the embedded container (header + payload) in bytes.
    pub container_bytes: usize,
    /// PSNR of the stego samples against the cover, in dB.
    pub psnr_db: f64,
}

/// Outcome of [`conceal`]: the finished carrier plus its report.
#[derive(Debug, Clone)]
pub struct ConcealOutcome {
    pub stego_bytes: Vec<u8>,
    pub report: EmbedReport,
}

/// Hide `payload` inside `carrier_bytes`: decode, embed into the samples,
/// re-encode, and attach the container to the side channel.
///
/// # Errors
/// Parameter, capacity and collaborator failures; see [`StegoError`].
pub fn conceal<C: AudioCodec, S: SideChannel>(
    codec: &C,
    side: &S,
    carrier_bytes: &[u8],
    payload: &[u8],
    key: &str,
    opts: &EmbedOptions,
) -> Result<ConcealOutcome, StegoError> {
    let decoded = codec.decode(carrier_bytes)?;
    let cover = SampleBuffer::from_planes(&decoded.planes, decoded.sample_rate)?;

    let container_bytes = pipeline::build_container(payload, key, opts)?;
    let stego = pipeline::embed_container(&cover, &container_bytes, key, opts)?;

    let encoded = codec.encode(
        &DecodedAudio {
            planes: stego.planes(),
            sample_rate: stego.sample_rate(),
        },
        DEFAULT_ENCODE_QUALITY,
    )?;
    let stego_bytes = side.attach(&encoded, &container_bytes)?;

    let report = EmbedReport {
        capacity: capacity::capacity_bytes(cover.total_cells(), opts.depth),
        container_bytes: container_bytes.len(),
        psnr_db: capacity::psnr_db(cover.samples(), stego.samples()),
    };

    Ok(ConcealOutcome { stego_bytes, report })
}

/// Recover a payload from `stego_bytes`, side channel first.
///
/// The attached container is exact, so it is always tried before the
/// bit-level search. A checksum failure on the side-channel copy means the
/// key is wrong (the copy itself is lossless) and is returned immediately;
/// a damaged or missing attachment falls through to decoding the audio and
/// searching the samples.
pub fn reveal<C: AudioCodec, S: SideChannel>(
    codec: &C,
    side: &S,
    stego_bytes: &[u8],
    key: &str,
    budget: &SearchBudget,
) -> Result<Recovered, StegoError> {
    if let Some(raw) = side.retrieve(stego_bytes) {
        match pipeline::read_container(&raw, key) {
            Ok(recovered) => return Ok(recovered),
            Err(StegoError::ChecksumMismatch) => return Err(StegoError::ChecksumMismatch),
            Err(_) => {} // damaged attachment; fall back to the bit level
        }
    }

    let decoded = codec.decode(stego_bytes)?;
    let buffer = SampleBuffer::from_planes(&decoded.planes, decoded.sample_rate)?;
    pipeline::recover(&buffer, key, budget)
}
