// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmaudio

//! Collaborator interfaces: audio transcoding and the lossless side channel.
//!
//! The engine treats both as opaque services. An [`AudioCodec`] turns
//! compressed carrier bytes into per-channel PCM planes and back; it may be
//! lossy (MP3) or lossless (WAV). A [`SideChannel`] stores the full container
//! verbatim in carrier-level metadata (e.g. an ID3 `PRIV` frame) so that
//! decoding can skip the bit-level search entirely when the tag survives.

use core::fmt;

/// Error reported by a codec or side-channel implementation.
///
/// The engine does not interpret collaborator failures; it carries the
/// message through to the caller.
#[derive(Debug)]
pub struct CodecError {
    message: String,
}

impl CodecError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "audio codec error: {}", self.message)
    }
}

impl std::error::Error for CodecError {}

/// Decoded PCM audio: one plane of 16-bit samples per channel.
///
/// All planes must have the same length (one sample per frame per channel).
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    pub planes: Vec<Vec<i16>>,
    pub sample_rate: u32,
}

impl DecodedAudio {
    /// Channel count (number of planes).
    pub fn channels(&self) -> usize {
        self.planes.len()
    }

    /// Frames per channel, or 0 for an empty decode.
    pub fn frames(&self) -> usize {
        self.planes.first().map_or(0, Vec::len)
    }
}

/// Black-box audio transcoder.
///
/// `encode` may be lossy; the engine never assumes that low-order sample
/// bits survive an encode/decode cycle.
pub trait AudioCodec {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedAudio, CodecError>;

    /// Encode PCM back to carrier bytes. `quality` is a codec-specific hint
    /// (bit rate in kbit/s for lossy targets); lossless codecs ignore it.
    fn encode(&self, audio: &DecodedAudio, quality: u32) -> Result<Vec<u8>, CodecError>;
}

/// Lossless container store attached to the carrier file itself.
pub trait SideChannel {
    /// Attach `container` to `carrier`, replacing any previous attachment.
    fn attach(&self, carrier: &[u8], container: &[u8]) -> Result<Vec<u8>, CodecError>;

    /// Retrieve a previously attached container, or `None` if the carrier
    /// has no attachment (e.g. the tag was stripped by a re-encode).
    fn retrieve(&self, carrier: &[u8]) -> Option<Vec<u8>>;
}
