// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmaudio

//! Error types for the audio steganography engine.
//!
//! [`StegoError`] covers all failure modes from container framing through
//! bit-level embedding and blind recovery. Nothing is retried internally;
//! every failure is surfaced to the caller as a typed result.

use core::fmt;

use crate::codec::CodecError;

/// Errors that can occur during embedding or recovery.
#[derive(Debug)]
pub enum StegoError {
    /// The parsed bytes do not start with the container magic.
    BadMagic,
    /// The container version byte is newer than this build understands.
    UnsupportedVersion(u8),
    /// The candidate window ended before a full header could be read.
    TruncatedHeader,
    /// Container (header + payload) exceeds the carrier capacity at the
    /// chosen bit depth. Both figures are in bytes.
    CapacityExceeded { needed: usize, capacity: usize },
    /// CRC-32 mismatch after extraction. Signals either a wrong key or a
    /// corrupted carrier; the two causes are indistinguishable.
    ChecksumMismatch,
    /// The blind search exhausted every depth/offset candidate (or its
    /// attempt budget) without a self-consistent header.
    NoContainerFound,
    /// Bit depth outside the supported 1..=8 range.
    InvalidBitDepth(u8),
    /// An empty key was supplied.
    EmptyKey,
    /// Zero channels, channel planes of unequal length, or an interleaved
    /// buffer whose length is not a multiple of the channel count.
    ChannelShape,
    /// The audio codec or side-channel collaborator failed.
    Codec(CodecError),
    /// The operation was cancelled by the caller.
    Cancelled,
}

impl fmt::Display for StegoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadMagic => write!(f, "container magic not found"),
            Self::UnsupportedVersion(v) => write!(f, "unsupported container version {v}"),
            Self::TruncatedHeader => write!(f, "container header truncated"),
            Self::CapacityExceeded { needed, capacity } => {
                write!(f, "payload exceeds capacity ({needed} > {capacity} bytes)")
            }
            Self::ChecksumMismatch => write!(f, "checksum mismatch (wrong key or damaged carrier)"),
            Self::NoContainerFound => write!(f, "no embedded container found"),
            Self::InvalidBitDepth(d) => write!(f, "bit depth {d} outside supported range 1..=8"),
            Self::EmptyKey => write!(f, "key must not be empty"),
            Self::ChannelShape => write!(f, "invalid channel layout"),
            Self::Codec(e) => write!(f, "{e}"),
            Self::Cancelled => write!(f, "operation cancelled by user"),
        }
    }
}

impl std::error::Error for StegoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Codec(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CodecError> for StegoError {
    fn from(e: CodecError) -> Self {
        Self::Codec(e)
    }
}
