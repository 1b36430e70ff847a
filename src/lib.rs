// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmaudio

//! # phasm-audio
//!
//! Pure-Rust steganography engine for hiding arbitrary byte payloads in PCM
//! audio sample streams. The payload is wrapped in a self-describing binary
//! container and written into the low-order bits of the carrier's samples:
//!
//! - **Container format**: magic, version, flags, payload size, name and a
//!   CRC-32 integrity checksum. Two header versions with different bit-depth
//!   field widths are supported.
//! - **Blind recovery**: decoding needs no out-of-band pointer. The engine
//!   searches candidate bit depths (1–8) and offsets until it finds a
//!   self-consistent header, then re-extracts the exact container region.
//! - **Side channel first**: the full container can be attached losslessly to
//!   the carrier file (e.g. an ID3 `PRIV` frame). [`reveal`] always tries the
//!   side channel before falling back to the bit-level search, which must
//!   tolerate carriers whose low-order bits were perturbed by a lossy
//!   re-encode.
//!
//! Audio transcoding and metadata tagging are consumed through the
//! [`AudioCodec`] and [`SideChannel`] traits (`codec` module); the engine
//! itself performs no network or disk I/O and never mutates the caller's
//! sample buffer in place.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use phasm_audio::{embed, recover, EmbedOptions, SampleBuffer, SearchBudget};
//!
//! let cover = SampleBuffer::new(samples, 2, 44_100)?;
//! let stego = embed(&cover, b"attack at dawn", "passphrase", &EmbedOptions::new(2))?;
//! let recovered = recover(&stego, "passphrase", &SearchBudget::default())?;
//! assert_eq!(recovered.data, b"attack at dawn");
//! ```

pub mod codec;
pub mod pcm;
pub mod stego;

pub use codec::{AudioCodec, CodecError, DecodedAudio, SideChannel};
pub use pcm::SampleBuffer;
pub use stego::capacity::{capacity_bytes, capacity_table, psnr_db};
pub use stego::progress;
pub use stego::{conceal, reveal, ConcealOutcome, EmbedReport};
pub use stego::{embed, read_container, recover, EmbedOptions, Recovered, StegoError};
pub use stego::{Located, SearchBudget};
