// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmaudio

//! Container header framing.
//!
//! The container is the binary envelope written into (or read from) the
//! carrier. All multi-byte fields are little-endian:
//!
//! ```text
//! [4 bytes ] magic "BTFY"
//! [1 byte  ] version (1 or 2)
//! [1 byte  ] flags: bit0=encrypted, bit1=random-start, bits2..=depth-1
//! [8 bytes ] payload size (u64)
//! [1 byte  ] name length (0..=255)
//! [N bytes ] name (UTF-8)
//! [4 bytes ] CRC-32 of the plaintext payload
//! ```
//!
//! Total header size = 15 + name_length + 4 bytes.
//!
//! The bit-depth field width depends on the version: v1 stores depth−1 in
//! 2 bits (depths 1–4), v2 in 3 bits (depths 1–8). A parser must therefore
//! read the version byte before interpreting the flags byte; versions ≥ 3
//! are rejected as unsupported. The builder emits the lowest version able
//! to express the requested depth, so v1 carriers stay readable by older
//! decoders.

use crate::stego::error::StegoError;
use crate::stego::lsb;

/// Container magic constant.
pub const MAGIC: [u8; 4] = *b"BTFY";

/// Version with a 2-bit depth field (depths 1–4).
pub const VERSION_V1: u8 = 1;
/// Version with a 3-bit depth field (depths 1–8).
pub const VERSION_V2: u8 = 2;

/// Fixed bytes before the name: magic(4) + version(1) + flags(1) + size(8)
/// + name_len(1).
pub const HEADER_FIXED: usize = 15;
/// CRC-32 trailer length.
pub const CRC_LEN: usize = 4;
/// Smallest possible header (empty name).
pub const MIN_HEADER_BYTES: usize = HEADER_FIXED + CRC_LEN; // 19
/// Largest possible header (255-byte name).
pub const MAX_HEADER_BYTES: usize = HEADER_FIXED + 255 + CRC_LEN; // 274
/// Generous upper-bound prefix read before the exact header length (which
/// depends on the name length) is known.
pub const HEADER_SCAN_BYTES: usize = 320;

const FLAG_ENCRYPTED: u8 = 1 << 0;
const FLAG_RANDOM_START: u8 = 1 << 1;
const DEPTH_SHIFT: u8 = 2;
const DEPTH_MASK_V1: u8 = 0b11;
const DEPTH_MASK_V2: u8 = 0b111;

/// Parsed container header. Built once at embed time, parsed fresh on every
/// recovery attempt, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub encrypted: bool,
    pub random_start: bool,
    pub depth: u8,
    pub payload_len: u64,
    pub name: String,
    pub checksum: u32,
}

/// Serialize a container header.
///
/// The name is truncated to 255 UTF-8 bytes on a character boundary.
///
/// # Errors
/// [`StegoError::InvalidBitDepth`] for a depth outside 1..=8.
pub fn build_header(
    encrypted: bool,
    random_start: bool,
    depth: u8,
    payload_len: u64,
    name: &str,
    checksum: u32,
) -> Result<Vec<u8>, StegoError> {
    lsb::validate_depth(depth)?;

    let version = if depth <= 4 { VERSION_V1 } else { VERSION_V2 };
    let mask = if version == VERSION_V1 { DEPTH_MASK_V1 } else { DEPTH_MASK_V2 };
    let mut flags = ((depth - 1) & mask) << DEPTH_SHIFT;
    if encrypted {
        flags |= FLAG_ENCRYPTED;
    }
    if random_start {
        flags |= FLAG_RANDOM_START;
    }

    let name_bytes = truncate_utf8(name, 255).as_bytes();

    let mut out = Vec::with_capacity(HEADER_FIXED + name_bytes.len() + CRC_LEN);
    out.extend_from_slice(&MAGIC);
    out.push(version);
    out.push(flags);
    out.extend_from_slice(&payload_len.to_le_bytes());
    out.push(name_bytes.len() as u8);
    out.extend_from_slice(name_bytes);
    out.extend_from_slice(&checksum.to_le_bytes());
    Ok(out)
}

/// Parse a container header from the start of `bytes`.
///
/// `bytes` may be longer than the header (e.g. a scan window followed by
/// payload data); the actual header length is determined from the embedded
/// name-length field. Returns the header and the number of bytes consumed.
///
/// # Errors
/// - [`StegoError::TruncatedHeader`] if `bytes` ends before the full header.
/// - [`StegoError::BadMagic`] if the magic constant does not match at offset 0.
/// - [`StegoError::UnsupportedVersion`] for any version other than 1 or 2.
pub fn parse_header(bytes: &[u8]) -> Result<(Header, usize), StegoError> {
    if bytes.len() < MIN_HEADER_BYTES {
        return Err(StegoError::TruncatedHeader);
    }
    if bytes[..4] != MAGIC {
        return Err(StegoError::BadMagic);
    }

    // The version byte decides how the flags byte is laid out, so it is
    // read first.
    let version = bytes[4];
    let flags = bytes[5];
    let depth = match version {
        VERSION_V1 => ((flags >> DEPTH_SHIFT) & DEPTH_MASK_V1) + 1,
        VERSION_V2 => ((flags >> DEPTH_SHIFT) & DEPTH_MASK_V2) + 1,
        v => return Err(StegoError::UnsupportedVersion(v)),
    };
    let encrypted = flags & FLAG_ENCRYPTED != 0;
    let random_start = flags & FLAG_RANDOM_START != 0;

    let payload_len = u64::from_le_bytes(bytes[6..14].try_into().expect("8-byte slice"));
    let name_len = bytes[14] as usize;

    let consumed = HEADER_FIXED + name_len + CRC_LEN;
    if bytes.len() < consumed {
        return Err(StegoError::TruncatedHeader);
    }

    let name = String::from_utf8_lossy(&bytes[HEADER_FIXED..HEADER_FIXED + name_len]).into_owned();
    let crc_start = HEADER_FIXED + name_len;
    let checksum = u32::from_le_bytes(bytes[crc_start..crc_start + 4].try_into().expect("4-byte slice"));

    Ok((
        Header {
            encrypted,
            random_start,
            depth,
            payload_len,
            name,
            checksum,
        },
        consumed,
    ))
}

/// Truncate a string to at most `max` bytes without splitting a character.
fn truncate_utf8(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_parse_roundtrip() {
        let built = build_header(true, false, 3, 1234, "secret.bin", 0xDEAD_BEEF).unwrap();
        let (header, consumed) = parse_header(&built).unwrap();

        assert_eq!(consumed, built.len());
        assert_eq!(consumed, HEADER_FIXED + "secret.bin".len() + CRC_LEN);
        assert!(header.encrypted);
        assert!(!header.random_start);
        assert_eq!(header.depth, 3);
        assert_eq!(header.payload_len, 1234);
        assert_eq!(header.name, "secret.bin");
        assert_eq!(header.checksum, 0xDEAD_BEEF);
    }

    #[test]
    fn empty_name_header_is_19_bytes() {
        let built = build_header(false, false, 1, 5, "", 42).unwrap();
        assert_eq!(built.len(), MIN_HEADER_BYTES);
        let (header, consumed) = parse_header(&built).unwrap();
        assert_eq!(consumed, 19);
        assert_eq!(header.name, "");
    }

    #[test]
    fn low_depths_use_v1_two_bit_field() {
        for depth in 1..=4u8 {
            let built = build_header(false, false, depth, 0, "", 0).unwrap();
            assert_eq!(built[4], VERSION_V1, "depth {depth}");
            assert_eq!(built[5], (depth - 1) << 2, "depth {depth}");
            let (header, _) = parse_header(&built).unwrap();
            assert_eq!(header.depth, depth);
        }
    }

    #[test]
    fn high_depths_use_v2_three_bit_field() {
        for depth in 5..=8u8 {
            let built = build_header(false, false, depth, 0, "", 0).unwrap();
            assert_eq!(built[4], VERSION_V2, "depth {depth}");
            assert_eq!(built[5], (depth - 1) << 2, "depth {depth}");
            let (header, _) = parse_header(&built).unwrap();
            assert_eq!(header.depth, depth);
        }
    }

    #[test]
    fn v2_depth_would_alias_under_v1_rules() {
        // Depth 5 stores 0b100 in the field; a 2-bit read would see 0b00.
        // The explicit version tag is what keeps the two layouts apart.
        let built = build_header(false, false, 5, 0, "", 0).unwrap();
        let two_bit_read = ((built[5] >> 2) & 0b11) + 1;
        assert_eq!(two_bit_read, 1);
        let (header, _) = parse_header(&built).unwrap();
        assert_eq!(header.depth, 5);
    }

    #[test]
    fn future_version_rejected() {
        let mut built = build_header(false, false, 2, 9, "x", 7).unwrap();
        built[4] = 3;
        assert!(matches!(parse_header(&built), Err(StegoError::UnsupportedVersion(3))));
        built[4] = 0xFF;
        assert!(matches!(parse_header(&built), Err(StegoError::UnsupportedVersion(0xFF))));
    }

    #[test]
    fn bad_magic_rejected() {
        let mut built = build_header(false, false, 2, 9, "x", 7).unwrap();
        built[0] ^= 0xFF;
        assert!(matches!(parse_header(&built), Err(StegoError::BadMagic)));
    }

    #[test]
    fn truncated_input_rejected() {
        let built = build_header(false, false, 2, 9, "name", 7).unwrap();
        assert!(matches!(parse_header(&built[..4]), Err(StegoError::TruncatedHeader)));
        assert!(matches!(
            parse_header(&built[..built.len() - 1]),
            Err(StegoError::TruncatedHeader)
        ));
        assert!(matches!(parse_header(&[]), Err(StegoError::TruncatedHeader)));
    }

    #[test]
    fn invalid_depth_rejected() {
        assert!(matches!(
            build_header(false, false, 0, 0, "", 0),
            Err(StegoError::InvalidBitDepth(0))
        ));
        assert!(matches!(
            build_header(false, false, 9, 0, "", 0),
            Err(StegoError::InvalidBitDepth(9))
        ));
    }

    #[test]
    fn long_name_truncated_to_255_bytes() {
        let name = "n".repeat(300);
        let built = build_header(false, false, 2, 0, &name, 0).unwrap();
        let (header, consumed) = parse_header(&built).unwrap();
        assert_eq!(header.name.len(), 255);
        assert_eq!(consumed, HEADER_FIXED + 255 + CRC_LEN);
        assert_eq!(consumed, MAX_HEADER_BYTES);
    }

    #[test]
    fn multibyte_name_truncated_on_char_boundary() {
        // 85 three-byte chars = 255 bytes; one more would split a character.
        let name = "日".repeat(86);
        let built = build_header(false, false, 2, 0, &name, 0).unwrap();
        let (header, _) = parse_header(&built).unwrap();
        assert_eq!(header.name, "日".repeat(85));
    }

    #[test]
    fn flag_bits_roundtrip() {
        let built = build_header(true, true, 4, 1, "", 0).unwrap();
        assert_eq!(built[5] & 0b11, 0b11);
        let (header, _) = parse_header(&built).unwrap();
        assert!(header.encrypted);
        assert!(header.random_start);
    }

    #[test]
    fn parse_ignores_trailing_payload_bytes() {
        let mut built = build_header(false, false, 2, 3, "f", 1).unwrap();
        let header_len = built.len();
        built.extend_from_slice(&[0xAA, 0xBB, 0xCC]);
        let (_, consumed) = parse_header(&built).unwrap();
        assert_eq!(consumed, header_len);
    }

    #[test]
    fn scan_window_covers_largest_header() {
        assert!(HEADER_SCAN_BYTES >= MAX_HEADER_BYTES);
    }
}
