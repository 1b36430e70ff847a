// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmaudio

//! Keyed byte-stream obfuscation.
//!
//! A reversible additive transform over the payload: each byte is shifted by
//! the next byte of the cycled UTF-8 key, modulo 256. `decrypt(encrypt(x, k),
//! k) == x` for every byte sequence `x` and non-empty key `k`.
//!
//! This is an obfuscation layer, not a security primitive. Confidentiality
//! against a capable adversary is out of scope for the engine.

use crate::stego::error::StegoError;

/// Shift each byte forward by the cycled key stream.
///
/// # Errors
/// [`StegoError::EmptyKey`] if `key` is empty.
pub fn encrypt(data: &[u8], key: &str) -> Result<Vec<u8>, StegoError> {
    apply(data, key, false)
}

/// Shift each byte backward by the cycled key stream.
///
/// # Errors
/// [`StegoError::EmptyKey`] if `key` is empty.
pub fn decrypt(data: &[u8], key: &str) -> Result<Vec<u8>, StegoError> {
    apply(data, key, true)
}

fn apply(data: &[u8], key: &str, invert: bool) -> Result<Vec<u8>, StegoError> {
    let key_bytes = key.as_bytes();
    if key_bytes.is_empty() {
        return Err(StegoError::EmptyKey);
    }

    let out = data
        .iter()
        .zip(key_bytes.iter().cycle())
        .map(|(&x, &k)| if invert { x.wrapping_sub(k) } else { x.wrapping_add(k) })
        .collect();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let data = b"the quick brown fox \x00\xff\x80 jumps";
        let out = decrypt(&encrypt(data, "passphrase").unwrap(), "passphrase").unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn roundtrip_all_byte_values() {
        let data: Vec<u8> = (0u16..=255).map(|b| b as u8).collect();
        let out = decrypt(&encrypt(&data, "k").unwrap(), "k").unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn key_cycles_over_payload() {
        // Key "ab" -> offsets 97, 98, 97, 98.
        let out = encrypt(&[0, 0, 0, 0], "ab").unwrap();
        assert_eq!(out, vec![97, 98, 97, 98]);
    }

    #[test]
    fn addition_wraps_mod_256() {
        let out = encrypt(&[200], "d").unwrap(); // 200 + 100 = 300 -> 44
        assert_eq!(out, vec![44]);
        assert_eq!(decrypt(&out, "d").unwrap(), vec![200]);
    }

    #[test]
    fn empty_key_rejected() {
        assert!(matches!(encrypt(b"x", ""), Err(StegoError::EmptyKey)));
        assert!(matches!(decrypt(b"x", ""), Err(StegoError::EmptyKey)));
    }

    #[test]
    fn wrong_key_garbles() {
        let ciphertext = encrypt(b"hello", "right").unwrap();
        assert_ne!(decrypt(&ciphertext, "wrong").unwrap(), b"hello");
    }

    #[test]
    fn multibyte_key_uses_utf8_encoding() {
        let ciphertext = encrypt(b"data", "ключ").unwrap();
        assert_eq!(decrypt(&ciphertext, "ключ").unwrap(), b"data");
    }
}
