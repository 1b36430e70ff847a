// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmaudio

//! Carrier capacity and embedding quality estimates.
//!
//! Capacity is exact, not heuristic: every cell contributes `depth` low-order
//! bits, so a carrier of `total_cells` cells holds
//! `total_cells * depth / 8` payload bytes (header included).

/// Embedding capacity in bytes at the given depth (1..=8).
pub fn capacity_bytes(total_cells: usize, depth: u8) -> usize {
    total_cells * depth as usize / 8
}

/// Capacity at every supported depth, for caller-side reporting.
pub fn capacity_table(total_cells: usize) -> [(u8, usize); 8] {
    core::array::from_fn(|i| {
        let depth = (i + 1) as u8;
        (depth, capacity_bytes(total_cells, depth))
    })
}

/// Peak signal-to-noise ratio between an original and a stego buffer, in dB.
///
/// Computed over 16-bit samples with `i16::MAX` as peak signal. Identical
/// buffers report 100 dB. Callers surface this as an embedding quality
/// figure; typical LSB embeds at low depths land far above 60 dB.
pub fn psnr_db(original: &[i16], stego: &[i16]) -> f64 {
    debug_assert_eq!(original.len(), stego.len());
    if original.is_empty() {
        return 100.0;
    }

    let sum_sq: i64 = original
        .iter()
        .zip(stego)
        .map(|(&o, &s)| {
            let d = i64::from(o) - i64::from(s);
            d * d
        })
        .sum();
    if sum_sq == 0 {
        return 100.0;
    }

    let mse = sum_sq as f64 / original.len() as f64;
    let max_i = f64::from(i16::MAX);
    20.0 * max_i.log10() - 10.0 * mse.log10()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_is_floor_of_bits_over_eight() {
        assert_eq!(capacity_bytes(1_000_000, 8), 1_000_000);
        assert_eq!(capacity_bytes(1_000_000, 2), 250_000);
        assert_eq!(capacity_bytes(7, 1), 0);
        assert_eq!(capacity_bytes(9, 1), 1);
    }

    #[test]
    fn table_covers_all_depths() {
        let table = capacity_table(8000);
        assert_eq!(table[0], (1, 1000));
        assert_eq!(table[7], (8, 8000));
    }

    #[test]
    fn identical_buffers_report_100_db() {
        let samples = vec![0i16, 100, -200, 32767];
        assert_eq!(psnr_db(&samples, &samples), 100.0);
    }

    #[test]
    fn small_perturbation_keeps_high_psnr() {
        let original = vec![1000i16; 10_000];
        let mut stego = original.clone();
        for cell in stego.iter_mut().take(100) {
            *cell ^= 1;
        }
        let db = psnr_db(&original, &stego);
        // MSE = 0.01 -> ~110 dB.
        assert!(db > 105.0, "psnr {db}");
        assert!(db < 115.0, "psnr {db}");
    }

    #[test]
    fn heavy_damage_lowers_psnr() {
        let original = vec![0i16; 1000];
        let stego = vec![10_000i16; 1000];
        assert!(psnr_db(&original, &stego) < 20.0);
    }
}
