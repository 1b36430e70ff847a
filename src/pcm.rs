// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmaudio

//! PCM sample buffers and channel interleaving.
//!
//! The embedding engine addresses the carrier as one linear sequence of
//! 16-bit cells. Multi-channel audio is flattened by interleaving the
//! per-channel planes frame by frame (ch0\[0\], ch1\[0\], ch0\[1\], ...), and
//! restored by the inverse split. The round trip is exact for any channel
//! count ≥ 1.

use crate::stego::error::StegoError;

/// Interleave per-channel sample planes into one linear sequence.
///
/// # Errors
/// [`StegoError::ChannelShape`] if `planes` is empty or the planes have
/// unequal lengths.
pub fn interleave(planes: &[Vec<i16>]) -> Result<Vec<i16>, StegoError> {
    let first = planes.first().ok_or(StegoError::ChannelShape)?;
    let frames = first.len();
    if planes.iter().any(|p| p.len() != frames) {
        return Err(StegoError::ChannelShape);
    }

    let mut flat = Vec::with_capacity(frames * planes.len());
    for frame in 0..frames {
        for plane in planes {
            flat.push(plane[frame]);
        }
    }
    Ok(flat)
}

/// Split an interleaved sequence back into per-channel planes.
///
/// # Errors
/// [`StegoError::ChannelShape`] if `channels` is 0 or `flat.len()` is not a
/// multiple of `channels`.
pub fn deinterleave(flat: &[i16], channels: usize) -> Result<Vec<Vec<i16>>, StegoError> {
    if channels == 0 || flat.len() % channels != 0 {
        return Err(StegoError::ChannelShape);
    }

    let frames = flat.len() / channels;
    let mut planes = vec![Vec::with_capacity(frames); channels];
    for (i, &sample) in flat.iter().enumerate() {
        planes[i % channels].push(sample);
    }
    Ok(planes)
}

/// An owned PCM carrier: interleaved 16-bit samples plus stream metadata.
///
/// The engine never mutates a `SampleBuffer` in place; embedding produces a
/// new buffer with the same channel count and sample rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleBuffer {
    channels: u16,
    sample_rate: u32,
    samples: Vec<i16>,
}

impl SampleBuffer {
    /// Wrap interleaved samples.
    ///
    /// # Errors
    /// [`StegoError::ChannelShape`] if `channels` is 0 or the sample count is
    /// not a multiple of the channel count.
    pub fn new(samples: Vec<i16>, channels: u16, sample_rate: u32) -> Result<Self, StegoError> {
        if channels == 0 || samples.len() % channels as usize != 0 {
            return Err(StegoError::ChannelShape);
        }
        Ok(Self { channels, sample_rate, samples })
    }

    /// Build a buffer from per-channel planes (e.g. a codec decode result).
    pub fn from_planes(planes: &[Vec<i16>], sample_rate: u32) -> Result<Self, StegoError> {
        let samples = interleave(planes)?;
        Ok(Self {
            channels: planes.len() as u16,
            sample_rate,
            samples,
        })
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// The flattened, interleaved view the engine embeds into.
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Total number of addressable cells (samples × channels).
    pub fn total_cells(&self) -> usize {
        self.samples.len()
    }

    /// Frames per channel.
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Split back into per-channel planes for re-encoding.
    pub fn planes(&self) -> Vec<Vec<i16>> {
        // Shape was validated on construction, so this cannot fail.
        deinterleave(&self.samples, self.channels as usize).unwrap_or_default()
    }

    /// A new buffer with the same shape metadata but different samples.
    pub(crate) fn with_samples(&self, samples: Vec<i16>) -> Self {
        Self {
            channels: self.channels,
            sample_rate: self.sample_rate,
            samples,
        }
    }
}
