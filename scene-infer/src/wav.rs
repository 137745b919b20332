//! Minimal RIFF/WAVE reader and writer.
//!
//! Reading supports 16-bit PCM and 32-bit IEEE float payloads; files with
//! more than one channel are averaged down to mono. Writing always emits
//! 16-bit PCM mono, which is what the rest of the toolkit consumes.

use anyhow::{bail, Context, Result};
use bytemuck::cast_slice;
use memmap2::MmapOptions;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::dsp::PCM16_NORMALIZER;

const FORMAT_PCM: u16 = 1;
const FORMAT_IEEE_FLOAT: u16 = 3;

/// A decoded clip: mono samples in `[-1.0, 1.0]` plus the source rate.
#[derive(Debug)]
pub struct WavClip {
    pub sample_rate: u32,
    pub samples: Vec<f32>,
}

impl WavClip {
    pub fn duration_seconds(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Read a WAV file through a memory map.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<WavClip> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("failed to open clip {}", path.display()))?;
    let mmap = unsafe { MmapOptions::new().map(&file)? };
    parse_wav(&mmap[..]).with_context(|| format!("failed to decode clip {}", path.display()))
}

/// Decode WAV bytes.
pub fn parse_wav(bytes: &[u8]) -> Result<WavClip> {
    if bytes.len() < 12 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        bail!("not a RIFF/WAVE file");
    }

    let mut offset = 12;
    let mut format: Option<(u16, u16, u32, u16)> = None;
    let mut data: Option<&[u8]> = None;

    while offset + 8 <= bytes.len() {
        let id: [u8; 4] = bytes[offset..offset + 4].try_into().unwrap();
        let size = u32::from_le_bytes(bytes[offset + 4..offset + 8].try_into().unwrap()) as usize;
        offset += 8;
        if offset + size > bytes.len() {
            bail!("truncated chunk {:?}", String::from_utf8_lossy(&id));
        }
        let body = &bytes[offset..offset + size];
        match &id {
            b"fmt " => {
                if size < 16 {
                    bail!("fmt chunk too short: {} bytes", size);
                }
                let audio_format = u16::from_le_bytes(body[0..2].try_into().unwrap());
                let channels = u16::from_le_bytes(body[2..4].try_into().unwrap());
                let sample_rate = u32::from_le_bytes(body[4..8].try_into().unwrap());
                let bits = u16::from_le_bytes(body[14..16].try_into().unwrap());
                format = Some((audio_format, channels, sample_rate, bits));
            }
            b"data" => data = Some(body),
            _ => {}
        }
        // Chunks are word aligned.
        offset += size + (size & 1);
    }

    let (audio_format, channels, sample_rate, bits) =
        format.context("missing fmt chunk")?;
    let data = data.context("missing data chunk")?;
    if channels == 0 {
        bail!("fmt chunk declares zero channels");
    }

    // Sample data is decoded bytewise: the data chunk carries no alignment
    // guarantee beyond the RIFF word boundary.
    let samples = match (audio_format, bits) {
        (FORMAT_PCM, 16) => {
            if data.len() % 2 != 0 {
                bail!("PCM data chunk length {} is not a multiple of 2", data.len());
            }
            data.chunks_exact(2)
                .map(|b| i16::from_le_bytes(b.try_into().unwrap()) as f32 * PCM16_NORMALIZER)
                .collect()
        }
        (FORMAT_IEEE_FLOAT, 32) => {
            if data.len() % 4 != 0 {
                bail!("float data chunk length {} is not a multiple of 4", data.len());
            }
            data.chunks_exact(4)
                .map(|b| f32::from_le_bytes(b.try_into().unwrap()))
                .collect()
        }
        (format, bits) => bail!("unsupported WAV encoding: format {} with {} bits", format, bits),
    };

    Ok(WavClip {
        sample_rate,
        samples: downmix(samples, channels),
    })
}

fn downmix(samples: Vec<f32>, channels: u16) -> Vec<f32> {
    if channels <= 1 {
        return samples;
    }
    let ch = channels as usize;
    samples
        .chunks(ch)
        .map(|frame| frame.iter().sum::<f32>() / ch as f32)
        .collect()
}

/// Write mono samples as a 16-bit PCM WAV file. Samples outside
/// `[-1.0, 1.0]` are clamped.
pub fn write_wav<P: AsRef<Path>>(path: P, sample_rate: u32, samples: &[f32]) -> Result<()> {
    let path = path.as_ref();
    let mut f = File::create(path)
        .with_context(|| format!("failed to create clip {}", path.display()))?;

    let data_len = (samples.len() * 2) as u32;
    let byte_rate = sample_rate * 2;

    f.write_all(b"RIFF")?;
    f.write_all(&(36 + data_len).to_le_bytes())?;
    f.write_all(b"WAVE")?;
    // fmt chunk
    f.write_all(b"fmt ")?;
    f.write_all(&16u32.to_le_bytes())?;
    f.write_all(&FORMAT_PCM.to_le_bytes())?;
    f.write_all(&1u16.to_le_bytes())?; // mono
    f.write_all(&sample_rate.to_le_bytes())?;
    f.write_all(&byte_rate.to_le_bytes())?;
    f.write_all(&2u16.to_le_bytes())?; // block align
    f.write_all(&16u16.to_le_bytes())?; // bits per sample
    // data chunk
    f.write_all(b"data")?;
    f.write_all(&data_len.to_le_bytes())?;
    let pcm: Vec<i16> = samples
        .iter()
        .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16)
        .collect();
    f.write_all(cast_slice(&pcm))?;
    Ok(())
}
