use scene_infer::wav::{parse_wav, read_wav, write_wav};
use tempfile::NamedTempFile;

/// Build a WAV byte image with the given fmt fields and raw data chunk.
fn wav_bytes(audio_format: u16, channels: u16, sample_rate: u32, bits: u16, data: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data.len() as u32).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&audio_format.to_le_bytes());
    bytes.extend_from_slice(&channels.to_le_bytes());
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&(sample_rate * channels as u32 * (bits as u32 / 8)).to_le_bytes());
    bytes.extend_from_slice(&(channels * bits / 8).to_le_bytes());
    bytes.extend_from_slice(&bits.to_le_bytes());
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&(data.len() as u32).to_le_bytes());
    bytes.extend_from_slice(data);
    bytes
}

#[test]
fn written_clip_reads_back() -> anyhow::Result<()> {
    let file = NamedTempFile::new()?;
    let samples = vec![0.0, 0.5, -0.5, 1.0, -1.0];
    write_wav(file.path(), 32_000, &samples)?;

    let clip = read_wav(file.path())?;
    assert_eq!(clip.sample_rate, 32_000);
    assert_eq!(clip.samples.len(), samples.len());
    for (got, want) in clip.samples.iter().zip(samples.iter()) {
        // One quantization step of 16-bit PCM.
        assert!((got - want).abs() < 1.0 / 32_000.0);
    }
    Ok(())
}

#[test]
fn stereo_frames_average_to_mono() {
    let mut data = Vec::new();
    for (left, right) in [(1000i16, 3000i16), (-2000, 2000), (0, 0)] {
        data.extend_from_slice(&left.to_le_bytes());
        data.extend_from_slice(&right.to_le_bytes());
    }
    let clip = parse_wav(&wav_bytes(1, 2, 32_000, 16, &data)).unwrap();

    assert_eq!(clip.samples.len(), 3);
    let expected = 2000.0 / i16::MAX as f32;
    assert!((clip.samples[0] - expected).abs() < 1e-6);
    assert!(clip.samples[1].abs() < 1e-6);
    assert_eq!(clip.samples[2], 0.0);
}

#[test]
fn float32_payload_is_read_directly() {
    let mut data = Vec::new();
    for value in [0.25f32, -0.75, 1.0] {
        data.extend_from_slice(&value.to_le_bytes());
    }
    let clip = parse_wav(&wav_bytes(3, 1, 48_000, 32, &data)).unwrap();

    assert_eq!(clip.sample_rate, 48_000);
    assert_eq!(clip.samples, vec![0.25, -0.75, 1.0]);
}

#[test]
fn rejects_non_riff_data() {
    let err = parse_wav(b"definitely not audio").unwrap_err();
    assert!(err.to_string().contains("RIFF"));
}

#[test]
fn rejects_truncated_chunk() {
    let mut bytes = wav_bytes(1, 1, 32_000, 16, &[0u8; 8]);
    bytes.truncate(bytes.len() - 4);
    assert!(parse_wav(&bytes).is_err());
}

#[test]
fn rejects_unsupported_encoding() {
    // 8-bit PCM is not supported.
    let err = parse_wav(&wav_bytes(1, 1, 32_000, 8, &[0u8; 4])).unwrap_err();
    assert!(err.to_string().contains("unsupported"));
}

#[test]
fn rejects_missing_data_chunk() {
    let full = wav_bytes(1, 1, 32_000, 16, &[]);
    // Keep the header and fmt chunk, drop the data chunk entirely.
    let err = parse_wav(&full[..36]).unwrap_err();
    assert!(err.to_string().contains("data"));
}
