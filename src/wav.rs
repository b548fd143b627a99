use std::fs::File;
use std::io::Read;

use anyhow::{Context, Result};
use hound::{SampleFormat, WavReader};

/// Sample rate whisper.cpp expects its input in.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Read the audio file and return normalized samples for the engine.
///
/// The file handle lives only for the duration of this call; it is released
/// on every exit path, including failure.
pub fn read_samples(path: &str) -> Result<Vec<f32>> {
    let file = File::open(path).with_context(|| format!("failed to open audio file '{path}'"))?;
    samples_from_reader(file).with_context(|| format!("failed to read audio file '{path}'"))
}

/// Load WAV audio from a reader and return mono samples normalized to
/// `[-1.0, 1.0]`.
///
/// Format requirements: mono, 16-bit integer PCM, at the target sample rate.
/// Enforcing these up front keeps the transcription path simple and gives the
/// user a clear error instead of silently garbled output.
pub fn samples_from_reader<R: Read>(reader: R) -> Result<Vec<f32>> {
    let mut reader = WavReader::new(reader).context("failed to read WAV data")?;
    let spec = reader.spec();

    if spec.channels != 1 {
        anyhow::bail!(
            "expected mono WAV (1 channel), got {} channels",
            spec.channels
        );
    }

    if spec.sample_rate != TARGET_SAMPLE_RATE {
        anyhow::bail!(
            "expected {} Hz sample rate, got {} Hz",
            TARGET_SAMPLE_RATE,
            spec.sample_rate
        );
    }

    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
        anyhow::bail!(
            "expected 16-bit integer PCM, got {}-bit {:?}",
            spec.bits_per_sample,
            spec.sample_format
        );
    }

    let mut samples = Vec::new();
    for sample in reader.samples::<i16>() {
        let pcm = sample?;
        samples.push(pcm as f32 / i16::MAX as f32);
    }

    Ok(samples)
}
