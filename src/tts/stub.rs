use std::io::Cursor;

use async_trait::async_trait;
use axum::body::Bytes;
use hound::{SampleFormat, WavSpec, WavWriter};

use super::interface::Synthesizer;
use crate::error::{ServiceError, SynthesisError};

pub const STUB_SAMPLE_RATE: u32 = 16_000;

/// Silence per character of input text
const SAMPLES_PER_CHAR: usize = 800;

/// Synthesizer that renders silence as 16 kHz mono WAV, 50 ms per character
#[derive(Default)]
pub struct SilentSynthesizer;

impl SilentSynthesizer {
    pub fn render(text: &str) -> Result<Vec<u8>, hound::Error> {
        let spec = WavSpec {
            channels: 1,
            sample_rate: STUB_SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, spec)?;
            for _ in 0..text.chars().count() * SAMPLES_PER_CHAR {
                writer.write_sample(0i16)?;
            }
            writer.finalize()?;
        }
        Ok(cursor.into_inner())
    }
}

#[async_trait]
impl Synthesizer for SilentSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<Bytes, SynthesisError> {
        Self::render(text)
            .map(Bytes::from)
            .map_err(|e| ServiceError::InvalidResponse(format!("Failed to render WAV: {}", e)))
    }
}
