use std::fmt::Display;

use axum::body::{Body, Bytes};
use futures::{Stream, StreamExt};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config_manager::system::IngressConfig;
use crate::error::{reason, ApiError};

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Raw audio received from the device. Lives for one request only.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioPayload {
    bytes: Bytes,
    content_type: String,
}

impl AudioPayload {
    pub fn new(bytes: Bytes, content_type: impl Into<String>) -> Self {
        Self {
            bytes,
            content_type: content_type.into(),
        }
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum IngressError {
    #[error("audio payload is empty")]
    Empty,

    #[error("audio payload of {size} bytes exceeds the {max} byte ceiling")]
    TooLarge { size: u64, max: usize },

    #[error("failed to read audio stream: {0}")]
    Unreadable(String),
}

impl IngressError {
    pub fn reason(&self) -> &'static str {
        match self {
            IngressError::Empty => reason::EMPTY,
            IngressError::TooLarge { .. } => reason::TOO_LARGE,
            IngressError::Unreadable(_) => reason::UNREADABLE,
        }
    }
}

impl From<IngressError> for ApiError {
    fn from(err: IngressError) -> Self {
        ApiError::Validation {
            reason: err.reason(),
        }
    }
}

/// Buffers and validates inbound audio
#[derive(Debug, Clone)]
pub struct Ingress {
    max_audio_bytes: usize,
}

impl Ingress {
    pub fn new(config: &IngressConfig) -> Self {
        Self {
            max_audio_bytes: config.max_audio_bytes,
        }
    }

    /// Validate an already buffered body
    pub fn accept(
        &self,
        bytes: Bytes,
        content_type: Option<&str>,
    ) -> Result<AudioPayload, IngressError> {
        if bytes.is_empty() {
            return Err(IngressError::Empty);
        }
        if bytes.len() > self.max_audio_bytes {
            return Err(IngressError::TooLarge {
                size: bytes.len() as u64,
                max: self.max_audio_bytes,
            });
        }

        info!("Received audio: {} bytes", bytes.len());
        Ok(AudioPayload::new(
            bytes,
            content_type.unwrap_or(DEFAULT_CONTENT_TYPE),
        ))
    }

    /// Read a request body, refusing it as soon as it is known to be too large
    pub async fn receive(
        &self,
        body: Body,
        declared_len: Option<u64>,
        content_type: Option<&str>,
    ) -> Result<AudioPayload, IngressError> {
        self.receive_stream(body.into_data_stream(), declared_len, content_type)
            .await
    }

    pub async fn receive_stream<S, E>(
        &self,
        mut stream: S,
        declared_len: Option<u64>,
        content_type: Option<&str>,
    ) -> Result<AudioPayload, IngressError>
    where
        S: Stream<Item = Result<Bytes, E>> + Unpin,
        E: Display,
    {
        if let Some(len) = declared_len {
            if len > self.max_audio_bytes as u64 {
                warn!(
                    "Refusing audio with declared length {} (max {})",
                    len, self.max_audio_bytes
                );
                return Err(IngressError::TooLarge {
                    size: len,
                    max: self.max_audio_bytes,
                });
            }
        }

        let capacity = declared_len
            .map(|len| len as usize)
            .unwrap_or(0)
            .min(self.max_audio_bytes);
        let mut buffer = Vec::with_capacity(capacity);

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| IngressError::Unreadable(e.to_string()))?;
            if buffer.len() + chunk.len() > self.max_audio_bytes {
                warn!(
                    "Audio stream exceeded {} bytes, aborting read",
                    self.max_audio_bytes
                );
                return Err(IngressError::TooLarge {
                    size: (buffer.len() + chunk.len()) as u64,
                    max: self.max_audio_bytes,
                });
            }
            buffer.extend_from_slice(&chunk);
        }

        debug!("Audio stream finished after {} bytes", buffer.len());
        self.accept(Bytes::from(buffer), content_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn ingress(max: usize) -> Ingress {
        Ingress::new(&IngressConfig {
            max_audio_bytes: max,
        })
    }

    fn chunks(data: &[u8], size: usize) -> Vec<Result<Bytes, std::io::Error>> {
        data.chunks(size)
            .map(|c| Ok(Bytes::copy_from_slice(c)))
            .collect()
    }

    #[test]
    fn accepts_and_forwards_bytes_unchanged() {
        let ingress = ingress(1024);
        for size in [1usize, 2, 511, 1023, 1024] {
            let data: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
            let payload = ingress
                .accept(Bytes::from(data.clone()), Some("audio/wav"))
                .unwrap();
            assert_eq!(payload.bytes().as_ref(), data.as_slice());
            assert_eq!(payload.content_type(), "audio/wav");
        }
    }

    #[test]
    fn rejects_empty_and_oversized() {
        let ingress = ingress(16);
        let empty = ingress.accept(Bytes::new(), None).unwrap_err();
        assert_eq!(empty.reason(), "empty");

        let large = ingress.accept(Bytes::from(vec![0u8; 17]), None).unwrap_err();
        assert_eq!(large.reason(), "too_large");
    }

    #[test]
    fn ceiling_is_inclusive() {
        let payload = ingress(16).accept(Bytes::from(vec![7u8; 16]), None).unwrap();
        assert_eq!(payload.len(), 16);
        assert_eq!(payload.content_type(), DEFAULT_CONTENT_TYPE);
    }

    #[tokio::test]
    async fn stream_is_reassembled_in_order() {
        let data: Vec<u8> = (0..=255u8).cycle().take(16_000).collect();
        let payload = ingress(16_000)
            .receive_stream(stream::iter(chunks(&data, 1000)), Some(16_000), None)
            .await
            .unwrap();
        assert_eq!(payload.bytes().as_ref(), data.as_slice());
    }

    #[tokio::test]
    async fn declared_length_over_ceiling_is_refused_before_reading() {
        // The stream would yield an error if polled at all
        let poisoned = stream::iter(vec![Err::<Bytes, _>(std::io::Error::other("polled"))]);
        let err = ingress(10)
            .receive_stream(poisoned, Some(11), None)
            .await
            .unwrap_err();
        assert!(matches!(err, IngressError::TooLarge { size: 11, max: 10 }));
    }

    #[tokio::test]
    async fn undeclared_stream_over_ceiling_is_refused() {
        let data = vec![1u8; 64];
        let err = ingress(40)
            .receive_stream(stream::iter(chunks(&data, 16)), None, None)
            .await
            .unwrap_err();
        assert_eq!(err.reason(), "too_large");
    }

    #[tokio::test]
    async fn empty_stream_is_refused() {
        let err = ingress(40)
            .receive_stream(stream::iter(chunks(&[], 16)), Some(0), None)
            .await
            .unwrap_err();
        assert_eq!(err.reason(), "empty");
    }

    #[tokio::test]
    async fn broken_stream_is_unreadable() {
        let broken = stream::iter(vec![
            Ok(Bytes::from_static(b"abc")),
            Err(std::io::Error::other("connection reset")),
        ]);
        let err = ingress(40)
            .receive_stream(broken, None, None)
            .await
            .unwrap_err();
        assert_eq!(err.reason(), "unreadable");
    }
}
