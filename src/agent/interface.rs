use async_trait::async_trait;

use crate::error::ResponseError;

/// Language-model collaborator producing the spoken reply
#[async_trait]
pub trait Responder: Send + Sync {
    /// Produce a reply to the recognized `text`
    async fn respond(&self, text: &str) -> Result<String, ResponseError>;
}
