use async_trait::async_trait;

use super::interface::Responder;
use crate::error::ResponseError;

/// Responder that repeats what it heard
#[derive(Default)]
pub struct EchoResponder;

#[async_trait]
impl Responder for EchoResponder {
    async fn respond(&self, text: &str) -> Result<String, ResponseError> {
        Ok(format!("You said: {}", text))
    }
}
