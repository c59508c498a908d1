use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::AppError;

// ============================================================================
// Realtime Broadcast - pub/sub delivery to connected staff/customer clients
// ============================================================================
//
// Channels:
// - one shared staff channel (new orders)
// - one channel per order id (status updates)
//
// Wire envelope: {"event": "<name>", "data": {<flat key/value payload>}}
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BroadcastMessage {
    #[serde(skip)]
    pub channel: String,
    pub event: String,
    pub data: Map<String, Value>,
}

impl BroadcastMessage {
    pub fn new(channel: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            event: event.into(),
            data: Map::new(),
        }
    }

    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }

    pub fn to_payload(&self) -> Result<String, AppError> {
        serde_json::to_string(self)
            .map_err(|e| AppError::Internal(format!("failed to encode broadcast payload: {}", e)))
    }
}

#[async_trait]
pub trait RealtimeBroadcaster: Send + Sync {
    async fn broadcast(&self, message: &BroadcastMessage) -> Result<(), AppError>;
}

/// Used when no realtime transport is configured: messages only hit the log
pub struct LogBroadcaster;

#[async_trait]
impl RealtimeBroadcaster for LogBroadcaster {
    async fn broadcast(&self, message: &BroadcastMessage) -> Result<(), AppError> {
        tracing::debug!(
            channel = %message.channel,
            event = %message.event,
            payload = %message.to_payload()?,
            "Realtime transport disabled, message logged only"
        );
        Ok(())
    }
}
