//! Response middleware for routing replies.
//!
//! Supports both direct forwarding to the outgoing chat queue and capturing
//! replies in memory (tests, and callers that batch replies themselves).
//!
//! # Slow Consumers
//!
//! When the outgoing queue stays full for [`SEND_TIMEOUT`], the reply is
//! dropped and [`HandlerError::SendTimeout`] is returned so the caller can
//! notice a stalled chat connection.

use crate::error::HandlerError;
use crate::message::Reply;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};

/// Timeout for attempting to send to a slow consumer before giving up.
pub const SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Middleware for routing replies.
/// Direct forwards to the outgoing queue; Capturing buffers them.
#[derive(Clone, Copy)]
pub enum ResponseMiddleware<'a> {
    Direct(&'a mpsc::Sender<Reply>),
    Capturing(&'a Mutex<Vec<Reply>>),
}

impl<'a> ResponseMiddleware<'a> {
    /// Send or buffer a reply depending on middleware mode.
    pub async fn send(&self, reply: Reply) -> Result<(), HandlerError> {
        match self {
            Self::Direct(tx) => match tokio::time::timeout(SEND_TIMEOUT, tx.send(reply)).await {
                Ok(result) => result.map_err(|_closed| HandlerError::ChannelClosed),
                Err(_elapsed) => {
                    tracing::warn!(
                        "Reply queue full: consumer not reading (timeout after {:?})",
                        SEND_TIMEOUT
                    );
                    Err(HandlerError::SendTimeout(SEND_TIMEOUT))
                }
            },
            Self::Capturing(buf) => {
                let mut guard = buf.lock().await;
                guard.push(reply);
                Ok(())
            }
        }
    }
}
