//! Command handler context.
//!
//! Defines the `Context<'a>` struct passed to all handlers.

use super::declaration::CommandDeclaration;
use super::invocation::CommandInvocation;
use super::middleware::ResponseMiddleware;
use super::registry::Registry;
use crate::error::HandlerError;
use crate::message::{Reply, ReplyBody, ReplyTarget};

/// Handler context passed to each command handler.
pub struct Context<'a> {
    /// The validated invocation.
    pub invocation: &'a CommandInvocation,
    /// The matched declaration.
    pub declaration: &'a CommandDeclaration,
    /// Command registry (for `!help` and usage statistics).
    pub registry: &'a Registry,
    /// Outgoing replies.
    pub sender: ResponseMiddleware<'a>,
}

impl<'a> Context<'a> {
    pub fn new(
        invocation: &'a CommandInvocation,
        declaration: &'a CommandDeclaration,
        registry: &'a Registry,
        sender: ResponseMiddleware<'a>,
    ) -> Self {
        Self {
            invocation,
            declaration,
            registry,
            sender,
        }
    }

    /// Reply where the command was used.
    #[inline]
    pub async fn reply(&self, text: impl Into<String>) -> Result<(), HandlerError> {
        self.send(self.invocation.reply_target(), ReplyBody::Text(text.into()))
            .await
    }

    /// Reply privately to the sender.
    #[inline]
    pub async fn reply_private(&self, text: impl Into<String>) -> Result<(), HandlerError> {
        self.send(self.invocation.private_target(), ReplyBody::Text(text.into()))
            .await
    }

    pub async fn send(&self, target: ReplyTarget, body: ReplyBody) -> Result<(), HandlerError> {
        self.sender.send(Reply::new(target, body)).await
    }
}
