//! The command handler trait.

use super::context::Context;
use crate::error::HandlerResult;
use async_trait::async_trait;

/// Business logic for one command.
///
/// The dispatcher calls `handle` only after every check has passed, so a
/// handler can rely on the parameter count and the sender's permission.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, ctx: &Context<'_>) -> HandlerResult;
}

/// Handler that does nothing. Used by declaration tests.
#[cfg(test)]
pub(crate) struct NoopHandler;

#[cfg(test)]
#[async_trait]
impl Handler for NoopHandler {
    async fn handle(&self, _ctx: &Context<'_>) -> HandlerResult {
        Ok(())
    }
}
