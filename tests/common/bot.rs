//! Test bot harness.

#![allow(dead_code)]

use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use mechasqueak::caps::{Capability, CapabilitySet};
use mechasqueak::config::Config;
use mechasqueak::error::{HandlerError, HandlerResult};
use mechasqueak::handlers::{
    AllowedDestination, Category, CommandDeclaration, CommandInvocation, Context,
    DispatchOutcome, Dispatcher, Handler, Param, Registry, ResponseMiddleware,
};
use mechasqueak::message::{ChatMessage, Reply, Sender};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Fixed start of every test timeline.
pub fn at(offset_ms: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(3308, 6, 1, 12, 0, 0).unwrap() + ChronoDuration::milliseconds(offset_ms)
}

/// Handler that remembers every invocation it was given.
#[derive(Default)]
pub struct RecordingHandler {
    calls: Mutex<Vec<CommandInvocation>>,
    fail: bool,
}

impl RecordingHandler {
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<CommandInvocation> {
        self.calls.lock().clone()
    }
}

#[async_trait::async_trait]
impl Handler for RecordingHandler {
    async fn handle(&self, ctx: &Context<'_>) -> HandlerResult {
        self.calls.lock().push(ctx.invocation.clone());
        if self.fail {
            return Err(HandlerError::Internal("rescue API unavailable".to_string()));
        }
        Ok(())
    }
}

/// The commands used by the dispatch tests, all sharing one handler.
pub fn sample_registry(handler: Arc<RecordingHandler>) -> Registry {
    let mut registry = Registry::new();
    let declarations = vec![
        CommandDeclaration::builder(["sysc", "syscorrect"], handler.clone())
            .param(Param::new("system", "Alioth"))
            .category(Category::Utility)
            .cooldown(Duration::from_secs(30))
            .build(),
        CommandDeclaration::builder(["dist"], handler.clone())
            .param(Param::new("from", "Sol"))
            .param(Param::new("to", "Colonia"))
            .category(Category::Utility)
            .cooldown(Duration::from_secs(60))
            .build(),
        CommandDeclaration::builder(["cmd"], handler.clone())
            .options("abc")
            .argument("arg", "value")
            .param(Param::new("first", "p1"))
            .param(Param::new("second", "p2").optional())
            .build(),
        CommandDeclaration::builder(["inject"], handler.clone())
            .param(Param::new("case", "4"))
            .param(Param::new("message", "client is in open").continuous())
            .category(Category::Board)
            .permission(Capability::Rescue)
            .build(),
        CommandDeclaration::builder(["assign", "go"], handler.clone())
            .param(Param::new("case", "4"))
            .param(Param::new("rats", "SpaceDawg").multiple())
            .category(Category::Rescue)
            .permission(Capability::DispatchWrite)
            .allowed_in(AllowedDestination::Channel)
            .build(),
        CommandDeclaration::builder(["prep", "pc"], handler.clone())
            .param(Param::new("client", "SpaceDawg"))
            .category(Category::Facts)
            .localized()
            .build(),
        CommandDeclaration::builder(["quote"], handler.clone())
            .options("f")
            .argument("from", "nickname")
            .param(Param::new("case", "4"))
            .category(Category::Board)
            .build(),
        CommandDeclaration::builder(["whoami"], handler.clone())
            .category(Category::Utility)
            .allowed_in(AllowedDestination::PrivateMessage)
            .build(),
    ];
    for declaration in declarations {
        registry
            .register(declaration.expect("valid declaration"))
            .expect("unique names");
    }
    registry
}

const CONFIG: &str = r##"
[bot]
nickname = "MechaSqueak[BOT]"

[dispatch]
operations_channel = "#rat-ops"
cooldown_exempt_channels = ["#ratchat"]

[denylist]
nicknames = ["spamrat"]
accounts = ["badactor"]
"##;

/// A dispatcher over [`sample_registry`] capturing every reply.
pub struct TestBot {
    pub dispatcher: Dispatcher,
    pub handler: Arc<RecordingHandler>,
    pub replies: tokio::sync::Mutex<Vec<Reply>>,
}

impl TestBot {
    pub fn new() -> Self {
        Self::with_config(CONFIG)
    }

    /// Same commands under a different config.
    pub fn with_config(config: &str) -> Self {
        let handler = Arc::new(RecordingHandler::default());
        Self::with_handler(config, handler)
    }

    pub fn with_handler(config: &str, handler: Arc<RecordingHandler>) -> Self {
        let config: Config = config.parse().expect("valid config");
        let registry = Arc::new(sample_registry(handler.clone()));
        Self {
            dispatcher: Dispatcher::new(registry, &config),
            handler,
            replies: tokio::sync::Mutex::new(Vec::new()),
        }
    }

    /// Say `body` in `channel` as `nick` at `offset_ms` into the timeline.
    pub async fn say(
        &self,
        nick: &str,
        channel: &str,
        body: &str,
        offset_ms: i64,
    ) -> DispatchOutcome {
        self.send(ChatMessage::channel(Sender::new(nick), channel, body).at(at(offset_ms)))
            .await
    }

    pub async fn say_as(
        &self,
        sender: Sender,
        channel: &str,
        body: &str,
        offset_ms: i64,
    ) -> DispatchOutcome {
        self.send(ChatMessage::channel(sender, channel, body).at(at(offset_ms)))
            .await
    }

    pub async fn whisper(&self, sender: Sender, body: &str, offset_ms: i64) -> DispatchOutcome {
        self.send(ChatMessage::private(sender, body).at(at(offset_ms)))
            .await
    }

    pub async fn send(&self, message: ChatMessage) -> DispatchOutcome {
        self.dispatcher
            .dispatch(&message, ResponseMiddleware::Capturing(&self.replies))
            .await
    }

    pub async fn replies(&self) -> Vec<Reply> {
        self.replies.lock().await.clone()
    }
}

/// A sender holding `capabilities`.
#[allow(dead_code)]
pub fn sender_with(nick: &str, capabilities: &[Capability]) -> Sender {
    Sender::new(nick).with_capabilities(capabilities.iter().copied().collect::<CapabilitySet>())
}
