//! Inbound chat lines and outbound replies.
//!
//! These types are the boundary with the IRC client that feeds the
//! dispatcher. Replies stay structured (reason codes, help fields) until the
//! presentation layer renders them; `Display` gives an English fallback.

use crate::caps::CapabilitySet;
use crate::error::Rejection;
use crate::handlers::HelpText;
use chrono::{DateTime, Utc};
use std::fmt;

/// Who sent a chat line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub nickname: String,
    /// Services account, when the sender is identified.
    pub account: Option<String>,
    pub capabilities: CapabilitySet,
}

impl Sender {
    pub fn new(nickname: impl Into<String>) -> Self {
        Self {
            nickname: nickname.into(),
            account: None,
            capabilities: CapabilitySet::new(),
        }
    }

    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    pub fn with_capabilities(mut self, capabilities: CapabilitySet) -> Self {
        self.capabilities = capabilities;
        self
    }
}

/// Where a chat line arrived.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Destination {
    /// Said in a channel.
    Channel(String),
    /// Sent to the bot directly.
    PrivateMessage,
}

impl Destination {
    pub fn channel(&self) -> Option<&str> {
        match self {
            Self::Channel(name) => Some(name),
            Self::PrivateMessage => None,
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Channel(name) => f.write_str(name),
            Self::PrivateMessage => f.write_str("(private)"),
        }
    }
}

/// One chat line as received.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub sender: Sender,
    pub destination: Destination,
    pub body: String,
    pub received_at: DateTime<Utc>,
}

impl ChatMessage {
    /// A line said in `channel`, received now.
    pub fn channel(sender: Sender, channel: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            sender,
            destination: Destination::Channel(channel.into()),
            body: body.into(),
            received_at: Utc::now(),
        }
    }

    /// A line sent privately to the bot, received now.
    pub fn private(sender: Sender, body: impl Into<String>) -> Self {
        Self {
            sender,
            destination: Destination::PrivateMessage,
            body: body.into(),
            received_at: Utc::now(),
        }
    }

    /// Override the receive time.
    pub fn at(mut self, received_at: DateTime<Utc>) -> Self {
        self.received_at = received_at;
        self
    }

    /// Where a public reply to this line goes.
    pub fn reply_target(&self) -> ReplyTarget {
        match &self.destination {
            Destination::Channel(name) => ReplyTarget::Channel(name.clone()),
            Destination::PrivateMessage => ReplyTarget::Nickname(self.sender.nickname.clone()),
        }
    }

    /// Where a private reply to this line goes.
    pub fn private_target(&self) -> ReplyTarget {
        ReplyTarget::Nickname(self.sender.nickname.clone())
    }
}

/// Recipient of a reply.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReplyTarget {
    Channel(String),
    Nickname(String),
}

impl ReplyTarget {
    pub fn is_private(&self) -> bool {
        matches!(self, Self::Nickname(_))
    }
}

impl fmt::Display for ReplyTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Channel(name) | Self::Nickname(name) => f.write_str(name),
        }
    }
}

/// Notification for the operations channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationsAlert {
    /// A denylisted sender used a dispatching command.
    Denylisted {
        nickname: String,
        account: Option<String>,
        command: String,
        destination: Destination,
        line: String,
    },
}

impl fmt::Display for OperationsAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Denylisted {
                nickname,
                account,
                command,
                destination,
                line,
            } => write!(
                f,
                "Denylisted user {nickname} (account: {}) used !{command} in {destination}: {line}",
                account.as_deref().unwrap_or("none")
            ),
        }
    }
}

/// What a reply says.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyBody {
    /// Free text from a handler.
    Text(String),
    /// A validation failure.
    Rejection(Rejection),
    /// Help for one command.
    Help(HelpText),
    Alert(OperationsAlert),
}

impl fmt::Display for ReplyBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Rejection(rejection) => write!(f, "{rejection}"),
            Self::Help(help) => write!(f, "{help}"),
            Self::Alert(alert) => write!(f, "{alert}"),
        }
    }
}

/// A reply addressed to a channel or user.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub target: ReplyTarget,
    pub body: ReplyBody,
}

impl Reply {
    pub fn new(target: ReplyTarget, body: ReplyBody) -> Self {
        Self { target, body }
    }

    pub fn text(target: ReplyTarget, text: impl Into<String>) -> Self {
        Self::new(target, ReplyBody::Text(text.into()))
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.target, self.body)
    }
}
