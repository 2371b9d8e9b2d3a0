//! Command invocations.

use crate::message::{ChatMessage, Destination, ReplyTarget, Sender};
use chrono::{DateTime, Utc};
use squeak_proto::{OptionSet, ParsedCommand};
use std::collections::BTreeMap;
use uuid::Uuid;

/// One recognised attempt to run a registered command.
///
/// Built by the dispatcher from a [`ParsedCommand`] and the chat line it
/// came from. Stored in the command history once it passes the cooldown
/// gate, so it carries the sender and destination as well.
#[derive(Debug, Clone)]
pub struct CommandInvocation {
    /// Fresh per parse attempt.
    pub id: Uuid,
    /// Canonical name of the matched declaration.
    pub command: String,
    /// The name as typed, which may be an alias.
    pub alias: String,
    /// Reply locale, from the `-xx` suffix or the configured default.
    pub locale: String,
    pub parameters: Vec<String>,
    /// Parallel to `parameters`.
    pub quoted: Vec<bool>,
    pub options: OptionSet,
    pub arguments: BTreeMap<String, Option<String>>,
    pub sender: Sender,
    pub destination: Destination,
    /// The raw chat line.
    pub body: String,
    pub timestamp: DateTime<Utc>,
    /// Set when the sender repeated their own command; bypasses cooldown.
    pub force_override: bool,
}

impl CommandInvocation {
    pub fn new(
        parsed: ParsedCommand,
        canonical: &str,
        message: &ChatMessage,
        default_locale: &str,
    ) -> Self {
        let ParsedCommand {
            command,
            parameters,
            quoted,
            options,
            arguments,
        } = parsed;

        Self {
            id: Uuid::new_v4(),
            command: canonical.to_string(),
            locale: command
                .language
                .unwrap_or_else(|| default_locale.to_string()),
            alias: command.identifier,
            parameters,
            quoted,
            options,
            arguments,
            sender: message.sender.clone(),
            destination: message.destination.clone(),
            body: message.body.clone(),
            timestamp: message.received_at,
            force_override: false,
        }
    }

    pub fn has_option(&self, option: char) -> bool {
        self.options.contains(&option)
    }

    pub fn has_argument(&self, name: &str) -> bool {
        self.arguments.contains_key(name)
    }

    /// Value of `--name`, if it was given one.
    pub fn argument(&self, name: &str) -> Option<&str> {
        self.arguments.get(name).and_then(|value| value.as_deref())
    }

    pub fn parameter(&self, index: usize) -> Option<&str> {
        self.parameters.get(index).map(String::as_str)
    }

    pub fn channel(&self) -> Option<&str> {
        self.destination.channel()
    }

    /// Where a public reply goes: the channel, or the sender for private
    /// messages.
    pub fn reply_target(&self) -> ReplyTarget {
        match &self.destination {
            Destination::Channel(name) => ReplyTarget::Channel(name.clone()),
            Destination::PrivateMessage => ReplyTarget::Nickname(self.sender.nickname.clone()),
        }
    }

    pub fn private_target(&self) -> ReplyTarget {
        ReplyTarget::Nickname(self.sender.nickname.clone())
    }

    /// Milliseconds from `earlier` to this invocation.
    pub fn elapsed_since_ms(&self, earlier: &CommandInvocation) -> i64 {
        (self.timestamp - earlier.timestamp).num_milliseconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use squeak_proto::NoSchema;

    #[test]
    fn test_locale_from_suffix_or_default() {
        let message = ChatMessage::channel(Sender::new("Dawg"), "#fuelrats", "!prep-de Client");
        let parsed = ParsedCommand::parse(&message.body, &NoSchema).unwrap();
        let invocation = CommandInvocation::new(parsed, "prep", &message, "en");
        assert_eq!(invocation.locale, "de");
        assert_eq!(invocation.parameter(0), Some("Client"));
        assert_eq!(invocation.channel(), Some("#fuelrats"));

        let message = ChatMessage::private(Sender::new("Dawg"), "!pc Client");
        let parsed = ParsedCommand::parse(&message.body, &NoSchema).unwrap();
        let invocation = CommandInvocation::new(parsed, "prep", &message, "en");
        assert_eq!(invocation.locale, "en");
        assert_eq!(invocation.alias, "pc");
        assert_eq!(invocation.command, "prep");
        assert!(invocation.reply_target().is_private());
    }

    #[test]
    fn test_ids_are_unique() {
        let message = ChatMessage::private(Sender::new("Dawg"), "!pc");
        let a = CommandInvocation::new(
            ParsedCommand::parse("!pc", &NoSchema).unwrap(),
            "prep",
            &message,
            "en",
        );
        let b = CommandInvocation::new(
            ParsedCommand::parse("!pc", &NoSchema).unwrap(),
            "prep",
            &message,
            "en",
        );
        assert_ne!(a.id, b.id);
        assert_eq!(b.elapsed_since_ms(&a), 0);
    }
}
