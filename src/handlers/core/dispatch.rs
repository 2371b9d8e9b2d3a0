//! The dispatch pipeline.
//!
//! One chat line goes through, in order: lexing, declaration lookup,
//! invocation building, help interception, option and argument checks,
//! destination check, parameter count checks (with the trailing parameter
//! merge in between), repeat detection and cooldown, history push,
//! permission check, denylist check, and finally the handler. The first
//! failing check wins and nothing after it runs.

use super::context::Context;
use super::declaration::{AllowedDestination, CommandDeclaration};
use super::help::HelpText;
use super::invocation::CommandInvocation;
use super::middleware::ResponseMiddleware;
use super::registry::Registry;
use crate::caps::Capability;
use crate::config::{Config, DispatchConfig};
use crate::error::{HandlerError, Rejection};
use crate::history::CommandHistory;
use crate::message::{ChatMessage, Destination, OperationsAlert, Reply, ReplyBody, ReplyTarget};
use crate::security::Denylist;
use crate::telemetry::{CommandTimer, spans};
use squeak_proto::{
    CaseMapping, LexError, ParsedCommand, language_from_options, leading_command, lex,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{Instrument, Span, debug, trace, warn};

/// Why a line produced no invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Ordinary chat.
    NotACommand,
    /// Started like a command but did not lex.
    LexError(LexError),
    /// A well-formed command nobody registered.
    UnknownCommand(String),
}

impl IgnoreReason {
    /// Static code for metrics labeling.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotACommand => "not_a_command",
            Self::LexError(_) => "lex_error",
            Self::UnknownCommand(_) => "unknown_command",
        }
    }
}

/// Result of dispatching one chat line.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// Not a command for us. Nothing was sent.
    Ignored(IgnoreReason),
    /// Help was requested and sent instead of running the command.
    Help { command: String },
    /// A check failed; the rejection was sent to the sender.
    Rejected(Rejection),
    /// The handler ran and succeeded.
    Dispatched {
        invocation: Arc<CommandInvocation>,
        denylisted: bool,
    },
    /// The handler ran and failed.
    Failed {
        invocation: Arc<CommandInvocation>,
        error: HandlerError,
    },
}

impl DispatchOutcome {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, Self::Dispatched { .. })
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }

    /// The invocation handed to the handler, if one was.
    pub fn invocation(&self) -> Option<&Arc<CommandInvocation>> {
        match self {
            Self::Dispatched { invocation, .. } | Self::Failed { invocation, .. } => {
                Some(invocation)
            }
            _ => None,
        }
    }
}

/// Validates invocations against their declarations and runs handlers.
pub struct Dispatcher {
    registry: Arc<Registry>,
    history: Arc<CommandHistory>,
    denylist: Denylist,
    policy: DispatchConfig,
    casemapping: CaseMapping,
    default_locale: String,
}

impl Dispatcher {
    /// Build a dispatcher with a fresh history sized from the config.
    pub fn new(registry: Arc<Registry>, config: &Config) -> Self {
        let history = Arc::new(CommandHistory::new(config.dispatch.history_capacity));
        Self::with_history(registry, history, config)
    }

    /// Build a dispatcher sharing an existing history.
    pub fn with_history(
        registry: Arc<Registry>,
        history: Arc<CommandHistory>,
        config: &Config,
    ) -> Self {
        Self {
            registry,
            history,
            denylist: Denylist::new(&config.denylist),
            policy: config.dispatch.clone(),
            casemapping: config.bot.casemapping,
            default_locale: config.bot.default_locale.clone(),
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn history(&self) -> &Arc<CommandHistory> {
        &self.history
    }

    /// Run one chat line through the pipeline.
    pub async fn dispatch(
        &self,
        message: &ChatMessage,
        sender: ResponseMiddleware<'_>,
    ) -> DispatchOutcome {
        let span = spans::command(&message.sender.nickname, &message.destination.to_string());
        self.dispatch_inner(message, sender).instrument(span).await
    }

    async fn dispatch_inner(
        &self,
        message: &ChatMessage,
        sender: ResponseMiddleware<'_>,
    ) -> DispatchOutcome {
        let tokens = match lex(&message.body) {
            Ok(tokens) => tokens,
            Err(LexError::NoCommand) => return self.ignore(IgnoreReason::NotACommand),
            Err(err) => return self.ignore(IgnoreReason::LexError(err)),
        };

        let Some(declaration) = leading_command(&tokens)
            .and_then(|command| self.registry.lookup(&command.identifier))
            .cloned()
        else {
            let name = leading_command(&tokens)
                .map(|command| command.identifier.clone())
                .unwrap_or_default();
            return self.ignore(IgnoreReason::UnknownCommand(name));
        };

        let parsed = match ParsedCommand::build(tokens, &*declaration) {
            Ok(parsed) => parsed,
            Err(err) => return self.ignore(IgnoreReason::LexError(err)),
        };
        let mut invocation =
            CommandInvocation::new(parsed, declaration.name(), message, &self.default_locale);

        let span = Span::current();
        span.record("command", declaration.name());
        span.record("invocation", tracing::field::display(invocation.id));

        // Help
        if invocation.has_argument("help")
            || (invocation.has_option('h') && !declaration.accepts_option('h'))
        {
            let help = HelpText::from_declaration(&declaration);
            self.send(sender, invocation.private_target(), ReplyBody::Help(help))
                .await;
            debug!("Help requested");
            return DispatchOutcome::Help {
                command: declaration.name().to_string(),
            };
        }

        if let Err(rejection) = self.validate(&declaration, &mut invocation) {
            return self.reject(message, rejection, sender).await;
        }

        // Repeat detection, cooldown and history push share one lock
        let admitted = self.history.admit(
            invocation,
            self.policy.repeat_window_ms(),
            self.casemapping,
            |invocation, last| self.check_cooldown(&declaration, invocation, last),
        );
        let invocation = match admitted {
            Ok(invocation) => invocation,
            Err(rejection) => return self.reject(message, rejection, sender).await,
        };
        if invocation.force_override {
            trace!("Repeat invocation, cooldown overridden");
        }

        if let Some(required) = declaration.permission {
            if !invocation.sender.capabilities.grants(required) {
                let rejection = Rejection::PermissionDenied {
                    command: declaration.name().to_string(),
                    required,
                };
                return self.reject(message, rejection, sender).await;
            }
        }

        let denylisted = self.check_denylist(&declaration, &invocation, sender).await;

        self.registry.record_use(declaration.name());
        let mut timer = CommandTimer::new(declaration.name());
        let ctx = Context::new(&invocation, &declaration, &self.registry, sender);

        match declaration.handler().handle(&ctx).await {
            Ok(()) => DispatchOutcome::Dispatched {
                invocation,
                denylisted,
            },
            Err(error) => {
                timer.failed();
                crate::metrics::record_handler_error(declaration.name(), error.error_code());
                warn!(error = %error, "Command handler failed");
                DispatchOutcome::Failed { invocation, error }
            }
        }
    }

    /// Option, argument, destination and parameter count checks. Applies
    /// the trailing parameter merge on success.
    fn validate(
        &self,
        declaration: &CommandDeclaration,
        invocation: &mut CommandInvocation,
    ) -> Result<(), Rejection> {
        let command = declaration.name().to_string();

        let illegal_arguments: Vec<String> = invocation
            .arguments
            .keys()
            .filter(|name| !declaration.arguments().contains_key(*name))
            .cloned()
            .collect();
        if !illegal_arguments.is_empty() {
            return Err(Rejection::IllegalArguments {
                command,
                arguments: illegal_arguments,
                usage: declaration.usage(),
                example: declaration.example(),
            });
        }

        let illegal_options: Vec<char> = invocation
            .options
            .iter()
            .copied()
            .filter(|option| !declaration.accepts_option(*option))
            .collect();
        if !illegal_options.is_empty() {
            let locale = declaration
                .localized
                .then(|| language_from_options(&illegal_options))
                .flatten();
            return Err(match locale {
                Some(locale) => Rejection::IllegalOptionsMaybeLocale {
                    command,
                    options: illegal_options,
                    locale,
                    usage: declaration.usage(),
                    example: declaration.example(),
                },
                None => Rejection::IllegalOptions {
                    command,
                    options: illegal_options,
                    usage: declaration.usage(),
                    example: declaration.example(),
                },
            });
        }

        let bypass = declaration
            .destination_bypass
            .unwrap_or(Capability::DestinationBypass);
        let may_bypass = invocation.sender.capabilities.grants(bypass);
        match (declaration.allowed_destination, &invocation.destination) {
            (AllowedDestination::Channel, Destination::PrivateMessage) if !may_bypass => {
                return Err(Rejection::ChannelOnly { command });
            }
            (AllowedDestination::PrivateMessage, Destination::Channel(_)) if !may_bypass => {
                return Err(Rejection::PrivateMessageOnly { command });
            }
            _ => {}
        }

        if invocation.parameters.len() < declaration.min_parameters() {
            return Err(Rejection::TooFewParameters {
                command,
                usage: declaration.usage(),
                example: declaration.example(),
            });
        }

        let (parameters, quoted) = declaration.merge_trailing(
            std::mem::take(&mut invocation.parameters),
            std::mem::take(&mut invocation.quoted),
        );
        invocation.parameters = parameters;
        invocation.quoted = quoted;

        if let Some(max) = declaration.max_parameters() {
            if invocation.parameters.len() > max {
                return Err(Rejection::TooManyParameters {
                    command,
                    usage: declaration.usage(),
                    example: declaration.example(),
                });
            }
        }

        Ok(())
    }

    /// Channel cooldown against `last`, the previous use of the command in
    /// the same channel. Skipped in drill mode, for repeats, for senders
    /// holding the bypass capability, in private messages and in exempt
    /// channels. Runs with the history locked.
    fn check_cooldown(
        &self,
        declaration: &CommandDeclaration,
        invocation: &CommandInvocation,
        last: Option<&CommandInvocation>,
    ) -> Result<(), Rejection> {
        let (Some(cooldown), Some(channel), Some(last)) =
            (declaration.cooldown, invocation.channel(), last)
        else {
            return Ok(());
        };

        if self.policy.drill_mode || invocation.force_override {
            return Ok(());
        }
        let bypass = declaration
            .cooldown_bypass
            .unwrap_or(Capability::CooldownBypass);
        if invocation.sender.capabilities.grants(bypass) {
            return Ok(());
        }
        if self
            .policy
            .cooldown_exempt_channels
            .iter()
            .any(|exempt| self.casemapping.equals(exempt, channel))
        {
            return Ok(());
        }

        let cooldown_ms = i64::try_from(cooldown.as_millis()).unwrap_or(i64::MAX);
        let elapsed_ms = invocation.elapsed_since_ms(last);
        if elapsed_ms >= cooldown_ms {
            return Ok(());
        }

        let remaining_ms = cooldown_ms.saturating_sub(elapsed_ms).min(cooldown_ms);
        Err(Rejection::Cooldown {
            command: declaration.name().to_string(),
            remaining: Duration::from_millis(u64::try_from(remaining_ms).unwrap_or(0)),
        })
    }

    /// Alert the operations channel when a denylisted sender uses a
    /// dispatching command. Never blocks the command.
    async fn check_denylist(
        &self,
        declaration: &CommandDeclaration,
        invocation: &CommandInvocation,
        sender: ResponseMiddleware<'_>,
    ) -> bool {
        if !declaration.is_dispatching() {
            return false;
        }
        let Some(hit) = self.denylist.check(&invocation.sender) else {
            return false;
        };

        crate::metrics::record_denylist_hit();
        warn!(
            nickname = %invocation.sender.nickname,
            account = ?invocation.sender.account,
            hit = %hit,
            "Denylisted sender used a dispatching command"
        );

        if let Some(ref channel) = self.policy.operations_channel {
            let alert = OperationsAlert::Denylisted {
                nickname: invocation.sender.nickname.clone(),
                account: invocation.sender.account.clone(),
                command: declaration.name().to_string(),
                destination: invocation.destination.clone(),
                line: invocation.body.clone(),
            };
            self.send(
                sender,
                ReplyTarget::Channel(channel.clone()),
                ReplyBody::Alert(alert),
            )
            .await;
        }
        true
    }

    fn ignore(&self, reason: IgnoreReason) -> DispatchOutcome {
        crate::metrics::record_ignored(reason.code());
        trace!(reason = reason.code(), "Line ignored");
        DispatchOutcome::Ignored(reason)
    }

    async fn reject(
        &self,
        message: &ChatMessage,
        rejection: Rejection,
        sender: ResponseMiddleware<'_>,
    ) -> DispatchOutcome {
        crate::metrics::record_rejection(rejection.command(), rejection.reason_code());
        debug!(reason = rejection.reason_code(), "Command rejected");

        let target = if rejection.is_private() {
            message.private_target()
        } else {
            message.reply_target()
        };
        self.send(sender, target, ReplyBody::Rejection(rejection.clone()))
            .await;
        DispatchOutcome::Rejected(rejection)
    }

    /// Send a reply produced by the pipeline itself. Failures are logged;
    /// they never change the outcome.
    async fn send(&self, sender: ResponseMiddleware<'_>, target: ReplyTarget, body: ReplyBody) {
        if let Err(err) = sender.send(Reply::new(target, body)).await {
            warn!(error = %err, "Failed to send reply");
        }
    }
}
