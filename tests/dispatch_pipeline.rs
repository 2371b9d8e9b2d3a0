//! End-to-end dispatch tests: chat lines in, outcomes and replies out.

mod common;

use common::{RecordingHandler, TestBot, sender_with};
use mechasqueak::caps::Capability;
use mechasqueak::error::Rejection;
use mechasqueak::handlers::{DispatchOutcome, IgnoreReason};
use mechasqueak::message::{OperationsAlert, ReplyBody, ReplyTarget, Sender};
use std::sync::Arc;

#[tokio::test]
async fn test_full_invocation_shape() {
    let bot = TestBot::new();

    let outcome = bot
        .say("SpaceDawg", "#fuelrats", "!cmd p1 \"p2 with spaces\" --arg val -abc", 0)
        .await;
    let invocation = outcome.invocation().expect("dispatched");

    assert_eq!(invocation.command, "cmd");
    assert_eq!(invocation.parameters, vec!["p1", "p2 with spaces"]);
    assert_eq!(invocation.quoted, vec![false, true]);
    assert_eq!(invocation.argument("arg"), Some("val"));
    assert_eq!(invocation.options.as_slice(), &['a', 'b', 'c']);
    assert_eq!(bot.handler.calls().len(), 1);
}

#[tokio::test]
async fn test_unknown_command_is_silent() {
    let bot = TestBot::new();

    let outcome = bot.say("SpaceDawg", "#fuelrats", "!frobnicate now", 0).await;
    assert!(matches!(
        outcome,
        DispatchOutcome::Ignored(IgnoreReason::UnknownCommand(ref name)) if name == "frobnicate"
    ));
    let outcome = bot.say("SpaceDawg", "#fuelrats", "o7 rats", 0).await;
    assert!(matches!(outcome, DispatchOutcome::Ignored(IgnoreReason::NotACommand)));

    assert!(bot.replies().await.is_empty());
    assert!(bot.dispatcher.history().is_empty());
}

#[tokio::test]
async fn test_alias_and_locale_suffix() {
    let bot = TestBot::new();

    let outcome = bot.say("SpaceDawg", "#fuelrats", "!pc-de Client", 0).await;
    let invocation = outcome.invocation().expect("dispatched");
    assert_eq!(invocation.command, "prep");
    assert_eq!(invocation.alias, "pc");
    assert_eq!(invocation.locale, "de");

    let outcome = bot.say("SpaceDawg", "#fuelrats", "!prep Client", 10).await;
    assert_eq!(outcome.invocation().expect("dispatched").locale, "en");
}

#[tokio::test]
async fn test_continuous_parameter_merge() {
    let bot = TestBot::new();
    let rat = sender_with("SpaceDawg", &[Capability::Rescue]);

    let outcome = bot.say_as(rat, "#fuelrats", "!inject a \"b\" c", 0).await;
    let invocation = outcome.invocation().expect("dispatched");
    assert_eq!(invocation.parameters, vec!["a", "\"b\" c"]);
    assert_eq!(invocation.quoted, vec![false, false]);
}

#[tokio::test]
async fn test_multiple_parameter_is_unbounded() {
    let bot = TestBot::new();
    let dispatcher = sender_with("Overseer", &[Capability::DispatchWrite]);

    let outcome = bot
        .say_as(dispatcher, "#fuelrats", "!go 4 SpaceDawg Pinkie Jolt", 0)
        .await;
    assert_eq!(
        outcome.invocation().expect("dispatched").parameters,
        vec!["4", "SpaceDawg", "Pinkie", "Jolt"]
    );
}

#[tokio::test]
async fn test_parameter_count_rejections() {
    let bot = TestBot::new();

    let outcome = bot.say("SpaceDawg", "#fuelrats", "!sysc", 0).await;
    assert!(matches!(
        outcome.rejection(),
        Some(Rejection::TooFewParameters { command, usage, example })
            if command == "sysc" && usage == "<system>" && example == "Alioth"
    ));

    let outcome = bot.say("SpaceDawg", "#fuelrats", "!sysc Col 285", 10).await;
    assert!(matches!(
        outcome.rejection(),
        Some(Rejection::TooManyParameters { .. })
    ));

    // Parameter rejections are public.
    let replies = bot.replies().await;
    assert_eq!(replies.len(), 2);
    assert!(
        replies
            .iter()
            .all(|reply| reply.target == ReplyTarget::Channel("#fuelrats".to_string()))
    );
    assert!(bot.handler.calls().is_empty());
}

#[tokio::test]
async fn test_illegal_argument() {
    let bot = TestBot::new();

    let outcome = bot.say("SpaceDawg", "#fuelrats", "!sysc --frob Sol", 0).await;
    assert_eq!(
        outcome.rejection(),
        Some(&Rejection::IllegalArguments {
            command: "sysc".to_string(),
            arguments: vec!["frob".to_string()],
            usage: "<system>".to_string(),
            example: "Alioth".to_string(),
        })
    );
}

#[tokio::test]
async fn test_illegal_options_and_locale_hint() {
    let bot = TestBot::new();

    let outcome = bot.say("SpaceDawg", "#fuelrats", "!prep -fr Client", 0).await;
    assert!(matches!(
        outcome.rejection(),
        Some(Rejection::IllegalOptionsMaybeLocale { locale, options, .. })
            if locale == "fr" && options == &vec!['f', 'r']
    ));

    // Not localized, and 'f' is accepted: only 'r' is illegal.
    let outcome = bot.say("SpaceDawg", "#fuelrats", "!quote -fr 4", 10).await;
    assert!(matches!(
        outcome.rejection(),
        Some(Rejection::IllegalOptions { options, .. }) if options == &vec!['r']
    ));

    // Two letters that are not a language.
    let outcome = bot.say("SpaceDawg", "#fuelrats", "!prep -xq Client", 20).await;
    assert!(matches!(
        outcome.rejection(),
        Some(Rejection::IllegalOptions { .. })
    ));
}

#[tokio::test]
async fn test_help_is_private() {
    let bot = TestBot::new();

    let outcome = bot.say("SpaceDawg", "#fuelrats", "!sysc --help", 0).await;
    assert!(matches!(outcome, DispatchOutcome::Help { ref command } if command == "sysc"));

    let replies = bot.replies().await;
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].target, ReplyTarget::Nickname("SpaceDawg".to_string()));
    assert!(matches!(replies[0].body, ReplyBody::Help(_)));
    assert!(bot.handler.calls().is_empty());
}

#[tokio::test]
async fn test_destination_restrictions() {
    let bot = TestBot::new();

    let outcome = bot.say("SpaceDawg", "#fuelrats", "!whoami", 0).await;
    assert_eq!(
        outcome.rejection(),
        Some(&Rejection::PrivateMessageOnly {
            command: "whoami".to_string()
        })
    );
    let replies = bot.replies().await;
    assert_eq!(replies[0].target, ReplyTarget::Nickname("SpaceDawg".to_string()));

    let outcome = bot.whisper(Sender::new("SpaceDawg"), "!whoami", 10).await;
    assert!(outcome.is_dispatched());

    let writer = sender_with("Overseer", &[Capability::DispatchWrite]);
    let outcome = bot.whisper(writer, "!assign 4 SpaceDawg", 20).await;
    assert!(matches!(
        outcome.rejection(),
        Some(Rejection::ChannelOnly { .. })
    ));
}

#[tokio::test]
async fn test_permission_denied_is_private_and_recorded() {
    let bot = TestBot::new();

    let outcome = bot.say("Newbie", "#fuelrats", "!inject 4 client is in open", 0).await;
    assert_eq!(
        outcome.rejection(),
        Some(&Rejection::PermissionDenied {
            command: "inject".to_string(),
            required: Capability::Rescue,
        })
    );

    let replies = bot.replies().await;
    assert_eq!(replies.len(), 1);
    assert!(replies[0].target.is_private());
    assert!(bot.handler.calls().is_empty());
    // The attempt still counts for repeat detection and cooldowns.
    assert_eq!(bot.dispatcher.history().len(), 1);
}

#[tokio::test]
async fn test_denylisted_dispatch_alerts_operations() {
    let bot = TestBot::new();
    let rat = sender_with("SpamRat_2", &[Capability::Rescue]);

    let outcome = bot.say_as(rat, "#fuelrats", "!inject 4 fake case", 0).await;
    assert!(matches!(
        outcome,
        DispatchOutcome::Dispatched {
            denylisted: true,
            ..
        }
    ));
    assert_eq!(bot.handler.calls().len(), 1);

    let replies = bot.replies().await;
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].target, ReplyTarget::Channel("#rat-ops".to_string()));
    match &replies[0].body {
        ReplyBody::Alert(OperationsAlert::Denylisted { nickname, command, .. }) => {
            assert_eq!(nickname, "SpamRat_2");
            assert_eq!(command, "inject");
        }
        other => panic!("expected an alert, got {other:?}"),
    }
}

#[tokio::test]
async fn test_denylisted_account_on_harmless_command() {
    let bot = TestBot::new();
    let sender = Sender::new("Innocent").with_account("badactor");

    let outcome = bot.say_as(sender, "#fuelrats", "!prep Client", 0).await;
    assert!(matches!(
        outcome,
        DispatchOutcome::Dispatched {
            denylisted: false,
            ..
        }
    ));
    assert!(bot.replies().await.is_empty());
}

#[tokio::test]
async fn test_handler_failure_is_reported() {
    let handler = Arc::new(RecordingHandler::failing());
    let bot = TestBot::with_handler("[bot]\n", handler);

    let outcome = bot.say("SpaceDawg", "#fuelrats", "!sysc Sol", 0).await;
    assert!(matches!(outcome, DispatchOutcome::Failed { .. }));
    assert_eq!(outcome.invocation().expect("ran").command, "sysc");
    assert_eq!(bot.handler.calls().len(), 1);
}

#[tokio::test]
async fn test_history_is_bounded() {
    let bot = TestBot::new();

    for i in 0..251 {
        let outcome = bot.whisper(Sender::new("SpaceDawg"), "!whoami", i).await;
        assert!(outcome.is_dispatched());
    }
    assert_eq!(bot.dispatcher.history().len(), 250);
}
