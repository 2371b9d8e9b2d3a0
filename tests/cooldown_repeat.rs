//! Channel cooldowns and repeat detection.

mod common;

use common::{TestBot, sender_with};
use mechasqueak::caps::Capability;
use mechasqueak::error::Rejection;
use mechasqueak::message::{ReplyTarget, Sender};
use std::time::Duration;

#[tokio::test]
async fn test_cooldown_boundary() {
    let bot = TestBot::new();

    assert!(bot.say("Alpha", "#fuelrats", "!sysc Sol", 0).await.is_dispatched());

    let outcome = bot.say("Bravo", "#fuelrats", "!sysc Alioth", 29_900).await;
    assert_eq!(
        outcome.rejection(),
        Some(&Rejection::Cooldown {
            command: "sysc".to_string(),
            remaining: Duration::from_millis(100),
        })
    );
    let replies = bot.replies().await;
    assert_eq!(replies[0].target, ReplyTarget::Nickname("Bravo".to_string()));

    assert!(bot.say("Charlie", "#fuelrats", "!sysc Alioth", 30_100).await.is_dispatched());
}

#[tokio::test]
async fn test_cooldown_is_per_channel() {
    let bot = TestBot::new();

    assert!(bot.say("Alpha", "#fuelrats", "!sysc Sol", 0).await.is_dispatched());
    assert!(bot.say("Bravo", "#drillrats", "!sysc Sol", 1_000).await.is_dispatched());
    assert!(bot.say("Charlie", "#FuelRats", "!sysc Sol", 2_000).await.rejection().is_some());
}

#[tokio::test]
async fn test_repeat_overrides_cooldown() {
    let bot = TestBot::new();

    assert!(bot.say("Alpha", "#fuelrats", "!dist Sol Colonia", 0).await.is_dispatched());

    let outcome = bot.say("alpha", "#fuelrats", "!dist Sol Colonia", 29_900).await;
    let invocation = outcome.invocation().expect("repeat runs");
    assert!(invocation.force_override);
}

#[tokio::test]
async fn test_late_repeat_is_not_an_override() {
    let bot = TestBot::new();

    assert!(bot.say("Alpha", "#fuelrats", "!dist Sol Colonia", 0).await.is_dispatched());

    // Past the repeat window but inside the 60s cooldown.
    let outcome = bot.say("Alpha", "#fuelrats", "!dist Sol Colonia", 30_100).await;
    assert!(matches!(
        outcome.rejection(),
        Some(Rejection::Cooldown { .. })
    ));
}

#[tokio::test]
async fn test_repeat_needs_identical_parameters() {
    let bot = TestBot::new();

    assert!(bot.say("Alpha", "#fuelrats", "!dist Sol Colonia", 0).await.is_dispatched());
    let outcome = bot.say("Alpha", "#fuelrats", "!dist Sol Beagle", 5_000).await;
    assert!(matches!(
        outcome.rejection(),
        Some(Rejection::Cooldown { .. })
    ));
}

#[tokio::test]
async fn test_exempt_channel() {
    let bot = TestBot::new();

    assert!(bot.say("Alpha", "#ratchat", "!sysc Sol", 0).await.is_dispatched());
    assert!(bot.say("Bravo", "#RatChat", "!sysc Alioth", 1_000).await.is_dispatched());
}

#[tokio::test]
async fn test_private_messages_have_no_cooldown() {
    let bot = TestBot::new();

    assert!(bot.whisper(Sender::new("Alpha"), "!sysc Sol", 0).await.is_dispatched());
    assert!(bot.whisper(Sender::new("Bravo"), "!sysc Alioth", 1_000).await.is_dispatched());
}

#[tokio::test]
async fn test_bypass_capability() {
    let bot = TestBot::new();

    assert!(bot.say("Alpha", "#fuelrats", "!sysc Sol", 0).await.is_dispatched());
    let overseer = sender_with("Overseer", &[Capability::CooldownBypass]);
    assert!(bot.say_as(overseer, "#fuelrats", "!sysc Alioth", 1_000).await.is_dispatched());
    let admin = sender_with("Admin", &[Capability::Admin]);
    assert!(bot.say_as(admin, "#fuelrats", "!sysc Beagle", 2_000).await.is_dispatched());
}

#[tokio::test]
async fn test_drill_mode_disables_cooldowns() {
    let bot = TestBot::with_config("[bot]\n\n[dispatch]\ndrill_mode = true\n");

    assert!(bot.say("Alpha", "#fuelrats", "!sysc Sol", 0).await.is_dispatched());
    assert!(bot.say("Bravo", "#fuelrats", "!sysc Alioth", 1_000).await.is_dispatched());
}
