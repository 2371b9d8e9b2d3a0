//! Built-in utility commands: `!help` and `!version`.

use super::core::{Category, CommandDeclaration, Context, Handler, HelpText, Param, Registry};
use crate::error::{HandlerResult, RegistryError};
use crate::message::ReplyBody;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Register the utility commands.
pub fn register(registry: &mut Registry) -> Vec<RegistryError> {
    let declarations = [
        CommandDeclaration::builder(["help"], Arc::new(HelpHandler))
            .param(Param::new("command", "sysc").optional())
            .category(Category::Utility)
            .description("List commands, or show how to use one")
            .build(),
        CommandDeclaration::builder(["version", "uptime"], Arc::new(VersionHandler))
            .category(Category::Utility)
            .description("Show the bot version and uptime")
            .cooldown(Duration::from_secs(30))
            .build(),
    ];

    let mut errors = Vec::new();
    for declaration in declarations {
        match declaration.and_then(|declaration| registry.register(declaration)) {
            Ok(()) => {}
            Err(err) => errors.push(err),
        }
    }
    errors
}

/// `!help [command]`, always answered privately.
pub struct HelpHandler;

#[async_trait]
impl Handler for HelpHandler {
    async fn handle(&self, ctx: &Context<'_>) -> HandlerResult {
        let Some(requested) = ctx.invocation.parameter(0) else {
            let listing: Vec<String> = ctx
                .registry
                .categories()
                .into_iter()
                .map(|(category, names)| {
                    let names: Vec<String> = names.iter().map(|name| format!("!{name}")).collect();
                    format!("{category}: {}", names.join(", "))
                })
                .collect();
            return ctx
                .reply_private(format!("Commands by category. {}", listing.join(". ")))
                .await;
        };

        let name = requested.trim_start_matches('!').to_ascii_lowercase();
        match ctx.registry.lookup(&name) {
            Some(declaration) => {
                let help = HelpText::from_declaration(declaration);
                ctx.send(ctx.invocation.private_target(), ReplyBody::Help(help))
                    .await
            }
            None => {
                ctx.reply_private(format!("No such command !{name}"))
                    .await
            }
        }
    }
}

/// `!version`: version, uptime and commands served.
pub struct VersionHandler;

#[async_trait]
impl Handler for VersionHandler {
    async fn handle(&self, ctx: &Context<'_>) -> HandlerResult {
        let uptime = ctx.invocation.timestamp - ctx.registry.started_at();
        let served: u64 = ctx
            .registry
            .command_stats()
            .iter()
            .map(|(_, count)| count)
            .sum();

        ctx.reply(format!(
            "MechaSqueak v{VERSION}, up {}, {served} commands served",
            format_uptime(uptime)
        ))
        .await
    }
}

fn format_uptime(uptime: chrono::Duration) -> String {
    let total = uptime.num_seconds().max(0);
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m {}s", total % 60)
    }
}
