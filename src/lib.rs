//! MechaSqueak - chat command dispatcher for the Fuel Rats IRC bot.
//!
//! Chat lines arrive as [`message::ChatMessage`]s and go through the
//! [`handlers::Dispatcher`], which lexes them with `squeak_proto`, matches
//! them against the registered [`handlers::CommandDeclaration`]s, enforces
//! each command's contract and runs its handler. Replies leave through a
//! [`handlers::ResponseMiddleware`].
//!
//! IRC connectivity is not part of this crate; the `mechasqueak` binary
//! drives the dispatcher from a console instead.

pub mod caps;
pub mod config;
pub mod console;
pub mod error;
pub mod handlers;
pub mod history;
pub mod http;
pub mod message;
pub mod metrics;
pub mod security;
pub mod telemetry;
