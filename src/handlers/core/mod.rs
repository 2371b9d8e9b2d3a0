//! Core handler infrastructure.
//!
//! This module contains the fundamental types for the command system:
//! declarations and their registry, the invocation built from a chat line,
//! the handler trait and its context, response middleware, and the
//! dispatcher that ties them together.

pub mod context;
pub mod declaration;
pub mod dispatch;
pub mod help;
pub mod invocation;
pub mod middleware;
pub mod registry;
pub mod traits;

// Re-export commonly used types
pub use context::Context;
pub use declaration::{
    AllowedDestination, Category, CommandDeclaration, DeclarationBuilder, Nullability, Param,
    ParamKind, ParameterSpec,
};
pub use dispatch::{DispatchOutcome, Dispatcher, IgnoreReason};
pub use help::HelpText;
pub use invocation::CommandInvocation;
pub use middleware::ResponseMiddleware;
pub use registry::Registry;
pub use traits::Handler;
