//! Chat command handlers.
//!
//! The [`core`] module holds the declaration, registry and dispatch
//! machinery; sibling modules hold groups of concrete commands, each with a
//! `register` function. [`register_all`] is the single explicit registration
//! step run at startup, before any chat traffic is processed.

pub mod core;
mod utility;

pub use self::core::{
    AllowedDestination, Category, CommandDeclaration, CommandInvocation, Context,
    DeclarationBuilder, DispatchOutcome, Dispatcher, Handler, HelpText, IgnoreReason,
    Nullability, Param, ParamKind, ParameterSpec, Registry, ResponseMiddleware,
};
pub use utility::{HelpHandler, VersionHandler};

use crate::error::RegistryError;

/// Register every built-in command group, in order.
///
/// Registration continues past conflicts; every problem found is returned.
pub fn register_all(registry: &mut Registry) -> Result<(), Vec<RegistryError>> {
    let errors = utility::register(registry);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
