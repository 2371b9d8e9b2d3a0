//! Structured command help.

use super::declaration::{AllowedDestination, Category, CommandDeclaration};
use crate::caps::Capability;
use std::fmt;
use std::time::Duration;

/// Help for one command, rendered by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpText {
    pub command: String,
    pub aliases: Vec<String>,
    pub usage: String,
    pub example: String,
    pub description: String,
    pub category: Category,
    pub permission: Option<Capability>,
    pub cooldown: Option<Duration>,
    pub allowed_destination: AllowedDestination,
    pub localized: bool,
}

impl HelpText {
    pub fn from_declaration(declaration: &CommandDeclaration) -> Self {
        Self {
            command: declaration.name().to_string(),
            aliases: declaration.aliases().to_vec(),
            usage: declaration.usage(),
            example: declaration.example(),
            description: declaration.description.clone(),
            category: declaration.category,
            permission: declaration.permission,
            cooldown: declaration.cooldown,
            allowed_destination: declaration.allowed_destination,
            localized: declaration.localized,
        }
    }
}

impl fmt::Display for HelpText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Usage: !{}", self.command)?;
        if !self.usage.is_empty() {
            write!(f, " {}", self.usage)?;
        }
        if !self.example.is_empty() {
            write!(f, ". Example: !{} {}", self.command, self.example)?;
        }
        if !self.description.is_empty() {
            write!(f, ". {}", self.description)?;
        }
        if !self.aliases.is_empty() {
            let aliases: Vec<String> = self.aliases.iter().map(|a| format!("!{a}")).collect();
            write!(f, ". Aliases: {}", aliases.join(", "))?;
        }
        if let Some(permission) = self.permission {
            write!(f, ". Requires: {permission}")?;
        }
        match self.allowed_destination {
            AllowedDestination::Channel => f.write_str(". Channel only")?,
            AllowedDestination::PrivateMessage => f.write_str(". Private message only")?,
            AllowedDestination::All => {}
        }
        if let Some(cooldown) = self.cooldown {
            write!(f, ". Cooldown: {}s", cooldown.as_secs())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::core::declaration::Param;
    use crate::handlers::core::traits::NoopHandler;
    use std::sync::Arc;

    #[test]
    fn test_help_rendering() {
        let decl = CommandDeclaration::builder(["sysc", "sc"], Arc::new(NoopHandler))
            .param(Param::new("system", "Alioth"))
            .description("Search for a star system")
            .category(Category::Utility)
            .permission(Capability::Rescue)
            .cooldown(Duration::from_secs(30))
            .build()
            .unwrap();

        let help = HelpText::from_declaration(&decl);
        assert_eq!(help.aliases, vec!["sc"]);
        assert_eq!(
            help.to_string(),
            "Usage: !sysc <system>. Example: !sysc Alioth. Search for a star system. \
             Aliases: !sc. Requires: rescue. Cooldown: 30s"
        );
    }
}
