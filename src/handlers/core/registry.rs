//! Command registry.
//!
//! The `Registry` holds command declarations in registration order, resolves
//! names and aliases to declarations, and keeps per-command usage counters.
//! It is populated once at startup and shared read-only afterwards.

use super::declaration::{Category, CommandDeclaration};
use crate::error::RegistryError;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// Registry of command declarations.
pub struct Registry {
    declarations: Vec<Arc<CommandDeclaration>>,
    /// Name or alias to index into `declarations`.
    names: HashMap<String, usize>,
    /// Usage counters, parallel to `declarations`.
    command_counts: Vec<AtomicU64>,
    started_at: DateTime<Utc>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            declarations: Vec::new(),
            names: HashMap::new(),
            command_counts: Vec::new(),
            started_at: Utc::now(),
        }
    }

    /// Register a declaration under all of its names.
    ///
    /// A name that is already taken stays with its first registrant. When
    /// the canonical name is taken the whole declaration is dropped, so
    /// history and usage counters never mix two commands. A contested alias
    /// is skipped while the remaining names are registered. Either way the
    /// first conflict is returned as [`RegistryError::DuplicateName`].
    pub fn register(&mut self, declaration: CommandDeclaration) -> Result<(), RegistryError> {
        if let Some(existing) = self.owner_of(declaration.name()) {
            warn!(
                command = %declaration.name(),
                existing = %existing,
                "Command name taken, declaration dropped"
            );
            return Err(RegistryError::DuplicateName {
                name: declaration.name().to_string(),
                existing,
            });
        }

        let index = self.declarations.len();
        let mut conflict = None;

        for name in declaration.names() {
            match self.names.get(name) {
                Some(&owner) if owner == index => {}
                Some(_) => {
                    let existing = self.owner_of(name).unwrap_or_default();
                    warn!(name = %name, existing = %existing, "Duplicate command alias ignored");
                    conflict.get_or_insert(RegistryError::DuplicateName {
                        name: name.clone(),
                        existing,
                    });
                }
                None => {
                    self.names.insert(name.clone(), index);
                }
            }
        }

        debug!(command = %declaration.name(), "Registered command");
        self.declarations.push(Arc::new(declaration));
        self.command_counts.push(AtomicU64::new(0));

        match conflict {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Canonical name of the declaration registered under `name`.
    fn owner_of(&self, name: &str) -> Option<String> {
        self.names
            .get(name)
            .and_then(|&index| self.declarations.get(index))
            .map(|declaration| declaration.name().to_string())
    }

    /// Find the declaration for a lowercased name or alias.
    pub fn lookup(&self, name: &str) -> Option<&Arc<CommandDeclaration>> {
        self.names.get(name).map(|&index| &self.declarations[index])
    }

    /// Declarations in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<CommandDeclaration>> {
        self.declarations.iter()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Canonical command names grouped by category, in registration order.
    pub fn categories(&self) -> BTreeMap<Category, Vec<&str>> {
        let mut categories: BTreeMap<Category, Vec<&str>> = BTreeMap::new();
        for declaration in &self.declarations {
            categories
                .entry(declaration.category)
                .or_default()
                .push(declaration.name());
        }
        categories
    }

    /// Count one dispatch of `command` (canonical name).
    pub fn record_use(&self, command: &str) {
        if let Some(&index) = self.names.get(command) {
            self.command_counts[index].fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Command usage statistics, most used first. Unused commands are
    /// omitted.
    pub fn command_stats(&self) -> Vec<(&str, u64)> {
        let mut stats: Vec<_> = self
            .declarations
            .iter()
            .zip(&self.command_counts)
            .map(|(declaration, count)| (declaration.name(), count.load(Ordering::Relaxed)))
            .filter(|(_, count)| *count > 0)
            .collect();

        stats.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        stats
    }

    /// When the registry was created, used as the bot's start time.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
