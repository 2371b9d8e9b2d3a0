//! Command declarations.
//!
//! A [`CommandDeclaration`] is the static description of one command: its
//! names, the shape of its parameters, the options and arguments it accepts,
//! and the policy the dispatcher enforces before calling its handler.
//! Declarations are built once at startup through [`DeclarationBuilder`],
//! which rejects malformed shapes, and are never mutated afterwards.

use super::traits::Handler;
use crate::caps::Capability;
use crate::error::RegistryError;
use squeak_proto::ArgumentSchema;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// How many supplied words a positional parameter may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Exactly one word.
    Standard,
    /// Absorbs every remaining word into one parameter.
    Continuous,
    /// Any number of further words, each its own parameter.
    Multiple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nullability {
    Required,
    Optional,
}

/// One positional parameter slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub description: String,
    pub example: String,
    pub kind: ParamKind,
    pub nullability: Nullability,
}

impl Param {
    /// A required, single-word parameter.
    pub fn new(description: impl Into<String>, example: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            example: example.into(),
            kind: ParamKind::Standard,
            nullability: Nullability::Required,
        }
    }

    pub fn optional(mut self) -> Self {
        self.nullability = Nullability::Optional;
        self
    }

    pub fn continuous(mut self) -> Self {
        self.kind = ParamKind::Continuous;
        self
    }

    pub fn multiple(mut self) -> Self {
        self.kind = ParamKind::Multiple;
        self
    }

    pub fn is_required(&self) -> bool {
        self.nullability == Nullability::Required
    }

    fn usage(&self) -> String {
        let name = match self.nullability {
            Nullability::Required => format!("<{}>", self.description),
            Nullability::Optional => format!("[{}]", self.description),
        };
        match self.kind {
            ParamKind::Standard => name,
            ParamKind::Continuous => format!("{name}..."),
            ParamKind::Multiple => format!("...{name}"),
        }
    }
}

/// One element of a declaration's parameter list. Order matters: it is
/// the order used by the usage string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterSpec {
    /// The full set of single-character options the command accepts.
    Options(Vec<char>),
    /// An accepted `--name` argument. `value` names the value it takes;
    /// `None` makes it a flag.
    NamedArgument { name: String, value: Option<String> },
    Param(Param),
}

/// Broad grouping used by `!help` and the denylist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Rescue board management.
    Board,
    Rescue,
    Facts,
    Queue,
    Management,
    Utility,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Board => "board",
            Self::Rescue => "rescue",
            Self::Facts => "facts",
            Self::Queue => "queue",
            Self::Management => "management",
            Self::Utility => "utility",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a command may be used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AllowedDestination {
    Channel,
    PrivateMessage,
    #[default]
    All,
}

/// The registered description of a command.
#[derive(Clone)]
pub struct CommandDeclaration {
    names: Vec<String>,
    parameters: Vec<ParameterSpec>,
    options: Vec<char>,
    arguments: BTreeMap<String, Option<String>>,
    pub category: Category,
    pub description: String,
    pub permission: Option<Capability>,
    pub allowed_destination: AllowedDestination,
    pub cooldown: Option<Duration>,
    /// Capability that skips the cooldown. Defaults to
    /// [`Capability::CooldownBypass`].
    pub cooldown_bypass: Option<Capability>,
    /// Capability that lifts the destination restriction. Defaults to
    /// [`Capability::DestinationBypass`].
    pub destination_bypass: Option<Capability>,
    /// Whether the command takes a `-xx` locale suffix.
    pub localized: bool,
    handler: Arc<dyn Handler>,
}

impl CommandDeclaration {
    /// Start a declaration with its canonical name followed by aliases.
    pub fn builder<I, S>(names: I, handler: Arc<dyn Handler>) -> DeclarationBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DeclarationBuilder {
            names: names.into_iter().map(Into::into).collect(),
            parameters: Vec::new(),
            category: Category::Utility,
            description: String::new(),
            permission: None,
            allowed_destination: AllowedDestination::All,
            cooldown: None,
            cooldown_bypass: None,
            destination_bypass: None,
            localized: false,
            handler,
        }
    }

    /// The canonical name.
    pub fn name(&self) -> &str {
        &self.names[0]
    }

    /// Canonical name first, then aliases.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn aliases(&self) -> &[String] {
        &self.names[1..]
    }

    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    /// Accepted single-character options.
    pub fn options(&self) -> &[char] {
        &self.options
    }

    pub fn accepts_option(&self, option: char) -> bool {
        self.options.contains(&option)
    }

    /// Accepted `--name` arguments and their value hints.
    pub fn arguments(&self) -> &BTreeMap<String, Option<String>> {
        &self.arguments
    }

    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }

    fn params(&self) -> impl Iterator<Item = &Param> {
        self.parameters.iter().filter_map(|spec| match spec {
            ParameterSpec::Param(param) => Some(param),
            _ => None,
        })
    }

    fn trailing_kind(&self) -> Option<ParamKind> {
        self.params().last().map(|param| param.kind)
    }

    /// Number of required positional parameters.
    pub fn min_parameters(&self) -> usize {
        self.params().filter(|param| param.is_required()).count()
    }

    /// Maximum positional parameters, or `None` when a trailing `multiple`
    /// parameter makes the count unbounded.
    pub fn max_parameters(&self) -> Option<usize> {
        match self.trailing_kind() {
            Some(ParamKind::Multiple) => None,
            _ => Some(self.params().count()),
        }
    }

    /// Usage string, e.g. `[-f] [--from <name>] <system> [notes]...`.
    pub fn usage(&self) -> String {
        self.parameters
            .iter()
            .map(|spec| match spec {
                ParameterSpec::Options(options) => {
                    format!("[-{}]", options.iter().collect::<String>())
                }
                ParameterSpec::NamedArgument {
                    name,
                    value: Some(value),
                } => format!("[--{name} <{value}>]"),
                ParameterSpec::NamedArgument { name, value: None } => format!("[--{name}]"),
                ParameterSpec::Param(param) => param.usage(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Example parameters, e.g. `Alioth`.
    pub fn example(&self) -> String {
        self.params()
            .map(|param| param.example.as_str())
            .filter(|example| !example.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Whether the command changes the rescue board and is therefore
    /// watched for denylisted senders.
    pub fn is_dispatching(&self) -> bool {
        self.category == Category::Board || self.permission == Some(Capability::DispatchWrite)
    }

    /// Fold the parameters absorbed by a trailing continuous parameter.
    ///
    /// Parameters before the last slot pass through. Everything from the
    /// last slot on is joined with single spaces, with originally quoted
    /// words wrapped in double quotes again. A lone trailing word is left
    /// untouched.
    pub fn merge_trailing(
        &self,
        parameters: Vec<String>,
        quoted: Vec<bool>,
    ) -> (Vec<String>, Vec<bool>) {
        if self.trailing_kind() != Some(ParamKind::Continuous) || parameters.len() < 2 {
            return (parameters, quoted);
        }

        let keep = self.max_parameters().unwrap_or(1).max(1) - 1;
        if parameters.len() <= keep + 1 {
            return (parameters, quoted);
        }

        let mut merged_params = Vec::with_capacity(keep + 1);
        let mut merged_quoted = Vec::with_capacity(keep + 1);
        let mut tail = Vec::with_capacity(parameters.len() - keep);

        for (index, (text, was_quoted)) in parameters.into_iter().zip(quoted).enumerate() {
            if index < keep {
                merged_params.push(text);
                merged_quoted.push(was_quoted);
            } else if was_quoted {
                tail.push(format!("\"{text}\""));
            } else {
                tail.push(text);
            }
        }

        merged_params.push(tail.join(" "));
        merged_quoted.push(false);
        (merged_params, merged_quoted)
    }
}

impl ArgumentSchema for CommandDeclaration {
    fn accepts_argument(&self, name: &str) -> bool {
        self.arguments.contains_key(name)
    }
}

impl fmt::Debug for CommandDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDeclaration")
            .field("names", &self.names)
            .field("parameters", &self.parameters)
            .field("category", &self.category)
            .field("permission", &self.permission)
            .field("allowed_destination", &self.allowed_destination)
            .field("cooldown", &self.cooldown)
            .finish_non_exhaustive()
    }
}

/// Builder for [`CommandDeclaration`].
pub struct DeclarationBuilder {
    names: Vec<String>,
    parameters: Vec<ParameterSpec>,
    category: Category,
    description: String,
    permission: Option<Capability>,
    allowed_destination: AllowedDestination,
    cooldown: Option<Duration>,
    cooldown_bypass: Option<Capability>,
    destination_bypass: Option<Capability>,
    localized: bool,
    handler: Arc<dyn Handler>,
}

impl DeclarationBuilder {
    /// Accepted single-character options, e.g. `"fr"`.
    pub fn options(mut self, options: &str) -> Self {
        let mut set: Vec<char> = Vec::with_capacity(options.len());
        for option in options.chars() {
            if !set.contains(&option) {
                set.push(option);
            }
        }
        self.parameters.push(ParameterSpec::Options(set));
        self
    }

    /// A flag-style `--name` argument.
    pub fn flag(mut self, name: impl Into<String>) -> Self {
        self.parameters.push(ParameterSpec::NamedArgument {
            name: name.into(),
            value: None,
        });
        self
    }

    /// A `--name <value>` argument.
    pub fn argument(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push(ParameterSpec::NamedArgument {
            name: name.into(),
            value: Some(value.into()),
        });
        self
    }

    pub fn param(mut self, param: Param) -> Self {
        self.parameters.push(ParameterSpec::Param(param));
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn permission(mut self, permission: Capability) -> Self {
        self.permission = Some(permission);
        self
    }

    pub fn allowed_in(mut self, destination: AllowedDestination) -> Self {
        self.allowed_destination = destination;
        self
    }

    pub fn cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = Some(cooldown);
        self
    }

    pub fn cooldown_bypass(mut self, capability: Capability) -> Self {
        self.cooldown_bypass = Some(capability);
        self
    }

    pub fn destination_bypass(mut self, capability: Capability) -> Self {
        self.destination_bypass = Some(capability);
        self
    }

    pub fn localized(mut self) -> Self {
        self.localized = true;
        self
    }

    /// Validate the shape and produce the declaration.
    pub fn build(self) -> Result<CommandDeclaration, RegistryError> {
        if self.names.is_empty() {
            return Err(RegistryError::EmptyNames);
        }
        for (position, name) in self.names.iter().enumerate() {
            let valid = !name.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
            if !valid {
                return Err(RegistryError::InvalidName(name.clone()));
            }
            if self.names[..position].contains(name) {
                return Err(RegistryError::DuplicateName {
                    name: name.clone(),
                    existing: self.names[0].clone(),
                });
            }
        }
        let command = self.names[0].clone();

        let mut options = None;
        let mut arguments = BTreeMap::new();
        let mut params_seen = 0usize;
        let mut trailing_seen = false;

        for spec in &self.parameters {
            match spec {
                ParameterSpec::Options(set) => {
                    if options.is_some() {
                        return Err(RegistryError::MultipleOptionSpecs { command });
                    }
                    options = Some(set.clone());
                }
                ParameterSpec::NamedArgument { name, value } => {
                    arguments.insert(name.to_ascii_lowercase(), value.clone());
                }
                ParameterSpec::Param(param) => {
                    if trailing_seen {
                        return Err(RegistryError::MisplacedTrailingParameter { command });
                    }
                    params_seen += 1;
                    trailing_seen = param.kind != ParamKind::Standard;
                }
            }
        }
        tracing::trace!(command = %command, params = params_seen, "Declaration built");

        Ok(CommandDeclaration {
            names: self.names,
            parameters: self.parameters,
            options: options.unwrap_or_default(),
            arguments,
            category: self.category,
            description: self.description,
            permission: self.permission,
            allowed_destination: self.allowed_destination,
            cooldown: self.cooldown,
            cooldown_bypass: self.cooldown_bypass,
            destination_bypass: self.destination_bypass,
            localized: self.localized,
            handler: self.handler,
        })
    }
}
