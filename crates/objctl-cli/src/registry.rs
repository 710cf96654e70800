// NOTE: Registry Rationale
//
// Commands and global flags are plain data (descriptors) collected by a
// builder at process entry. The built `Registry` is immutable and passed by
// reference to the parser, bootstrap and dispatcher, so adding a command or
// a flag never touches dispatch logic. Registration order is help order.

use crate::context::CommandContext;
use crate::error::CommandError;
use objctl_runtime::ModeFlags;
use std::fmt;

/// Flag names the dispatcher handles itself.
pub const RESERVED_FLAGS: &[&str] = &["help", "version"];

/// Command names the dispatcher handles itself.
pub const RESERVED_COMMANDS: &[&str] = &["help"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("command '{0}' is registered twice")]
    DuplicateCommand(String),

    #[error("global flag '{0}' is registered twice")]
    DuplicateFlag(String),

    #[error("'{0}' is reserved")]
    Reserved(String),

    #[error("'{0}' is not a valid name")]
    InvalidName(String),
}

pub trait CommandHandler {
    fn run(&self, ctx: &CommandContext<'_>, args: &[String]) -> Result<(), CommandError>;
}

impl<F> CommandHandler for F
where
    F: Fn(&CommandContext<'_>, &[String]) -> Result<(), CommandError>,
{
    fn run(&self, ctx: &CommandContext<'_>, args: &[String]) -> Result<(), CommandError> {
        self(ctx, args)
    }
}

pub struct CommandDescriptor {
    pub name: String,
    pub usage: String,
    pub synopsis: Option<String>,
    handler: Box<dyn CommandHandler>,
}

impl CommandDescriptor {
    pub fn new(
        name: impl Into<String>,
        usage: impl Into<String>,
        handler: impl CommandHandler + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            usage: usage.into(),
            synopsis: None,
            handler: Box::new(handler),
        }
    }

    /// Argument summary shown in the command's own help.
    pub fn with_synopsis(mut self, synopsis: impl Into<String>) -> Self {
        self.synopsis = Some(synopsis.into());
        self
    }

    pub fn handler(&self) -> &dyn CommandHandler {
        self.handler.as_ref()
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("usage", &self.usage)
            .field("synopsis", &self.synopsis)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    Bool,
    String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    Bool(bool),
    String(Option<String>),
}

impl FlagValue {
    pub fn as_bool(&self) -> bool {
        matches!(self, FlagValue::Bool(true))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FlagValue::String(value) => value.as_deref(),
            FlagValue::Bool(_) => None,
        }
    }
}

/// How a parsed flag value lands in the process-wide mode.
pub type FlagEffect = fn(&mut ModeFlags, &FlagValue);

#[derive(Debug, Clone)]
pub struct FlagDescriptor {
    pub name: String,
    pub kind: FlagKind,
    pub default: FlagValue,
    pub value_name: Option<String>,
    pub usage: String,
    pub effect: FlagEffect,
}

impl FlagDescriptor {
    pub fn bool(name: impl Into<String>, usage: impl Into<String>, effect: FlagEffect) -> Self {
        Self {
            name: name.into(),
            kind: FlagKind::Bool,
            default: FlagValue::Bool(false),
            value_name: None,
            usage: usage.into(),
            effect,
        }
    }

    pub fn string(
        name: impl Into<String>,
        value_name: impl Into<String>,
        usage: impl Into<String>,
        effect: FlagEffect,
    ) -> Self {
        Self {
            name: name.into(),
            kind: FlagKind::String,
            default: FlagValue::String(None),
            value_name: Some(value_name.into()),
            usage: usage.into(),
            effect,
        }
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        if self.kind == FlagKind::String {
            self.default = FlagValue::String(Some(value.into()));
        }
        self
    }

    pub fn apply(&self, flags: &mut ModeFlags, value: &FlagValue) {
        (self.effect)(flags, value)
    }
}

fn check_name(name: &str) -> Result<(), RegistryError> {
    let valid = !name.is_empty()
        && !name.starts_with('-')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(RegistryError::InvalidName(name.to_string()))
    }
}

/// Collects descriptors before the process starts doing real work.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    commands: Vec<CommandDescriptor>,
    flags: Vec<FlagDescriptor>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_command(
        &mut self,
        descriptor: CommandDescriptor,
    ) -> Result<&mut Self, RegistryError> {
        check_name(&descriptor.name)?;
        if RESERVED_COMMANDS.contains(&descriptor.name.as_str()) {
            return Err(RegistryError::Reserved(descriptor.name));
        }
        if self.commands.iter().any(|c| c.name == descriptor.name) {
            return Err(RegistryError::DuplicateCommand(descriptor.name));
        }
        self.commands.push(descriptor);
        Ok(self)
    }

    pub fn register_flag(&mut self, descriptor: FlagDescriptor) -> Result<&mut Self, RegistryError> {
        check_name(&descriptor.name)?;
        if RESERVED_FLAGS.contains(&descriptor.name.as_str()) {
            return Err(RegistryError::Reserved(descriptor.name));
        }
        if self.flags.iter().any(|f| f.name == descriptor.name) {
            return Err(RegistryError::DuplicateFlag(descriptor.name));
        }
        self.flags.push(descriptor);
        Ok(self)
    }

    /// Seal the registry. Nothing can be registered afterwards.
    pub fn build(self) -> Registry {
        Registry {
            commands: self.commands,
            flags: self.flags,
        }
    }
}

#[derive(Debug)]
pub struct Registry {
    commands: Vec<CommandDescriptor>,
    flags: Vec<FlagDescriptor>,
}

impl Registry {
    /// Exact, case-sensitive lookup.
    pub fn lookup_command(&self, name: &str) -> Option<&CommandDescriptor> {
        self.commands.iter().find(|c| c.name == name)
    }

    pub fn lookup_flag(&self, name: &str) -> Option<&FlagDescriptor> {
        self.flags.iter().find(|f| f.name == name)
    }

    /// Commands in registration order.
    pub fn commands(&self) -> &[CommandDescriptor] {
        &self.commands
    }

    /// Global flags in registration order.
    pub fn flags(&self) -> &[FlagDescriptor] {
        &self.flags
    }
}
