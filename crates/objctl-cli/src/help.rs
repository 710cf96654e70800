use crate::registry::{CommandDescriptor, FlagDescriptor, FlagKind, FlagValue, Registry};
use crate::{APP_NAME, APP_USAGE};
use objctl_core::build_info;
use objctl_core::diagnostics::{self, DiagnosticsError, DiagnosticsSnapshot};
use std::fmt;

/// Application help: the registry's commands and flags, the version line,
/// and in debug mode a fresh diagnostics block.
#[derive(Debug)]
pub struct HelpDocument<'a> {
    registry: &'a Registry,
    version_line: String,
    diagnostics: Option<DiagnosticsSnapshot>,
}

impl<'a> HelpDocument<'a> {
    /// Diagnostics are collected here, at render time, and only in debug mode.
    pub fn build(
        registry: &'a Registry,
        release_tag: &str,
        debug: bool,
    ) -> Result<Self, DiagnosticsError> {
        let diagnostics = if debug {
            Some(diagnostics::collect()?)
        } else {
            None
        };
        Ok(Self {
            registry,
            version_line: build_info::release_line(release_tag),
            diagnostics,
        })
    }

    pub fn version_line(&self) -> &str {
        &self.version_line
    }
}

fn flag_label(flag: &FlagDescriptor) -> String {
    match (&flag.kind, &flag.value_name) {
        (FlagKind::String, Some(value_name)) => format!("--{} <{}>", flag.name, value_name),
        _ => format!("--{}", flag.name),
    }
}

fn flag_usage(flag: &FlagDescriptor) -> String {
    match &flag.default {
        FlagValue::String(Some(default)) => format!("{} (default: \"{}\")", flag.usage, default),
        _ => flag.usage.clone(),
    }
}

impl fmt::Display for HelpDocument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "NAME:")?;
        writeln!(f, "  {} - {}", APP_NAME, APP_USAGE)?;
        writeln!(f)?;
        writeln!(f, "USAGE:")?;
        writeln!(
            f,
            "  {} [global flags] command [command flags] [arguments...]",
            APP_NAME
        )?;
        writeln!(f)?;

        writeln!(f, "COMMANDS:")?;
        let width = self
            .registry
            .commands()
            .iter()
            .map(|c| c.name.len())
            .max()
            .unwrap_or(0);
        for command in self.registry.commands() {
            writeln!(f, "  {:<width$}  {}", command.name, command.usage)?;
        }
        writeln!(f)?;

        writeln!(f, "GLOBAL FLAGS:")?;
        let mut rows: Vec<(String, String)> = self
            .registry
            .flags()
            .iter()
            .map(|flag| (flag_label(flag), flag_usage(flag)))
            .collect();
        rows.push(("--help, -h".to_string(), "Show help".to_string()));
        rows.push(("--version".to_string(), "Print the version".to_string()));
        let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        for (label, usage) in &rows {
            writeln!(f, "  {:<width$}  {}", label, usage)?;
        }
        writeln!(f)?;

        writeln!(f, "VERSION:")?;
        if !self.version_line.is_empty() {
            writeln!(f, "  {}", self.version_line)?;
        }

        if let Some(snapshot) = &self.diagnostics {
            for (key, value) in snapshot.entries() {
                writeln!(f)?;
                writeln!(f, "{}:", key)?;
                writeln!(f, "  {}", value)?;
            }
        }
        Ok(())
    }
}

/// Help for a single registered command.
pub fn command_help(command: &CommandDescriptor) -> String {
    let mut out = format!(
        "NAME:\n  {} {} - {}\n\nUSAGE:\n  {} [global flags] {}",
        APP_NAME, command.name, command.usage, APP_NAME, command.name
    );
    match &command.synopsis {
        Some(synopsis) => {
            out.push(' ');
            out.push_str(synopsis);
        }
        None => out.push_str(" [arguments...]"),
    }
    out.push('\n');
    out
}
