use crate::registry::{FlagDescriptor, FlagKind, FlagValue, Registry};
use crate::{APP_NAME, APP_USAGE};
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use objctl_runtime::ModeFlags;
use std::ffi::OsString;

pub const HELP_FLAG: &str = "help";
pub const VERSION_FLAG: &str = "version";
pub const HELP_COMMAND: &str = "help";

const ARGS_ID: &str = "args";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandCall {
    pub name: String,
    pub args: Vec<String>,
}

/// A parsed command line, before any bootstrap work.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub flags: ModeFlags,
    pub help: bool,
    pub version: bool,
    pub command: Option<CommandCall>,
}

impl Invocation {
    /// Help or version output needs nothing past Init.
    pub fn is_informational(&self) -> bool {
        self.help || self.version
    }
}

/// Build the clap command tree from the registry.
///
/// clap's own help and version handling is switched off: the dispatcher
/// renders both so the output follows the registry.
pub fn build_command(registry: &Registry) -> Command {
    let mut root = Command::new(APP_NAME)
        .about(APP_USAGE)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .disable_help_subcommand(true)
        .allow_external_subcommands(true)
        .external_subcommand_value_parser(value_parser!(String));

    for flag in registry.flags() {
        root = root.arg(flag_arg(flag));
    }

    root = root
        .arg(
            Arg::new(HELP_FLAG)
                .short('h')
                .long(HELP_FLAG)
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new(VERSION_FLAG)
                .long(VERSION_FLAG)
                .action(ArgAction::SetTrue)
                .global(true),
        );

    for command in registry.commands() {
        root = root.subcommand(
            Command::new(command.name.clone())
                .about(command.usage.clone())
                .disable_help_flag(true)
                .arg(
                    Arg::new(ARGS_ID)
                        .num_args(0..)
                        .action(ArgAction::Append)
                        .value_parser(value_parser!(String)),
                ),
        );
    }

    root
}

fn flag_arg(flag: &FlagDescriptor) -> Arg {
    let arg = Arg::new(flag.name.clone())
        .long(flag.name.clone())
        .help(flag.usage.clone())
        .global(true);
    match flag.kind {
        FlagKind::Bool => arg.action(ArgAction::SetTrue),
        FlagKind::String => arg
            .action(ArgAction::Set)
            .value_name(flag.value_name.clone().unwrap_or_else(|| "VALUE".to_string()))
            .value_parser(value_parser!(String)),
    }
}

/// Parse process arguments (including argv[0]) against the registry.
pub fn parse<I, T>(registry: &Registry, args: I) -> Result<Invocation, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_command(registry).try_get_matches_from(args)?;

    // Global flags typed after an unregistered command (or `help`), parsed
    // again from the root.
    let mut trailing = None;
    let mut command = None;
    let mut levels = vec![&matches];
    if let Some((name, sub)) = matches.subcommand() {
        let args = if registry.lookup_command(name).is_some() {
            levels.push(sub);
            values(sub, ARGS_ID)
        } else {
            // External subcommands keep their raw arguments under the empty id.
            let (globals, rest) = split_globals(registry, values(sub, ""));
            if !globals.is_empty() {
                let argv = std::iter::once(APP_NAME.to_string()).chain(globals);
                trailing = Some(build_command(registry).try_get_matches_from(argv)?);
            }
            rest
        };
        command = Some(CommandCall {
            name: name.to_string(),
            args,
        });
    }
    levels.extend(trailing.as_ref());

    let mut flags = ModeFlags::default();
    for flag in registry.flags() {
        let value = flag_value(&levels, flag).unwrap_or_else(|| flag.default.clone());
        flag.apply(&mut flags, &value);
    }

    let mut help = bool_set(&levels, HELP_FLAG);
    let version = bool_set(&levels, VERSION_FLAG);

    // `objctl help [command]` is the same as `objctl --help [command]`.
    if let Some(call) = command.take() {
        if call.name == HELP_COMMAND {
            help = true;
            let mut rest = call.args.into_iter();
            command = rest.next().map(|name| CommandCall {
                name,
                args: rest.collect(),
            });
        } else {
            command = Some(call);
        }
    }

    Ok(Invocation {
        flags,
        help,
        version,
        command,
    })
}

fn values(matches: &ArgMatches, id: &str) -> Vec<String> {
    matches
        .get_many::<String>(id)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

/// Separate registered global flags (and help/version) from positionals.
///
/// A string flag without an inline `=value` takes the next token. Nothing
/// after `--` is treated as a flag.
fn split_globals(registry: &Registry, raw: Vec<String>) -> (Vec<String>, Vec<String>) {
    let mut globals = Vec::new();
    let mut rest = Vec::new();
    let mut tokens = raw.into_iter();

    while let Some(token) = tokens.next() {
        if token == "--" {
            rest.push(token);
            rest.extend(tokens.by_ref());
            break;
        }
        match global_kind(registry, &token) {
            Some(takes_value) => {
                globals.push(token);
                if takes_value {
                    globals.extend(tokens.next());
                }
            }
            None => rest.push(token),
        }
    }

    (globals, rest)
}

/// `Some(true)` when the token is a global flag still waiting for its value.
fn global_kind(registry: &Registry, token: &str) -> Option<bool> {
    if token == "-h" {
        return Some(false);
    }
    let long = token.strip_prefix("--")?;
    let (name, inline) = match long.split_once('=') {
        Some((name, _)) => (name, true),
        None => (long, false),
    };
    if name == HELP_FLAG || name == VERSION_FLAG {
        return Some(false);
    }
    let flag = registry.lookup_flag(name)?;
    Some(flag.kind == FlagKind::String && !inline)
}

fn from_command_line(matches: &ArgMatches, id: &str) -> bool {
    matches!(matches.value_source(id), Some(ValueSource::CommandLine))
}

/// The innermost level where the user actually passed the flag wins.
fn flag_value(levels: &[&ArgMatches], flag: &FlagDescriptor) -> Option<FlagValue> {
    levels.iter().rev().find_map(|matches| {
        if !from_command_line(matches, &flag.name) {
            return None;
        }
        match flag.kind {
            FlagKind::Bool => matches
                .try_get_one::<bool>(&flag.name)
                .ok()
                .flatten()
                .map(|value| FlagValue::Bool(*value)),
            FlagKind::String => matches
                .try_get_one::<String>(&flag.name)
                .ok()
                .flatten()
                .map(|value| FlagValue::String(Some(value.clone()))),
        }
    })
}

fn bool_set(levels: &[&ArgMatches], id: &str) -> bool {
    levels.iter().any(|matches| {
        matches
            .try_get_one::<bool>(id)
            .ok()
            .flatten()
            .copied()
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers;

    fn parse_args(args: &[&str]) -> Invocation {
        let registry = handlers::builtin().unwrap();
        let argv = std::iter::once(APP_NAME).chain(args.iter().copied());
        parse(&registry, argv).unwrap()
    }

    #[test]
    fn test_no_arguments() {
        let invocation = parse_args(&[]);
        assert_eq!(invocation, Invocation::default());
    }

    #[test]
    fn test_global_flags_before_command() {
        let invocation = parse_args(&["--json", "--quiet", "session", "list"]);
        assert!(invocation.flags.json);
        assert!(invocation.flags.quiet);
        assert!(!invocation.flags.debug);
        assert_eq!(
            invocation.command,
            Some(CommandCall {
                name: "session".to_string(),
                args: vec!["list".to_string()],
            })
        );
    }

    #[test]
    fn test_global_flags_after_command() {
        let invocation = parse_args(&["config", "show", "--debug", "--config-folder", "/tmp/x"]);
        assert!(invocation.flags.debug);
        assert_eq!(invocation.flags.config_folder.as_deref(), Some("/tmp/x"));
        assert_eq!(invocation.command.unwrap().args, vec!["show".to_string()]);
    }

    #[test]
    fn test_unknown_command_is_kept_verbatim() {
        let invocation = parse_args(&["frobnicate", "a", "b"]);
        assert_eq!(
            invocation.command,
            Some(CommandCall {
                name: "frobnicate".to_string(),
                args: vec!["a".to_string(), "b".to_string()],
            })
        );
    }

    #[test]
    fn test_help_flag_after_unknown_command() {
        let invocation = parse_args(&["frobnicate", "--help"]);
        assert!(invocation.help);
        assert_eq!(
            invocation.command,
            Some(CommandCall {
                name: "frobnicate".to_string(),
                args: Vec::new(),
            })
        );
    }

    #[test]
    fn test_global_flags_after_help_command() {
        let invocation = parse_args(&["help", "--debug"]);
        assert!(invocation.help);
        assert!(invocation.flags.debug);
        assert!(invocation.command.is_none());

        let invocation = parse_args(&["help", "--json", "session"]);
        assert!(invocation.flags.json);
        assert_eq!(invocation.command.unwrap().name, "session");
    }

    #[test]
    fn test_config_folder_after_unknown_command() {
        let invocation = parse_args(&["frobnicate", "a", "--config-folder", "/tmp/elsewhere", "b"]);
        assert_eq!(invocation.flags.config_folder.as_deref(), Some("/tmp/elsewhere"));
        assert_eq!(
            invocation.command.unwrap().args,
            vec!["a".to_string(), "b".to_string()]
        );

        let invocation = parse_args(&["frobnicate", "--config-folder=/tmp/inline"]);
        assert_eq!(invocation.flags.config_folder.as_deref(), Some("/tmp/inline"));
    }

    #[test]
    fn test_unknown_command_keeps_foreign_flags() {
        let invocation = parse_args(&["frobnicate", "--recursive", "--", "--quiet"]);
        assert!(!invocation.flags.quiet);
        assert_eq!(
            invocation.command.unwrap().args,
            vec!["--recursive".to_string(), "--".to_string(), "--quiet".to_string()]
        );
    }

    #[test]
    fn test_help_and_version_flags() {
        assert!(parse_args(&["--help"]).help);
        assert!(parse_args(&["-h"]).help);
        assert!(parse_args(&["--version"]).version);
        assert!(parse_args(&["--version"]).is_informational());
        assert!(!parse_args(&["version"]).is_informational());

        let invocation = parse_args(&["session", "--help"]);
        assert!(invocation.help);
        assert_eq!(invocation.command.unwrap().name, "session");
    }

    #[test]
    fn test_help_command_selects_topic() {
        let invocation = parse_args(&["help", "config"]);
        assert!(invocation.help);
        assert_eq!(invocation.command.unwrap().name, "config");

        let invocation = parse_args(&["help"]);
        assert!(invocation.help);
        assert!(invocation.command.is_none());
    }

    #[test]
    fn test_unknown_global_flag_is_a_usage_error() {
        let registry = handlers::builtin().unwrap();
        let err = parse(&registry, [APP_NAME, "--frobnicate"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_string_flag_requires_value() {
        let registry = handlers::builtin().unwrap();
        assert!(parse(&registry, [APP_NAME, "--config-folder"]).is_err());
    }
}
