use crate::args::Invocation;
use crate::console::Console;
use crate::context::CommandContext;
use crate::error::{CliError, FatalError, ReportedError};
use crate::handlers::version;
use crate::help::{self, HelpDocument};
use crate::registry::Registry;
use objctl_core::build_info;
use objctl_runtime::{Ready, RuntimeMode};

/// Help and version requests. Only Init has run at this point.
pub fn render_informational(
    registry: &Registry,
    invocation: &Invocation,
    mode: &RuntimeMode,
    console: &Console,
) -> Result<(), CliError> {
    if invocation.version && !invocation.help {
        return version::print_version(console).map_err(|source| {
            CliError::from(ReportedError::Command {
                name: "version".to_string(),
                source,
            })
        });
    }

    let topic = invocation
        .command
        .as_ref()
        .and_then(|call| registry.lookup_command(&call.name));
    match topic {
        Some(command) => console.println(help::command_help(command).trim_end()),
        None => print_app_help(registry, mode, console)?,
    }
    Ok(())
}

/// Route a fully bootstrapped invocation to its handler.
///
/// No command at all is not an error: it shows the application help.
pub fn dispatch(
    registry: &Registry,
    invocation: &Invocation,
    ready: &Ready,
    console: &Console,
) -> Result<(), CliError> {
    let Some(call) = &invocation.command else {
        return print_app_help(registry, &ready.mode, console);
    };

    let Some(command) = registry.lookup_command(&call.name) else {
        return Err(ReportedError::CommandNotFound(call.name.clone()).into());
    };

    tracing::debug!(command = %command.name, args = ?call.args, "dispatching");
    let ctx = CommandContext::new(ready, console);
    command
        .handler()
        .run(&ctx, &call.args)
        .map_err(|source| {
            ReportedError::Command {
                name: command.name.clone(),
                source,
            }
            .into()
        })
}

fn print_app_help(
    registry: &Registry,
    mode: &RuntimeMode,
    console: &Console,
) -> Result<(), CliError> {
    let document = HelpDocument::build(registry, build_info::RELEASE_TAG, mode.debug)
        .map_err(FatalError::Diagnostics)?;
    console.println(document.to_string().trim_end());
    Ok(())
}
