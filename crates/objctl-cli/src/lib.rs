// NOTE: objctl Startup Rationale
//
// Why a registry instead of a static clap tree?
// - Commands and global flags are data; the parser, help text and dispatcher
//   are all derived from the same descriptors
// - Registration order is the order users see in help
//
// Why a phased bootstrap?
// - The runtime check runs before anything under the config folder is touched
// - Legacy config and session files are migrated before the current schema
//   is validated, so an old file is never rejected as malformed
// - Help and version requests stop after Init: they must work even when the
//   config folder is broken
//
// Why two error classes?
// - Fatal errors mean the process cannot continue (bootstrap, diagnostics)
// - Reported errors are failures of the requested work (unknown command,
//   handler failure); both exit non-zero but only fatal ones abort bootstrap

pub mod args;
pub mod console;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod help;
pub mod logging;
pub mod registry;

pub use args::{CommandCall, Invocation};
pub use console::Console;
pub use context::CommandContext;
pub use error::{CliError, CommandError, FatalError, ReportedError};
pub use registry::{
    CommandDescriptor, CommandHandler, FlagDescriptor, FlagKind, FlagValue, Registry,
    RegistryBuilder, RegistryError,
};

use objctl_runtime::{Bootstrap, BootstrapPhase, SystemPorts};
use std::ffi::OsString;
use std::time::Instant;

pub const APP_NAME: &str = "objctl";
pub const APP_USAGE: &str = "Client for cloud storage and filesystems";

/// Parse, bootstrap and dispatch one invocation.
///
/// `console` is replaced once the runtime mode is known, so the caller can
/// report a returned error in the right format.
pub fn run<I, T>(registry: &Registry, args: I, console: &mut Console) -> Result<(), CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let invocation = args::parse(registry, args)?;

    let bootstrap = Bootstrap::<SystemPorts>::default();
    let mode = bootstrap.init(&invocation.flags)?;
    *console = Console::new(&mode);
    logging::init(&mode);
    tracing::debug!(config_dir = %mode.config_dir.display(), "runtime mode fixed");

    if invocation.is_informational() {
        return dispatch::render_informational(registry, &invocation, &mode, console);
    }

    let started = Instant::now();
    let ready = bootstrap.prepare(
        mode,
        Some(|phase: BootstrapPhase| {
            let elapsed_us = started.elapsed().as_micros();
            tracing::trace!(%phase, elapsed_us, "entering phase");
        }),
    )?;

    dispatch::dispatch(registry, &invocation, &ready, console)
}

/// Process entry: returns the exit status.
pub fn main_with_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut console = Console::plain();

    let registry = match handlers::builtin() {
        Ok(registry) => registry,
        Err(err) => {
            let err = CliError::from(FatalError::Registry(err));
            console.report(&err);
            return err.exit_code();
        }
    };

    match run(&registry, args, &mut console) {
        Ok(()) => 0,
        Err(CliError::Usage(err)) => {
            let _ = err.print();
            err.exit_code()
        }
        Err(err) => {
            console.report(&err);
            err.exit_code()
        }
    }
}
