use crate::registry::RegistryError;
use objctl_core::{ConfigError, DiagnosticsError, SessionError};
use objctl_runtime::BootstrapError;

/// Exit status for fatal and reported errors.
pub const EXIT_FAILURE: i32 = 1;

/// A handler's own failure.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to render config: {0}")]
    Render(#[from] toml::ser::Error),
}

impl CommandError {
    pub fn usage(message: impl Into<String>) -> Self {
        CommandError::Usage(message.into())
    }
}

/// The process cannot safely continue. Printed once, then exit.
#[derive(Debug, thiserror::Error)]
pub enum FatalError {
    #[error("Unable to register commands.")]
    Registry(#[source] RegistryError),

    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),

    #[error("Unable to determine the hostname.")]
    Diagnostics(#[source] DiagnosticsError),
}

/// A failure of the requested work, as opposed to the process itself.
#[derive(Debug, thiserror::Error)]
pub enum ReportedError {
    #[error("Command not found: '{0}'")]
    CommandNotFound(String),

    #[error("Unable to run '{name}'.")]
    Command {
        name: String,
        #[source]
        source: CommandError,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Fatal(#[from] FatalError),

    #[error(transparent)]
    Reported(#[from] ReportedError),

    #[error(transparent)]
    Usage(#[from] clap::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Fatal(_) | CliError::Reported(_) => EXIT_FAILURE,
            CliError::Usage(e) => e.exit_code(),
        }
    }
}

impl From<BootstrapError> for CliError {
    fn from(err: BootstrapError) -> Self {
        CliError::Fatal(FatalError::Bootstrap(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use objctl_core::PlatformError;
    use std::error::Error;

    #[test]
    fn test_exit_codes() {
        let fatal = CliError::from(BootstrapError::UnsupportedRuntime(
            PlatformError::UnsupportedOs {
                os: "plan9".to_string(),
            },
        ));
        assert_eq!(fatal.exit_code(), EXIT_FAILURE);

        let reported = CliError::from(ReportedError::CommandNotFound("frobnicate".to_string()));
        assert_eq!(reported.exit_code(), EXIT_FAILURE);
    }

    #[test]
    fn test_command_not_found_names_the_token() {
        let err = ReportedError::CommandNotFound("frobnicate".to_string());
        assert_eq!(err.to_string(), "Command not found: 'frobnicate'");
    }

    #[test]
    fn test_bootstrap_error_keeps_its_cause() {
        let err = CliError::from(BootstrapError::ConfigAccess(ConfigError::AliasNotFound(
            "s3".to_string(),
        )));
        assert_eq!(err.to_string(), "Unable to access configuration file.");
        assert_eq!(
            err.source().map(|s| s.to_string()),
            Some("alias 's3' not found".to_string())
        );
    }

    #[test]
    fn test_command_failure_wraps_handler_error() {
        let err = ReportedError::Command {
            name: "session".to_string(),
            source: CommandError::usage("unknown subcommand 'drop'"),
        };
        assert_eq!(err.to_string(), "Unable to run 'session'.");
        assert_eq!(
            err.source().map(|s| s.to_string()),
            Some("unknown subcommand 'drop'".to_string())
        );
    }
}
