use crate::bootstrap::BootstrapPhase;
use objctl_core::{ConfigError, PathError, PlatformError, SessionError, UserError};

pub type Result<T> = std::result::Result<T, BootstrapError>;

/// A bootstrap failure. Every variant is fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Unable to determine configuration folder.")]
    ConfigDir(#[source] PathError),

    #[error("Unsupported runtime: {0}.")]
    UnsupportedRuntime(PlatformError),

    #[error("Unable to migrate config.")]
    MigrateConfig(#[source] ConfigError),

    #[error("Unable to migrate session.")]
    MigrateSession(#[source] SessionError),

    #[error("Unable to write default configuration file.")]
    SeedConfig(#[source] ConfigError),

    #[error("Unable to determine current user.")]
    UnknownUser(#[source] UserError),

    #[error("Unable to access configuration file.")]
    ConfigAccess(#[source] ConfigError),
}

impl BootstrapError {
    /// The phase that failed.
    pub fn phase(&self) -> BootstrapPhase {
        match self {
            BootstrapError::ConfigDir(_) => BootstrapPhase::Init,
            BootstrapError::UnsupportedRuntime(_) => BootstrapPhase::RuntimeCheck,
            BootstrapError::MigrateConfig(_)
            | BootstrapError::MigrateSession(_)
            | BootstrapError::SeedConfig(_) => BootstrapPhase::Migrate,
            BootstrapError::UnknownUser(_) => BootstrapPhase::EnvironmentCheck,
            BootstrapError::ConfigAccess(_) => BootstrapPhase::ConfigValidate,
        }
    }
}
