use crate::error::{BootstrapError, Result};
use crate::mode::{ModeFlags, RuntimeMode};
use objctl_core::{
    Config, ConfigError, PathError, PlatformError, RuntimeInfo, SessionError, UserError,
    UserIdentity,
};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapPhase {
    Init,
    RuntimeCheck,
    Migrate,
    EnvironmentCheck,
    ConfigValidate,
    Ready,
}

impl fmt::Display for BootstrapPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BootstrapPhase::Init => "init",
            BootstrapPhase::RuntimeCheck => "runtime-check",
            BootstrapPhase::Migrate => "migrate",
            BootstrapPhase::EnvironmentCheck => "environment-check",
            BootstrapPhase::ConfigValidate => "config-validate",
            BootstrapPhase::Ready => "ready",
        };
        f.write_str(name)
    }
}

/// Everything bootstrap touches outside of its own state.
pub trait BootstrapPorts {
    fn resolve_config_dir(&self, explicit: Option<&str>) -> std::result::Result<PathBuf, PathError>;
    fn verify_runtime(&self) -> std::result::Result<(), PlatformError>;
    fn migrate_config(&self, config_dir: &Path) -> std::result::Result<Option<u32>, ConfigError>;
    fn migrate_session(&self, config_dir: &Path) -> std::result::Result<usize, SessionError>;
    fn ensure_config(&self, config_dir: &Path) -> std::result::Result<bool, ConfigError>;
    fn current_user(&self) -> std::result::Result<UserIdentity, UserError>;
    fn load_config(&self, config_dir: &Path) -> std::result::Result<Config, ConfigError>;
}

/// Ports backed by the real environment and filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPorts;

impl BootstrapPorts for SystemPorts {
    fn resolve_config_dir(&self, explicit: Option<&str>) -> std::result::Result<PathBuf, PathError> {
        objctl_core::resolve_config_dir(explicit)
    }

    fn verify_runtime(&self) -> std::result::Result<(), PlatformError> {
        objctl_core::verify_runtime_compatibility(&RuntimeInfo::current())
    }

    fn migrate_config(&self, config_dir: &Path) -> std::result::Result<Option<u32>, ConfigError> {
        objctl_core::config::migrate_config(config_dir)
    }

    fn migrate_session(&self, config_dir: &Path) -> std::result::Result<usize, SessionError> {
        objctl_core::session::migrate_session(config_dir)
    }

    fn ensure_config(&self, config_dir: &Path) -> std::result::Result<bool, ConfigError> {
        objctl_core::config::ensure_config(config_dir)
    }

    fn current_user(&self) -> std::result::Result<UserIdentity, UserError> {
        objctl_core::current_user()
    }

    fn load_config(&self, config_dir: &Path) -> std::result::Result<Config, ConfigError> {
        objctl_core::load_and_validate_config(config_dir)
    }
}

/// Outcome of a successful bootstrap, handed to the dispatcher.
#[derive(Debug, Clone)]
pub struct Ready {
    pub mode: RuntimeMode,
    pub config: Config,
    pub user: UserIdentity,
}

/// Runs the startup checks in a fixed order and stops at the first failure:
///
/// Init → RuntimeCheck → Migrate → EnvironmentCheck → ConfigValidate → Ready
///
/// The runtime check comes before any file under the config folder is read
/// or written, and migration comes before validation so a legacy file is
/// never judged against the current schema.
pub struct Bootstrap<P = SystemPorts> {
    ports: P,
}

impl Default for Bootstrap<SystemPorts> {
    fn default() -> Self {
        Self::new(SystemPorts)
    }
}

impl<P: BootstrapPorts> Bootstrap<P> {
    pub fn new(ports: P) -> Self {
        Self { ports }
    }

    pub fn ports(&self) -> &P {
        &self.ports
    }

    /// Init: resolve the config folder and fix the runtime mode. No I/O.
    pub fn init(&self, flags: &ModeFlags) -> Result<RuntimeMode> {
        let config_dir = self
            .ports
            .resolve_config_dir(flags.config_folder.as_deref())
            .map_err(BootstrapError::ConfigDir)?;
        Ok(RuntimeMode::new(flags, config_dir))
    }

    /// Full bootstrap from parsed flags.
    pub fn run<F>(&self, flags: &ModeFlags, mut progress_fn: Option<F>) -> Result<Ready>
    where
        F: FnMut(BootstrapPhase),
    {
        if let Some(ref mut f) = progress_fn {
            f(BootstrapPhase::Init);
        }
        let mode = self.init(flags)?;
        self.prepare(mode, progress_fn)
    }

    /// Every phase after Init, for a mode that is already fixed.
    pub fn prepare<F>(&self, mode: RuntimeMode, mut progress_fn: Option<F>) -> Result<Ready>
    where
        F: FnMut(BootstrapPhase),
    {
        let mut enter = |phase: BootstrapPhase| {
            tracing::debug!(%phase, "bootstrap");
            if let Some(ref mut f) = progress_fn {
                f(phase);
            }
        };

        enter(BootstrapPhase::RuntimeCheck);
        self.ports
            .verify_runtime()
            .map_err(BootstrapError::UnsupportedRuntime)?;

        enter(BootstrapPhase::Migrate);
        self.migrate(&mode.config_dir)?;

        enter(BootstrapPhase::EnvironmentCheck);
        let user = self
            .ports
            .current_user()
            .map_err(BootstrapError::UnknownUser)?;
        tracing::debug!(user = %user.display_name(), "resolved current user");

        enter(BootstrapPhase::ConfigValidate);
        let config = self
            .ports
            .load_config(&mode.config_dir)
            .map_err(BootstrapError::ConfigAccess)?;

        enter(BootstrapPhase::Ready);
        Ok(Ready { mode, config, user })
    }

    /// Config first, then session. Both are attempted so one failing does not
    /// hide problems in the other, but the first failure is the one reported.
    fn migrate(&self, config_dir: &Path) -> Result<()> {
        let config_result = self.ports.migrate_config(config_dir);
        let session_result = self.ports.migrate_session(config_dir);

        if let Some(from) = config_result.map_err(BootstrapError::MigrateConfig)? {
            tracing::info!(from, "config migrated");
        }
        let sessions = session_result.map_err(BootstrapError::MigrateSession)?;
        if sessions > 0 {
            tracing::info!(sessions, "sessions migrated");
        }

        if self
            .ports
            .ensure_config(config_dir)
            .map_err(BootstrapError::SeedConfig)?
        {
            tracing::info!(dir = %config_dir.display(), "initialized config folder");
        }
        Ok(())
    }
}
