//! Core building blocks for objctl: where the config folder lives, what the
//! persisted config and session state look like, how older layouts are
//! brought forward, and what the host looks like to diagnostics.

pub mod build_info;
pub mod config;
pub mod diagnostics;
pub mod fs;
pub mod path;
pub mod platform;
pub mod session;
pub mod user;

pub use config::{Config, ConfigError, HostConfig, load_and_validate_config};
pub use diagnostics::{DiagnosticsError, DiagnosticsSnapshot};
pub use path::{PathError, resolve_config_dir};
pub use platform::{PlatformError, RuntimeInfo, verify_runtime_compatibility};
pub use session::{Session, SessionError, SessionHeader};
pub use user::{UserError, UserIdentity, current_user};
