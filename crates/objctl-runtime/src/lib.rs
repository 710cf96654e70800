pub mod bootstrap;
pub mod error;
pub mod mode;

pub use bootstrap::{Bootstrap, BootstrapPhase, BootstrapPorts, Ready, SystemPorts};
pub use error::{BootstrapError, Result};
pub use mode::{ModeFlags, RuntimeMode};
