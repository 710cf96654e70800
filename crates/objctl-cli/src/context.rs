use crate::console::Console;
use objctl_core::Config;
use objctl_runtime::{Ready, RuntimeMode};
use std::path::PathBuf;

/// What a command handler gets to see once bootstrap has finished.
pub struct CommandContext<'a> {
    pub mode: &'a RuntimeMode,
    pub config: &'a Config,
    pub console: &'a Console,
}

impl<'a> CommandContext<'a> {
    pub fn new(ready: &'a Ready, console: &'a Console) -> Self {
        Self {
            mode: &ready.mode,
            config: &ready.config,
            console,
        }
    }

    pub fn config_path(&self) -> PathBuf {
        Config::path_in(&self.mode.config_dir)
    }
}
