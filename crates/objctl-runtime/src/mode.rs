use std::path::PathBuf;

/// Global flag values as parsed from the command line, before the config
/// folder has been resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeFlags {
    pub config_folder: Option<String>,
    pub quiet: bool,
    pub debug: bool,
    pub json: bool,
    pub mimic: bool,
}

/// Process-wide mode, fixed once bootstrap has passed Init.
///
/// Every flag is independent: `quiet` and `debug` may both be set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeMode {
    pub quiet: bool,
    pub debug: bool,
    pub json: bool,
    pub mimic: bool,
    pub config_dir: PathBuf,
}

impl RuntimeMode {
    pub fn new(flags: &ModeFlags, config_dir: PathBuf) -> Self {
        Self {
            quiet: flags.quiet,
            debug: flags.debug,
            json: flags.json,
            mimic: flags.mimic,
            config_dir,
        }
    }
}
