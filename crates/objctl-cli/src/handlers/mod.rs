pub mod config;
pub mod session;
pub mod version;

use crate::registry::{
    CommandDescriptor, FlagDescriptor, FlagValue, Registry, RegistryBuilder, RegistryError,
};
use objctl_runtime::ModeFlags;

fn set_config_folder(flags: &mut ModeFlags, value: &FlagValue) {
    flags.config_folder = value.as_str().map(str::to_string);
}

/// Every command and global flag this binary ships with.
pub fn builtin() -> Result<Registry, RegistryError> {
    let mut builder = RegistryBuilder::new();

    builder
        .register_command(
            CommandDescriptor::new(
                "session",
                "Manage saved sessions of cp and mirror operations",
                session::handle,
            )
            .with_synopsis("list | clear SESSION-ID | clear all"),
        )?
        .register_command(
            CommandDescriptor::new("config", "Manage the configuration file", config::handle)
                .with_synopsis("show | path | alias list | alias add NAME URL | alias remove NAME"),
        )?
        .register_command(CommandDescriptor::new(
            "version",
            "Print the version",
            version::handle,
        ))?;

    builder
        .register_flag(FlagDescriptor::string(
            "config-folder",
            "PATH",
            "Path to configuration folder",
            set_config_folder,
        ))?
        .register_flag(FlagDescriptor::bool(
            "quiet",
            "Suppress chatty console output",
            |flags, value| flags.quiet = value.as_bool(),
        ))?
        .register_flag(FlagDescriptor::bool(
            "mimic",
            "Mimic operating system toolchain behavior wherever it makes sense",
            |flags, value| flags.mimic = value.as_bool(),
        ))?
        .register_flag(FlagDescriptor::bool(
            "json",
            "Enable json formatted output",
            |flags, value| flags.json = value.as_bool(),
        ))?
        .register_flag(FlagDescriptor::bool(
            "debug",
            "Enable debugging output",
            |flags, value| flags.debug = value.as_bool(),
        ))?;

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry() {
        let registry = builtin().unwrap();
        let commands: Vec<&str> = registry.commands().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(commands, ["session", "config", "version"]);

        let flags: Vec<&str> = registry.flags().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(flags, ["config-folder", "quiet", "mimic", "json", "debug"]);
    }

    #[test]
    fn test_builtin_flag_effects() {
        let registry = builtin().unwrap();
        let mut flags = ModeFlags::default();

        registry
            .lookup_flag("mimic")
            .unwrap()
            .apply(&mut flags, &FlagValue::Bool(true));
        registry
            .lookup_flag("config-folder")
            .unwrap()
            .apply(&mut flags, &FlagValue::String(Some("/srv/objctl".to_string())));

        assert!(flags.mimic);
        assert!(!flags.json);
        assert_eq!(flags.config_folder.as_deref(), Some("/srv/objctl"));
    }
}
