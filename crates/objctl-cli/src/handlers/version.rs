use crate::console::Console;
use crate::context::CommandContext;
use crate::error::CommandError;
use crate::APP_NAME;
use objctl_core::build_info;
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VersionMessage<'a> {
    status: &'static str,
    version: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    release_tag: Option<&'a str>,
}

pub fn handle(ctx: &CommandContext<'_>, args: &[String]) -> Result<(), CommandError> {
    if let Some(extra) = args.first() {
        return Err(CommandError::usage(format!(
            "'version' takes no arguments, got '{}'",
            extra
        )));
    }
    print_version(ctx.console)
}

/// Shared by the `version` command and the `--version` flag.
pub fn print_version(console: &Console) -> Result<(), CommandError> {
    let release = build_info::release_line(build_info::RELEASE_TAG);

    if console.is_json() {
        console.print_json(&VersionMessage {
            status: "success",
            version: build_info::PKG_VERSION,
            release_tag: Some(release.as_str()).filter(|r| !r.is_empty()),
        })?;
        return Ok(());
    }

    console.println(format!("{} version {}", APP_NAME, build_info::PKG_VERSION));
    if !release.is_empty() && !console.is_mimic() {
        console.println(format!("Release-Tag: {}", release));
    }
    Ok(())
}
