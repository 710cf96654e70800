use crate::context::CommandContext;
use crate::error::CommandError;
use objctl_core::Session;
use objctl_core::session::{clear_sessions, list_sessions, remove_session};
use serde::Serialize;

const ALL: &str = "all";

#[derive(Serialize)]
struct SessionMessage<'a> {
    status: &'static str,
    #[serde(flatten)]
    session: &'a Session,
}

#[derive(Serialize)]
struct ClearMessage<'a> {
    status: &'static str,
    cleared: &'a [String],
}

pub fn handle(ctx: &CommandContext<'_>, args: &[String]) -> Result<(), CommandError> {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    match args.as_slice() {
        [] | ["list"] => list(ctx),
        ["clear", ALL] => clear_all(ctx),
        ["clear", id] => clear_one(ctx, id),
        ["list", extra, ..] => Err(CommandError::usage(format!(
            "'session list' takes no arguments, got '{}'",
            extra
        ))),
        ["clear"] => Err(CommandError::usage(
            "'session clear' needs a session id or 'all'",
        )),
        [other, ..] => Err(CommandError::usage(format!(
            "unknown session subcommand '{}'",
            other
        ))),
    }
}

fn list(ctx: &CommandContext<'_>) -> Result<(), CommandError> {
    let sessions = list_sessions(&ctx.mode.config_dir)?;
    let console = ctx.console;

    if console.is_json() {
        for session in &sessions {
            console.print_json(&SessionMessage {
                status: "success",
                session,
            })?;
        }
        return Ok(());
    }

    if sessions.is_empty() {
        console.info("No saved sessions.");
        return Ok(());
    }

    for session in &sessions {
        if console.is_mimic() {
            console.println(&session.id);
            continue;
        }
        let header = &session.header;
        let line = format!(
            "{}  {}  {} {}",
            session.id,
            header.when.format("%Y-%m-%d %H:%M:%S UTC"),
            header.command_type,
            header.command_args.join(" ")
        );
        console.println(line.trim_end());
    }
    Ok(())
}

fn clear_one(ctx: &CommandContext<'_>, id: &str) -> Result<(), CommandError> {
    remove_session(&ctx.mode.config_dir, id)?;
    tracing::debug!(id, "session removed");

    if ctx.console.is_json() {
        ctx.console.print_json(&ClearMessage {
            status: "success",
            cleared: &[id.to_string()],
        })?;
    } else {
        ctx.console.info(format!("Session '{}' cleared.", id));
    }
    Ok(())
}

fn clear_all(ctx: &CommandContext<'_>) -> Result<(), CommandError> {
    let removed = clear_sessions(&ctx.mode.config_dir)?;
    tracing::debug!(count = removed.len(), "sessions removed");

    if ctx.console.is_json() {
        ctx.console.print_json(&ClearMessage {
            status: "success",
            cleared: &removed,
        })?;
    } else {
        ctx.console
            .info(format!("Cleared {} session(s).", removed.len()));
    }
    Ok(())
}
