use crate::context::CommandContext;
use crate::error::CommandError;
use objctl_core::config::validate;
use objctl_core::{Config, HostConfig};
use serde::Serialize;
use std::collections::BTreeMap;

const MASK: &str = "********";

#[derive(Serialize)]
struct ConfigMessage<'a> {
    status: &'static str,
    config: &'a Config,
}

#[derive(Serialize)]
struct PathMessage {
    status: &'static str,
    path: String,
}

#[derive(Serialize)]
struct AliasMessage<'a> {
    status: &'static str,
    alias: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
}

pub fn handle(ctx: &CommandContext<'_>, args: &[String]) -> Result<(), CommandError> {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    match args.as_slice() {
        [] | ["show"] => show(ctx),
        ["path"] => path(ctx),
        ["alias"] | ["alias", "list"] => list_aliases(ctx),
        ["alias", "add", name, url] => add_alias(ctx, name, url),
        ["alias", "remove", name] => remove_alias(ctx, name),
        ["alias", "add", ..] => Err(CommandError::usage(
            "'config alias add' needs a NAME and a URL",
        )),
        ["alias", "remove", ..] => Err(CommandError::usage(
            "'config alias remove' needs exactly one NAME",
        )),
        ["alias", other, ..] => Err(CommandError::usage(format!(
            "unknown alias subcommand '{}'",
            other
        ))),
        [other, ..] => Err(CommandError::usage(format!(
            "unknown config subcommand '{}'",
            other
        ))),
    }
}

/// A copy of the config that is safe to print.
fn redacted(config: &Config) -> Config {
    let hosts: BTreeMap<String, HostConfig> = config
        .hosts
        .iter()
        .map(|(pattern, host)| {
            let mut host = host.clone();
            if !host.secret_access_key.is_empty() {
                host.secret_access_key = MASK.to_string();
            }
            (pattern.clone(), host)
        })
        .collect();
    Config {
        hosts,
        ..config.clone()
    }
}

fn show(ctx: &CommandContext<'_>) -> Result<(), CommandError> {
    let config = redacted(ctx.config);

    if ctx.console.is_json() {
        ctx.console.print_json(&ConfigMessage {
            status: "success",
            config: &config,
        })?;
        return Ok(());
    }

    let rendered = toml::to_string_pretty(&config)?;
    ctx.console.println(rendered.trim_end());
    Ok(())
}

fn path(ctx: &CommandContext<'_>) -> Result<(), CommandError> {
    let path = ctx.config_path().display().to_string();

    if ctx.console.is_json() {
        ctx.console.print_json(&PathMessage {
            status: "success",
            path,
        })?;
    } else {
        ctx.console.println(path);
    }
    Ok(())
}

fn list_aliases(ctx: &CommandContext<'_>) -> Result<(), CommandError> {
    let aliases = &ctx.config.aliases;

    if ctx.console.is_json() {
        for (alias, url) in aliases {
            ctx.console.print_json(&AliasMessage {
                status: "success",
                alias,
                url: Some(url.as_str()),
            })?;
        }
        return Ok(());
    }

    let width = aliases.keys().map(String::len).max().unwrap_or(0);
    for (alias, url) in aliases {
        ctx.console.println(format!("{:<width$}  {}", alias, url));
    }
    Ok(())
}

fn add_alias(ctx: &CommandContext<'_>, name: &str, url: &str) -> Result<(), CommandError> {
    let path = ctx.config_path();
    let mut config = ctx.config.clone();
    config.set_alias(name.to_string(), url.to_string());
    validate(&config, &path)?;
    config.save_to(&path)?;
    tracing::debug!(alias = name, url, "alias saved");

    if ctx.console.is_json() {
        ctx.console.print_json(&AliasMessage {
            status: "success",
            alias: name,
            url: Some(url),
        })?;
    } else {
        ctx.console
            .info(format!("Added alias '{}' for '{}'.", name, url));
    }
    Ok(())
}

fn remove_alias(ctx: &CommandContext<'_>, name: &str) -> Result<(), CommandError> {
    let path = ctx.config_path();
    let mut config = ctx.config.clone();
    config.remove_alias(name)?;
    config.save_to(&path)?;
    tracing::debug!(alias = name, "alias removed");

    if ctx.console.is_json() {
        ctx.console.print_json(&AliasMessage {
            status: "success",
            alias: name,
            url: None,
        })?;
    } else {
        ctx.console.info(format!("Removed alias '{}'.", name));
    }
    Ok(())
}
