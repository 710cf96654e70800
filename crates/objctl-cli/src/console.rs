use is_terminal::IsTerminal;
use objctl_runtime::RuntimeMode;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::error::Error;

use crate::APP_NAME;

/// Where user-facing output goes, shaped by the runtime mode.
#[derive(Debug, Clone, Default)]
pub struct Console {
    quiet: bool,
    json: bool,
    mimic: bool,
    debug: bool,
    color: bool,
}

impl Console {
    pub fn new(mode: &RuntimeMode) -> Self {
        Self {
            quiet: mode.quiet,
            json: mode.json,
            mimic: mode.mimic,
            debug: mode.debug,
            color: !mode.json && std::io::stderr().is_terminal(),
        }
    }

    /// Before the mode is known.
    pub fn plain() -> Self {
        Self {
            color: std::io::stderr().is_terminal(),
            ..Self::default()
        }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    pub fn is_mimic(&self) -> bool {
        self.mimic
    }

    /// Output the user asked for. Never suppressed.
    pub fn println(&self, text: impl AsRef<str>) {
        println!("{}", text.as_ref());
    }

    /// Chatty status lines. Dropped in quiet and JSON modes.
    pub fn info(&self, text: impl AsRef<str>) {
        if !self.quiet && !self.json {
            println!("{}", text.as_ref());
        }
    }

    /// One JSON document per line.
    pub fn print_json<T: Serialize>(&self, value: &T) -> serde_json::Result<()> {
        println!("{}", serde_json::to_string(value)?);
        Ok(())
    }

    /// Print an error with its immediate cause. Debug mode adds the rest of
    /// the source chain.
    pub fn report(&self, err: &dyn Error) {
        eprintln!("{}", self.format_error(err));
    }

    pub fn format_error(&self, err: &dyn Error) -> String {
        let message = err.to_string();
        let mut chain = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            chain.push(cause.to_string());
            source = cause.source();
        }
        let cause = chain.first().cloned();
        let trace: Vec<String> = if self.debug {
            chain.iter().skip(1).cloned().collect()
        } else {
            Vec::new()
        };

        if self.json {
            let mut body = serde_json::json!({ "message": message });
            if let Some(cause) = cause {
                body["cause"] = cause.into();
            }
            if !trace.is_empty() {
                body["trace"] = trace.into();
            }
            return serde_json::json!({ "status": "error", "error": body }).to_string();
        }

        let mut line = if self.mimic {
            let message = message.trim_end_matches('.');
            match &cause {
                Some(cause) => format!("{}: {}: {}", APP_NAME, message, cause),
                None => format!("{}: {}", APP_NAME, message),
            }
        } else {
            let tag = if self.color {
                "<ERROR>".red().bold().to_string()
            } else {
                "<ERROR>".to_string()
            };
            match &cause {
                Some(cause) => format!("{}: {} {} {}", APP_NAME, tag, message, cause),
                None => format!("{}: {} {}", APP_NAME, tag, message),
            }
        };
        for entry in &trace {
            line.push_str("\n  caused by: ");
            line.push_str(entry);
        }
        line
    }
}
