use std::path::PathBuf;

const USER_ENV_VARS: &[&str] = &["USER", "USERNAME", "LOGNAME"];

#[derive(Debug, thiserror::Error)]
#[error("neither a user name ({vars}) nor a home directory could be resolved")]
pub struct UserError {
    vars: String,
}

/// The invoking user, as far as the process environment can tell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub name: Option<String>,
    pub home: Option<PathBuf>,
}

impl UserIdentity {
    pub fn display_name(&self) -> String {
        match (&self.name, &self.home) {
            (Some(name), _) => name.clone(),
            (None, Some(home)) => home.display().to_string(),
            (None, None) => "unknown".to_string(),
        }
    }
}

pub fn current_user() -> Result<UserIdentity, UserError> {
    let name = user_name_from(|var| std::env::var(var).ok());
    resolve_user(name, dirs::home_dir())
}

/// First non-blank name among the user variables, in lookup order.
fn user_name_from(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    USER_ENV_VARS
        .iter()
        .find_map(|var| lookup(var).filter(|name| !name.trim().is_empty()))
}

/// A user is resolvable when at least one of the name or home is known.
pub fn resolve_user(
    name: Option<String>,
    home: Option<PathBuf>,
) -> Result<UserIdentity, UserError> {
    if name.is_none() && home.is_none() {
        return Err(UserError {
            vars: USER_ENV_VARS.join("/"),
        });
    }
    Ok(UserIdentity { name, home })
}
