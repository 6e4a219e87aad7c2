//! Sign-in commands: `login`, `logout` and `whoami`.
//!
//! Signing in only records who is operating the CLI (and an optional API
//! token); the API has no login endpoint of its own.

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::cli::OutputOptions;
use crate::error::{OpsError, Result};
use crate::session::{SavedSession, Session, SessionStore};
use crate::types::User;

pub fn cmd_login(
    name: &str,
    email: Option<String>,
    token: Option<String>,
    output: OutputOptions,
) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(OpsError::Other("user name cannot be empty".to_string()));
    }

    let user = User {
        id: name.to_lowercase().replace(char::is_whitespace, "-"),
        name: name.to_string(),
        email,
    };
    let has_token = token.is_some();
    SessionStore::default_location().save(&SavedSession {
        user: user.clone(),
        token,
    })?;
    tracing::debug!(user = %user.id, "session saved");

    CommandOutput::new(json!({
        "action": "login",
        "user": user,
        "token_configured": has_token,
    }))
    .with_text(format!("Logged in as {}", user.name.cyan()))
    .print(output)
}

pub fn cmd_logout(output: OutputOptions) -> Result<()> {
    SessionStore::default_location().clear()?;

    CommandOutput::new(json!({
        "action": "logout",
        "success": true,
    }))
    .with_text("Logged out")
    .print(output)
}

pub fn cmd_whoami(output: OutputOptions) -> Result<()> {
    let session = Session::new();
    session.restore(&SessionStore::default_location())?;
    let state = session.snapshot();

    let text = match &state.user {
        Some(user) => match &user.email {
            Some(email) => format!("{} <{email}>", user.name.cyan()),
            None => user.name.cyan().to_string(),
        },
        None => "Not logged in".dimmed().to_string(),
    };

    CommandOutput::new(json!({
        "authenticated": state.authenticated,
        "user": state.user,
        "token_configured": session.authorization().is_some(),
    }))
    .with_text(text)
    .print(output)
}
