//! Command handlers behind the `opsdesk` binary.
//!
//! Each data command restores the saved session, drives one screen against
//! the HTTP backend and prints either a table or JSON.

mod config;
mod customers;
mod invoices;
mod session;

pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use customers::{
    CustomerFields, cmd_customers_create, cmd_customers_ls, cmd_customers_search,
    cmd_customers_show, cmd_customers_update,
};
pub use invoices::{cmd_invoices_ls, cmd_invoices_search};
pub use session::{cmd_login, cmd_logout, cmd_whoami};

use std::sync::Arc;

use serde_json::Value;

use crate::api::HttpBackend;
use crate::cli::OutputOptions;
use crate::config::Config;
use crate::error::{OpsError, Result};
use crate::notify::Toast;
use crate::session::{Gate, Session, SessionStore};
use crate::types::User;

/// Print a JSON value to stdout
pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// A command result with a JSON form and an optional human-readable form.
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn print(self, output: OutputOptions) -> Result<()> {
        if output.json {
            return print_json(&self.json);
        }
        match self.text {
            Some(text) => println!("{text}"),
            None => print_json(&self.json)?,
        }
        Ok(())
    }
}

/// Everything a data command needs: config, restored session and client.
pub(crate) struct Context {
    pub config: Config,
    pub session: Arc<Session>,
    pub backend: HttpBackend,
}

impl Context {
    pub fn load() -> Result<Self> {
        let config = Config::load()?;
        let session = Arc::new(Session::new());
        session.restore(&SessionStore::default_location())?;
        let backend = HttpBackend::from_config(&config, session.clone())?;
        Ok(Self {
            config,
            session,
            backend,
        })
    }
}

/// Turn an auth gate decision into a command result.
pub(crate) fn require_user(gate: Gate) -> Result<User> {
    match gate {
        Gate::Proceed(user) => Ok(user),
        Gate::RedirectToLogin { from } => Err(OpsError::NotLoggedIn(from)),
        Gate::Loading => Err(OpsError::Other("session is still loading".to_string())),
    }
}

/// Report a screen's notifications.
///
/// Non-error toasts are returned for the caller to print. The first error
/// becomes the command's error so the process exits non-zero.
pub(crate) fn settle(toasts: Vec<Toast>) -> Result<Vec<Toast>> {
    match toasts.iter().position(Toast::is_error) {
        Some(i) => Err(OpsError::Other(toasts[i].message.clone())),
        None => Ok(toasts),
    }
}
