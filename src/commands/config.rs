//! Configuration commands.
//!
//! - `config show`: Display current configuration
//! - `config set`: Set a configuration value
//! - `config get`: Print one configuration value

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::cli::OutputOptions;
use crate::config::{API_URL_ENV, Config};
use crate::error::Result;

/// Show current configuration
pub fn cmd_config_show(output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let env_override = std::env::var(API_URL_ENV).ok().filter(|v| !v.trim().is_empty());

    let json_output = json!({
        "api_url": config.api_url,
        "api_url_env": env_override,
        "page_size": config.page_size,
        "request_timeout": config.request_timeout,
        "config_file": Config::config_path().to_string_lossy(),
    });

    let mut text_output = String::new();
    text_output.push_str(&format!("{}\n\n", "Configuration:".cyan().bold()));

    match &config.api_url {
        Some(url) => text_output.push_str(&format!("{}: {url}\n", "api_url".cyan())),
        None => text_output.push_str(&format!(
            "{}: {}\n",
            "api_url".cyan(),
            "not configured".dimmed()
        )),
    }
    if let Some(url) = &env_override {
        text_output.push_str(&format!(
            "  {}\n",
            format!("overridden by {API_URL_ENV}={url}").yellow()
        ));
    }
    text_output.push_str(&format!("{}: {}\n", "page_size".cyan(), config.page_size));
    text_output.push_str(&format!(
        "{}: {}s\n",
        "request_timeout".cyan(),
        config.request_timeout
    ));

    text_output.push('\n');
    text_output.push_str(&format!(
        "{}",
        format!("Config file: {}", Config::config_path().display()).dimmed()
    ));

    CommandOutput::new(json_output)
        .with_text(text_output)
        .print(output)
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str, output: OutputOptions) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;

    CommandOutput::new(json!({
        "action": "config_set",
        "key": key,
        "value": config.get(key)?,
        "success": true,
    }))
    .with_text(format!("Set {} = {}", key.cyan(), config.get(key)?))
    .print(output)
}

/// Get a configuration value
pub fn cmd_config_get(key: &str, output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let value = config.get(key)?;

    CommandOutput::new(json!({
        "key": key,
        "value": value,
    }))
    .with_text(value)
    .print(output)
}
