//! Configuration command handlers

use crate::cli::{ConfigAction, ConfigArgs, ConfigFormat, ConfigInitArgs, ConfigShowArgs};
use crate::config::{Config, REVIEW_THRESHOLD_ENV};
use crate::error::{Error, Result};
use crate::output::OutputWriter;

/// Environment variables that change the effective configuration
const CONFIG_ENV_VARS: &[&str] = &[
    "INTAKE_CONFIG",
    REVIEW_THRESHOLD_ENV,
    "INTAKE_LOG_FORMAT",
    "INTAKE_LOG_FILE",
    "RUST_LOG",
];

/// Handle the config command
pub async fn handle_config(
    args: ConfigArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    match args.action {
        ConfigAction::Init(init_args) => handle_config_init(init_args, output),
        ConfigAction::Show(show_args) => handle_config_show(show_args, config, output),
        ConfigAction::Validate => handle_config_validate(config, output),
    }
}

/// Handle config init subcommand
fn handle_config_init(args: ConfigInitArgs, output: &mut OutputWriter) -> Result<()> {
    let path = match args.path {
        Some(path) => path,
        None => Config::user_config_path()
            .ok_or_else(|| Error::config("Unable to determine user config directory"))?,
    };

    if path.exists() && !args.force {
        output.warning(&format!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        ))?;
        return Ok(());
    }

    Config::default().save(&path)?;
    output.success(&format!("✓ Created config at {}", path.display()))?;
    Ok(())
}

/// Handle config show subcommand
fn handle_config_show(
    args: ConfigShowArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let content = render_config(config, args.format)?;
    output.writeln(content.trim_end())
}

/// Serialize a configuration in the requested format
fn render_config(config: &Config, format: ConfigFormat) -> Result<String> {
    match format {
        ConfigFormat::Toml => toml::to_string_pretty(config)
            .map_err(|e| Error::config(format!("Failed to serialize as TOML: {}", e))),
        ConfigFormat::Json => Ok(serde_json::to_string_pretty(config)?),
        ConfigFormat::Yaml => Ok(serde_yaml::to_string(config)?),
    }
}

/// Handle config validate subcommand
fn handle_config_validate(config: &Config, output: &mut OutputWriter) -> Result<()> {
    output.info("Validating configuration...")?;

    if let Err(e) = config.validate() {
        output.error(&format!("✗ Configuration validation failed: {}", e))?;
        return Err(e);
    }
    output.success("✓ Configuration is valid")?;

    output.section("Configuration Sources")?;
    if let Some(user_path) = Config::user_config_path() {
        let exists = if user_path.exists() { "✓" } else { "✗" };
        output.info(&format!("{} User config: {}", exists, user_path.display()))?;
    }

    let active: Vec<(&str, String)> = CONFIG_ENV_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok().map(|value| (*var, value)))
        .collect();
    if !active.is_empty() {
        output.section("Active Environment Variables")?;
        for (var, value) in active {
            output.info(&format!("• {} = {}", var, value))?;
        }
    }

    Ok(())
}
