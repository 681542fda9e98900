//! Configuration management commands.

use std::fs;

use anyhow::{bail, Context as _, Result};
use dialoguer::Confirm;
use selection_feed::LoaderConfig;

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CONFIG_NAMES};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("source", &path.display().to_string()),
        None => ctx.output.kv("source", "built-in defaults"),
    }
    println!();
    print!("{}", toml::to_string_pretty(&ctx.config)?);

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        let overwrite = Confirm::new()
            .with_prompt(format!("{} exists. Overwrite?", config_path.display()))
            .default(false)
            .interact()
            .unwrap_or(false);
        if !overwrite {
            bail!(
                "Config file already exists: {}. Use --force to overwrite.",
                config_path.display()
            );
        }
    }

    fs::write(&config_path, generate_default_config())
        .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

    ctx.output
        .success(&format!("Created: {}", config_path.display()));
    ctx.output
        .warn("The shipping brackets are an example; replace them with real rates");

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let loader = &ctx.config.loader;
    let mut warnings: Vec<String> = Vec::new();

    if let Err(e) = loader.validate() {
        bail!("Configuration is invalid: {}", e);
    }

    let defaults = LoaderConfig::default();
    if loader.pricing.shipping_brackets == defaults.pricing.shipping_brackets {
        warnings.push("pricing.shipping_brackets still holds the example table".to_string());
    }
    if loader.fetch.timeout_ms.is_none() {
        warnings.push("fetch.timeout_ms is unset; a stalled feed blocks scrolling".to_string());
    }
    if loader.scroll.debounce_ms == 0 {
        warnings.push("scroll.debounce_ms is 0; every scroll event is evaluated".to_string());
    }
    let sim = &ctx.config.simulation;
    if sim.row_height_px <= 0.0 || sim.viewport_height_px <= 0.0 {
        warnings.push("simulation heights should be positive".to_string());
    }

    if warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }
    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}
