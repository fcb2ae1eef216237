//! Config command handlers

use anyhow::{bail, Context, Result};

use folheto_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(output: &Output) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "max_upload_bytes": config.max_upload_bytes,
                    "conversion_delay_ms": config.conversion_delay_ms,
                    "zoom_min": config.zoom_min,
                    "zoom_max": config.zoom_max,
                    "zoom_step": config.zoom_step
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            println!("Configuration:");
            println!("  data_dir:            {}", config.data_dir.display());
            println!("  max_upload_bytes:    {}", config.max_upload_bytes);
            println!("  conversion_delay_ms: {}", config.conversion_delay_ms);
            println!("  zoom_min:            {}", config.zoom_min);
            println!("  zoom_max:            {}", config.zoom_max);
            println!("  zoom_step:           {}", config.zoom_step);
            println!();
            println!("Config file: {}", Config::config_file_path().display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(key: String, value: String, output: &Output) -> Result<()> {
    let mut config = Config::load().context("Failed to load configuration")?;

    match key.as_str() {
        "data_dir" => {
            config.data_dir = value.clone().into();
        }
        "max_upload_bytes" => {
            config.max_upload_bytes = value
                .parse()
                .context("Invalid value for max_upload_bytes. Use a byte count.")?;
        }
        "conversion_delay_ms" => {
            config.conversion_delay_ms = value
                .parse()
                .context("Invalid value for conversion_delay_ms. Use milliseconds.")?;
        }
        "zoom_min" => {
            config.zoom_min = value.parse().context("Invalid value for zoom_min.")?;
        }
        "zoom_max" => {
            config.zoom_max = value.parse().context("Invalid value for zoom_max.")?;
        }
        "zoom_step" => {
            config.zoom_step = value.parse().context("Invalid value for zoom_step.")?;
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, max_upload_bytes, conversion_delay_ms, \
                 zoom_min, zoom_max, zoom_step",
                key
            );
        }
    }

    config.save().context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}
