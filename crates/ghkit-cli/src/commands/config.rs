use std::io::Write;
use std::path::Path;

use clap::Subcommand;
use ghkit_core::Config;

#[derive(Debug, Clone, Subcommand)]
pub(crate) enum ConfigCommands {
    /// Set a value, e.g. `github.organization greenbone`
    Set { key: String, value: String },

    /// Print a single value
    Get { key: String },

    /// Show the current configuration
    Show,
}

pub(crate) fn handle_config(command: ConfigCommands, out: &mut impl Write) -> anyhow::Result<()> {
    let path = Config::config_path()?;
    handle_config_at(command, &path, out)
}

fn handle_config_at(
    command: ConfigCommands,
    path: &Path,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut config = Config::load_from(path)?;

    match command {
        ConfigCommands::Set { key, value } => {
            config.set(&key, &value)?;
            config.save_to(path)?;
            writeln!(out, "Set {} = {}", key, value)?;
        }
        ConfigCommands::Get { key } => match config.get(&key)? {
            Some(value) => writeln!(out, "{}", value)?,
            None => writeln!(out, "{} is not set", key)?,
        },
        ConfigCommands::Show => {
            writeln!(out, "Config file: {}", path.display())?;
            writeln!(out, "github.base_url = {}", config.base_url())?;
            writeln!(out, "github.timeout = {}", config.timeout().as_secs())?;
            writeln!(
                out,
                "github.organization = {}",
                config.organization().unwrap_or("-")
            )?;
        }
    }

    Ok(())
}
