//! Handlers for the `config` subcommands.

use crate::cli::ConfigAction;
use minacl_core::{Config, Error, Result};
use std::path::Path;

/// Dispatches a config subcommand.
pub fn handle_config_command(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init { file, force } => cmd_config_init(&file, force),
        ConfigAction::Show { config } => {
            let rendered = cmd_config_show(config.as_deref())?;
            print!("{rendered}");
            Ok(())
        }
    }
}

/// Writes the default configuration to `path`.
///
/// Refuses to replace an existing file unless `force` is set.
pub fn cmd_config_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::config(format!(
            "config file already exists at {}; use --force to overwrite",
            path.display()
        )));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
    }

    let content = Config::default().to_toml_string()?;
    std::fs::write(path, content).map_err(|e| Error::io_with_path(e, path))?;

    println!("Config file created at {}", path.display());
    Ok(())
}

/// Renders the configuration loaded from `path` (or the defaults) as TOML.
pub fn cmd_config_show(path: Option<&Path>) -> Result<String> {
    Config::load(path)?.to_toml_string()
}
