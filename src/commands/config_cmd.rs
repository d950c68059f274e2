use clap::{Args, Subcommand};
use std::fs;
use std::io::Write;
use std::path::Path;

use super::OutputFormat;
use storefront::config::Config;

const DEFAULT_CONFIG: &str = r#"# storefront configuration

# Directory of the local document store (default: ~/.local/share/storefront)
# data_dir: ~/.local/share/storefront

# Use a storefront-server instead of the local store
# server_url: http://localhost:8080

# How `wishlist add` writes the user's wishlist: replace or append
wishlist_policy: replace

# Identity used when adding products
# auth:
#   uid: admin
#   created_at: 2023-01-01T00:00:00Z
"#;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Initialize configuration file
    Init,
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => print_config(config),
                }
                Ok(())
            }

            ConfigSubcommand::Init => {
                let config_path = Config::default_config_path();
                if write_default_config(&config_path)? {
                    println!("Created config file: {}", config_path.display());
                    println!("\nEdit this file to customize your settings.");
                } else {
                    println!("Config file already exists: {}", config_path.display());
                    println!("Use 'storefront config show' to view current configuration.");
                }
                Ok(())
            }
        }
    }
}

fn print_config(config: &Config) {
    println!("Configuration");
    println!("=============\n");

    if let Some(path) = &config.config_file {
        println!("Config file: {}", path.display());
    } else {
        println!(
            "Config file: {} (not found)",
            Config::default_config_path().display()
        );
    }
    println!();

    println!("data_dir: {}", config.data_dir.value.display());
    println!("  source: {}", config.data_dir.source);
    println!();

    println!(
        "server_url: {}",
        config.server_url.value.as_deref().unwrap_or("(none)")
    );
    println!("  source: {}", config.server_url.source);
    println!();

    println!("wishlist_policy: {}", config.wishlist_policy.value);
    println!("  source: {}", config.wishlist_policy.source);
    println!();

    println!(
        "auth.uid: {}",
        config.auth.uid.value.as_deref().unwrap_or("(none)")
    );
    println!("  source: {}", config.auth.uid.source);
    match config.auth.created_at.value {
        Some(at) => println!("auth.created_at: {}", at.to_rfc3339()),
        None => println!("auth.created_at: (none)"),
    }
    println!("  source: {}", config.auth.created_at.source);
}

/// Writes the commented default config unless a file already exists.
/// Returns whether a file was written.
fn write_default_config(path: &Path) -> std::io::Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = fs::File::create(path)?;
    file.write_all(DEFAULT_CONFIG.as_bytes())?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::WishlistPolicy;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_loadable() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("storefront").join("config.yaml");

        assert!(write_default_config(&path).unwrap());
        let config = Config::load(Some(path.clone())).unwrap();
        assert_eq!(config.wishlist_policy.value, WishlistPolicy::Replace);
        assert_eq!(config.config_file, Some(path));
    }

    #[test]
    fn test_init_keeps_existing_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "wishlist_policy: append\n").unwrap();

        assert!(!write_default_config(&path).unwrap());
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "wishlist_policy: append\n"
        );
    }
}
