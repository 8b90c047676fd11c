//! Configuration management commands.

use anyhow::Result;
use palisade_config::PalisadeConfig;

use crate::style::{print_header, print_labeled};

/// Show the effective configuration.
pub fn show(config: &PalisadeConfig, format: &str) -> Result<()> {
    match format {
        "json" => {
            let json = serde_json::to_string_pretty(config)?;
            println!("{json}");
        }
        "toml" => {
            let toml_str = toml::to_string_pretty(config)?;
            println!("{toml_str}");
        }
        "text" => {
            print_header("Project");
            print_labeled("Name", &config.project.name);
            println!();

            print_header("Enforcement");
            print_labeled("Reserved prefix", &config.enforcement.reserved_prefix);
            print_labeled("Audit", &config.enforcement.audit.to_string());
            println!();

            print_header("Logging");
            print_labeled("Filter", &config.logging.filter);
            print_labeled("JSON", &config.logging.json.to_string());
            println!();

            print_header("Roles");
            for (id, role) in &config.roles {
                print_labeled(id, &role.permissions.join(", "));
            }
        }
        other => anyhow::bail!("Unknown format '{other}' (expected text, json or toml)"),
    }

    Ok(())
}
