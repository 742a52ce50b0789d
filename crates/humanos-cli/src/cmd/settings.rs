use crate::output::print_json;
use anyhow::Context;
use clap::{Subcommand, ValueEnum};
use humanos_core::settings;
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum SettingsSubcommand {
    /// Show the catalog source URL and developer mode
    Show,

    /// Point the catalog at another URL (http or https)
    SetUrl {
        /// New source URL
        url: String,
    },

    /// Turn developer mode on or off
    Developer {
        #[arg(value_enum)]
        state: Toggle,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcmd: SettingsSubcommand, json: bool) -> anyhow::Result<()> {
    let store = super::open_store(root);
    match subcmd {
        SettingsSubcommand::Show => {
            let current = settings::load(&store);
            if json {
                return print_json(&current);
            }
            let suffix = if current.source_url_is_default {
                " (default)"
            } else {
                ""
            };
            println!("source url:     {}{suffix}", current.source_url);
            println!(
                "developer mode: {}",
                if current.developer_mode { "on" } else { "off" }
            );
        }
        SettingsSubcommand::SetUrl { url } => {
            settings::set_source_url(&store, &url)
                .with_context(|| format!("cannot use '{url}' as source url"))?;
            if json {
                return print_json(&serde_json::json!({ "source_url": url.trim() }));
            }
            println!("Source url set to {}", url.trim());
        }
        SettingsSubcommand::Developer { state } => {
            let enabled = matches!(state, Toggle::On);
            settings::set_developer_mode(&store, enabled)?;
            if json {
                return print_json(&serde_json::json!({ "developer_mode": enabled }));
            }
            println!(
                "Developer mode {}",
                if enabled { "enabled" } else { "disabled" }
            );
        }
    }
    Ok(())
}
