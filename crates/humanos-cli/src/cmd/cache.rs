use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use humanos_core::settings;
use std::path::Path;

#[derive(Subcommand)]
pub enum CacheSubcommand {
    /// Drop the cached catalog so the next command fetches it again
    Clear,
}

pub fn run(root: &Path, subcmd: CacheSubcommand, json: bool) -> anyhow::Result<()> {
    let store = super::open_store(root);
    match subcmd {
        CacheSubcommand::Clear => {
            settings::clear_cache(&store).context("failed to clear routine cache")?;
            if json {
                return print_json(&serde_json::json!({ "cleared": "routines" }));
            }
            println!("Cleared cached routines");
        }
    }
    Ok(())
}
