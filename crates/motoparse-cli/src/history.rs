use clap::Subcommand;
use motoparse_core::SupportedSites;

use crate::Context;

/// Sub-commands available under `history`.
#[derive(Debug, Subcommand)]
pub enum HistoryCommands {
    /// Show recent URLs, newest first
    List,
    /// Remove one URL from the history
    Remove {
        /// URL exactly as listed
        url: String,
    },
    /// Remove every URL from the history
    Clear,
}

pub(crate) fn run_history(ctx: &Context, command: HistoryCommands) {
    match command {
        HistoryCommands::List => {
            let entries = ctx.history.load();
            if entries.is_empty() {
                println!("История пуста.");
            }
            for entry in &entries {
                println!("{}", history_line(&ctx.config.supported_sites, entry));
            }
        }
        HistoryCommands::Remove { url } => {
            let remaining = ctx.history.remove(&url);
            tracing::debug!(remaining = remaining.len(), "history entry removed");
            println!("Элемент удален из истории.");
        }
        HistoryCommands::Clear => {
            ctx.history.clear();
            println!("История очищена.");
        }
    }
}

/// One listing row: `[tag] /path`, or the bare URL for unknown sites.
pub(crate) fn history_line(sites: &SupportedSites, url: &str) -> String {
    match sites.describe(url) {
        Some(site) => format!("[{}] {}\t{url}", site.tag, site.path),
        None => url.to_string(),
    }
}
