use std::path::Path;

use anyhow::{bail, Context as _};
use motoparse_client::ParseClient;
use motoparse_core::{normalize_url, ParseResult, Product};

use crate::Context;

pub(crate) const NOTHING_SELECTED_MESSAGE: &str =
    "Выберите хотя бы один товар для скачивания архива.";

pub(crate) async fn run_archive(
    ctx: &Context,
    url: &str,
    output: &Path,
    links: &[String],
) -> anyhow::Result<()> {
    let normalized = normalize_url(url.trim());
    let Some(result) = ctx.cache.get::<ParseResult>(&normalized) else {
        bail!("no parsed result for {normalized}; run `motoparse parse` first");
    };

    let selected = select_products(&result, links);
    if selected.is_empty() {
        bail!(NOTHING_SELECTED_MESSAGE);
    }

    let client = ParseClient::from_config(&ctx.config)?;
    let bytes = client
        .download_archive(&selected)
        .await
        .context("failed to download archive")?;
    tokio::fs::write(output, &bytes)
        .await
        .with_context(|| format!("failed to write {}", output.display()))?;

    tracing::info!(
        products = selected.len(),
        bytes = bytes.len(),
        path = %output.display(),
        "archive saved"
    );
    println!("Архив сохранен: {}", output.display());
    Ok(())
}

/// Products from `result` whose link is in `links`; all of them when `links`
/// is empty.
pub(crate) fn select_products(result: &ParseResult, links: &[String]) -> Vec<Product> {
    result
        .products()
        .iter()
        .filter(|p| links.is_empty() || links.contains(&p.link))
        .cloned()
        .collect()
}
