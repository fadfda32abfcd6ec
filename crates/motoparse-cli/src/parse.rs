use anyhow::{bail, Context as _};
use motoparse_client::{ParseClient, ParsingOrchestrator};
use motoparse_core::normalize_url;

use crate::render;
use crate::Context;

pub(crate) const EMPTY_URL_MESSAGE: &str = "Пожалуйста, введите URL.";

pub(crate) async fn run_parse(ctx: &Context, url: &str, json: bool) -> anyhow::Result<()> {
    let url = url.trim();
    if url.is_empty() {
        bail!(EMPTY_URL_MESSAGE);
    }

    // History keeps the normalized spelling, whether or not the site is
    // supported.
    let normalized = normalize_url(url);
    ctx.history.add(&normalized);

    let client = ParseClient::from_config(&ctx.config)?;
    let orchestrator = ParsingOrchestrator::new(
        client,
        ctx.cache.clone(),
        ctx.config.supported_sites.clone(),
    );

    match orchestrator.submit(&normalized).await {
        Ok(result) => {
            if json {
                let body =
                    serde_json::to_string_pretty(&result).context("failed to encode result")?;
                println!("{body}");
            } else {
                print!("{}", render::parse_result(&result));
            }
            Ok(())
        }
        Err(e) => bail!("{e}"),
    }
}
