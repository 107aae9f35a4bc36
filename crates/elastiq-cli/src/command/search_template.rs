//! The `search-template` subcommand.

use anyhow::Context;
use elastiq_client::{Client, ErrorKind, SearchResult};
use tokio_util::sync::CancellationToken;

use crate::TRACING_TARGET_COMMAND;
use crate::config::SearchTemplateArgs;

/// Runs the templated search described by `args`.
pub async fn run(
    client: &Client,
    args: &SearchTemplateArgs,
    cancel: &CancellationToken,
) -> anyhow::Result<SearchResult> {
    let mut service = client
        .search_template()
        .with_filter_path(args.filter_path.iter().cloned())
        .with_headers(args.headers.iter().cloned());

    if let Some(index) = &args.index {
        service = service.with_index(index);
    }
    if let Some(id) = &args.id {
        service = service.with_id(id);
    }
    if let Some(source) = &args.source {
        service = service.with_source(source);
    }
    if let Some(params) = &args.params {
        service = service.with_params(params.clone());
    }
    if let Some(pretty) = args.pretty {
        service = service.with_pretty(pretty);
    }
    if let Some(human) = args.human {
        service = service.with_human(human);
    }
    if let Some(error_trace) = args.error_trace {
        service = service.with_error_trace(error_trace);
    }

    match service.send_with_cancellation(cancel).await {
        Ok(result) => {
            tracing::info!(
                target: TRACING_TARGET_COMMAND,
                took_ms = ?result.took,
                total_hits = result.total_hits(),
                returned = result.hits().len(),
                "Search completed"
            );
            Ok(result)
        }
        Err(error) if error.kind() == ErrorKind::Cancelled => {
            Err(error).context("search cancelled")
        }
        Err(error) => {
            if let Some(partial) = SearchResult::partial_from(&error) {
                tracing::warn!(
                    target: TRACING_TARGET_COMMAND,
                    headers = partial.header.len(),
                    "Response arrived but could not be decoded"
                );
            }
            Err(error).context("search failed")
        }
    }
}
