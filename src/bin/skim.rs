use anyhow::Result;
use skimmer::{BundledStopwords, Config, MemoryBlobStore, PipelineContext, batch};
use std::sync::Arc;

/// CLI stand-in for the conversation layer: fetch and summarize the URLs
/// given on the command line and print one JSON content item per line.
///
/// Pass `--full-text` before the URLs to raise the summary sentence cap.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let full_text = if let Some(pos) = args.iter().position(|a| a == "--full-text") {
        args.remove(pos);
        true
    } else {
        false
    };

    if args.is_empty() {
        eprintln!("usage: skim [--full-text] <url> [<url> ...]");
        std::process::exit(2);
    }

    let config = Config::from_env()?;
    let blob_store = Arc::new(MemoryBlobStore::new(config.blob_base_url().to_string()));
    let ctx = Arc::new(PipelineContext::new(config, blob_store, &BundledStopwords, "en").await?);

    let items = batch::run_batch(ctx, &args, full_text).await;
    for item in items {
        println!("{}", serde_json::to_string(&item)?);
    }

    Ok(())
}
