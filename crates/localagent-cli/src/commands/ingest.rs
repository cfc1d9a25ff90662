//! Ingest command

use crate::app::{IngestArgs, OutputFormat};
use crate::progress::ProgressReporter;
use anyhow::Result;
use localagent_core::{ingest, Config, ElasticsearchStore, Embedder, OllamaClient};
use std::sync::Arc;

pub async fn run(args: IngestArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let mut ingest_config = config.ingest.clone();
    if let Some(dir) = args.dir {
        ingest_config.data_dir = dir;
    }

    let ollama = Arc::new(OllamaClient::new(config.llm.clone())?);
    let embedder: Arc<dyn Embedder> = ollama;
    let store = ElasticsearchStore::new(config.search.clone(), embedder.clone())?;

    let mut progress = ProgressReporter::new("Ingesting");
    let report = ingest::run_with_progress(
        &ingest_config,
        embedder.as_ref(),
        &store,
        |done, total| progress.update(done, total),
    )
    .await?;
    if report.chunks > 0 {
        progress.finish();
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        _ if report.chunks == 0 => println!(
            "No documents found in {}. Add .txt, .md, .csv, .rst or .pdf files.",
            ingest_config.data_dir.display()
        ),
        _ => println!(
            "Ingested {} chunks from {} documents into '{}'",
            report.indexed,
            report.documents,
            store.index_name()
        ),
    }
    Ok(())
}
